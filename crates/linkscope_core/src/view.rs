use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::record::Record;

/// Page sizes the paginator accepts.
pub const PAGE_SIZES: [usize; 6] = [5, 10, 20, 30, 40, 50];

/// Initial page size of the dashboard table.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Visible columns of the result table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Url,
    Status,
    Title,
    HtmlVersion,
    H1,
    H2,
    H3,
    InternalLinks,
    ExternalLinks,
    BrokenLinks,
    LoginForm,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Url,
        Column::Status,
        Column::Title,
        Column::HtmlVersion,
        Column::H1,
        Column::H2,
        Column::H3,
        Column::InternalLinks,
        Column::ExternalLinks,
        Column::BrokenLinks,
        Column::LoginForm,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// At most one of these is active; absence means insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

/// The user's view parameters. Derived state only; never persisted and never
/// a reason to mutate the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub global_filter: String,
    pub column_filters: BTreeMap<Column, String>,
    pub sort: Option<SortSpec>,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            global_filter: String::new(),
            column_filters: BTreeMap::new(),
            sort: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewState {
    pub fn set_global_filter(&mut self, text: String) {
        self.global_filter = text;
    }

    /// Empty or blank text clears the column's filter.
    pub fn set_column_filter(&mut self, column: Column, value: String) {
        if value.trim().is_empty() {
            self.column_filters.remove(&column);
        } else {
            self.column_filters.insert(column, value);
        }
    }

    /// Header-click cycle: none -> ascending -> descending -> none. Clicking
    /// a different column starts that column ascending.
    pub fn cycle_sort(&mut self, column: Column) {
        self.sort = match self.sort {
            Some(spec) if spec.column == column => match spec.direction {
                SortDirection::Ascending => Some(SortSpec {
                    column,
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(SortSpec {
                column,
                direction: SortDirection::Ascending,
            }),
        };
    }

    /// Rejects sizes outside `PAGE_SIZES`. A new size restarts at page 0.
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if !PAGE_SIZES.contains(&size) || self.page_size == size {
            return false;
        }
        self.page_size = size;
        self.page_index = 0;
        true
    }
}

/// One derived page of the collection plus the clamped paging facts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageView {
    pub rows: Vec<Record>,
    /// Requested index clamped into the available range.
    pub page_index: usize,
    pub page_count: usize,
    /// Rows surviving the filters, before pagination.
    pub filtered_count: usize,
}

/// Canonical cell text, the single string form used by both filtering and
/// the lexicographic sorts.
pub fn cell_text(record: &Record, column: Column) -> String {
    match column {
        Column::Url => record.url.clone(),
        Column::Status => record.status.as_str().to_string(),
        Column::Title => record.title.clone(),
        Column::HtmlVersion => record.html_version.clone(),
        Column::H1 => record.h1_count.to_string(),
        Column::H2 => record.h2_count.to_string(),
        Column::H3 => record.h3_count.to_string(),
        Column::InternalLinks => record.internal_link_count.to_string(),
        Column::ExternalLinks => record.external_link_count.to_string(),
        Column::BrokenLinks => record.broken_links.len().to_string(),
        Column::LoginForm => if record.has_login_form { "yes" } else { "no" }.to_string(),
    }
}

/// Pure projection of the store: filter, then stable sort, then paginate.
///
/// Identical inputs produce identical output; callers re-run this on every
/// store or view-state change instead of maintaining it incrementally.
pub fn derive_page(records: &[Record], view: &ViewState) -> PageView {
    let global = view.global_filter.trim().to_lowercase();
    let column_needles: Vec<(Column, String)> = view
        .column_filters
        .iter()
        .map(|(column, needle)| (*column, needle.trim().to_lowercase()))
        .filter(|(_, needle)| !needle.is_empty())
        .collect();

    let mut rows: Vec<&Record> = records
        .iter()
        .filter(|record| matches_global(record, &global) && matches_columns(record, &column_needles))
        .collect();

    if let Some(spec) = view.sort {
        rows.sort_by(|a, b| {
            let ordering = compare(a, b, spec.column);
            match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    let filtered_count = rows.len();
    let page_size = view.page_size.max(1);
    let page_count = filtered_count.div_ceil(page_size);
    // Clamp instead of showing an empty slice when the result set shrank.
    let page_index = if page_count == 0 {
        0
    } else {
        view.page_index.min(page_count - 1)
    };

    let rows = rows
        .into_iter()
        .skip(page_index * page_size)
        .take(page_size)
        .cloned()
        .collect();

    PageView {
        rows,
        page_index,
        page_count,
        filtered_count,
    }
}

fn matches_global(record: &Record, needle: &str) -> bool {
    needle.is_empty()
        || Column::ALL
            .iter()
            .any(|column| cell_text(record, *column).to_lowercase().contains(needle))
}

fn matches_columns(record: &Record, needles: &[(Column, String)]) -> bool {
    needles
        .iter()
        .all(|(column, needle)| cell_text(record, *column).to_lowercase().contains(needle))
}

/// Total order per column: numeric columns compare numerically, string
/// columns lexicographically. Ties keep insertion order because the sort
/// above is stable over the store snapshot.
fn compare(a: &Record, b: &Record, column: Column) -> Ordering {
    match column {
        Column::Url => a.url.cmp(&b.url),
        Column::Status => a.status.as_str().cmp(b.status.as_str()),
        Column::Title => a.title.cmp(&b.title),
        Column::HtmlVersion => a.html_version.cmp(&b.html_version),
        Column::H1 => a.h1_count.cmp(&b.h1_count),
        Column::H2 => a.h2_count.cmp(&b.h2_count),
        Column::H3 => a.h3_count.cmp(&b.h3_count),
        Column::InternalLinks => a.internal_link_count.cmp(&b.internal_link_count),
        Column::ExternalLinks => a.external_link_count.cmp(&b.external_link_count),
        Column::BrokenLinks => a.broken_links.len().cmp(&b.broken_links.len()),
        Column::LoginForm => a.has_login_form.cmp(&b.has_login_form),
    }
}
