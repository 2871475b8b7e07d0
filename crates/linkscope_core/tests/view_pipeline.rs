use linkscope_core::{
    derive_page, BrokenLink, Column, Record, RecordStatus, SortDirection, SortSpec, ViewState,
};

fn record(id: u64, url: &str, status: RecordStatus) -> Record {
    Record {
        status,
        ..Record::new(id, url)
    }
}

/// The pair of records used throughout: insertion order is newest-first, so
/// test.com (added second) comes before example.com by default.
fn example_and_test() -> Vec<Record> {
    let queued = record(1, "https://example.com", RecordStatus::Queued);
    let done = Record {
        broken_links: vec![BrokenLink {
            url: "https://bad.com".to_string(),
            status_code: 404,
        }],
        ..record(2, "https://test.com", RecordStatus::Done)
    };
    vec![done, queued]
}

#[test]
fn global_filter_matches_single_record() {
    let records = example_and_test();
    let view = ViewState {
        global_filter: "test".to_string(),
        ..ViewState::default()
    };

    let page = derive_page(&records, &view);
    assert_eq!(page.filtered_count, 1);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].url, "https://test.com");
}

#[test]
fn status_sort_is_lexicographic() {
    let records = example_and_test();
    let view = ViewState {
        sort: Some(SortSpec {
            column: Column::Status,
            direction: SortDirection::Ascending,
        }),
        ..ViewState::default()
    };

    // "done" < "queued" lexicographically, so the done record leads.
    let page = derive_page(&records, &view);
    let statuses: Vec<&str> = page.rows.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(statuses, vec!["done", "queued"]);
}

#[test]
fn global_filter_is_case_insensitive_across_columns() {
    let mut records = example_and_test();
    records[0].title = "Broken Link Report".to_string();

    let view = ViewState {
        global_filter: "BROKEN LINK".to_string(),
        ..ViewState::default()
    };
    let page = derive_page(&records, &view);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].id, 2);
}

#[test]
fn column_filters_combine_with_the_global_filter() {
    let records = vec![
        record(3, "https://test.example.com", RecordStatus::Done),
        record(2, "https://test.com", RecordStatus::Queued),
        record(1, "https://other.com", RecordStatus::Queued),
    ];

    let mut view = ViewState {
        global_filter: "test".to_string(),
        ..ViewState::default()
    };
    view.set_column_filter(Column::Status, "queued".to_string());

    let page = derive_page(&records, &view);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].id, 2);
}

#[test]
fn clearing_a_column_filter_restores_rows() {
    let records = example_and_test();
    let mut view = ViewState::default();
    view.set_column_filter(Column::Status, "done".to_string());
    assert_eq!(derive_page(&records, &view).filtered_count, 1);

    view.set_column_filter(Column::Status, "  ".to_string());
    assert_eq!(derive_page(&records, &view).filtered_count, 2);
}

#[test]
fn numeric_columns_sort_numerically() {
    let mut a = record(1, "https://a.example.com", RecordStatus::Done);
    a.internal_link_count = 10;
    let mut b = record(2, "https://b.example.com", RecordStatus::Done);
    b.internal_link_count = 2;

    let view = ViewState {
        sort: Some(SortSpec {
            column: Column::InternalLinks,
            direction: SortDirection::Ascending,
        }),
        ..ViewState::default()
    };

    // Lexicographic text order would put "10" before "2".
    let page = derive_page(&[b, a], &view);
    let counts: Vec<u32> = page.rows.iter().map(|r| r.internal_link_count).collect();
    assert_eq!(counts, vec![2, 10]);
}

#[test]
fn sort_is_stable_and_repeatable() {
    let records = vec![
        record(3, "https://c.example.com", RecordStatus::Queued),
        record(2, "https://b.example.com", RecordStatus::Queued),
        record(1, "https://a.example.com", RecordStatus::Queued),
    ];
    let view = ViewState {
        sort: Some(SortSpec {
            column: Column::Status,
            direction: SortDirection::Ascending,
        }),
        ..ViewState::default()
    };

    let first = derive_page(&records, &view);
    let second = derive_page(&records, &view);

    // Equal keys keep insertion order, and re-sorting changes nothing.
    let ids: Vec<u64> = first.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(first, second);
}

#[test]
fn default_order_is_newest_first() {
    let records = example_and_test();
    let page = derive_page(&records, &ViewState::default());
    let ids: Vec<u64> = page.rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn descending_sort_reverses_the_order() {
    let records = example_and_test();
    let view = ViewState {
        sort: Some(SortSpec {
            column: Column::Url,
            direction: SortDirection::Descending,
        }),
        ..ViewState::default()
    };
    let page = derive_page(&records, &view);
    let urls: Vec<&str> = page.rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://test.com", "https://example.com"]);
}

#[test]
fn pagination_slices_and_reports_counts() {
    let records: Vec<Record> = (1..=12)
        .map(|id| record(id, "https://example.com", RecordStatus::Queued))
        .collect();

    let view = ViewState {
        page_index: 1,
        page_size: 5,
        ..ViewState::default()
    };
    let page = derive_page(&records, &view);

    assert_eq!(page.page_count, 3);
    assert_eq!(page.page_index, 1);
    assert_eq!(page.filtered_count, 12);
    assert_eq!(page.rows.len(), 5);
}

#[test]
fn out_of_range_page_clamps_to_last_valid_page() {
    let records: Vec<Record> = (1..=7)
        .map(|id| record(id, "https://example.com", RecordStatus::Queued))
        .collect();

    let view = ViewState {
        page_index: 9,
        page_size: 5,
        ..ViewState::default()
    };
    let page = derive_page(&records, &view);

    assert_eq!(page.page_index, 1);
    assert_eq!(page.rows.len(), 2);
}

#[test]
fn empty_result_set_clamps_to_page_zero() {
    let records = example_and_test();
    let view = ViewState {
        global_filter: "matches nothing".to_string(),
        page_index: 4,
        ..ViewState::default()
    };
    let page = derive_page(&records, &view);

    assert_eq!(page.page_index, 0);
    assert_eq!(page.page_count, 0);
    assert!(page.rows.is_empty());
}

#[test]
fn derivation_is_pure() {
    let records = example_and_test();
    let before = records.clone();
    let view = ViewState {
        global_filter: "example".to_string(),
        sort: Some(SortSpec {
            column: Column::Url,
            direction: SortDirection::Ascending,
        }),
        ..ViewState::default()
    };

    let first = derive_page(&records, &view);
    let second = derive_page(&records, &view);

    assert_eq!(first, second);
    assert_eq!(records, before);
}

#[test]
fn page_size_is_validated() {
    let mut view = ViewState {
        page_index: 3,
        ..ViewState::default()
    };

    assert!(!view.set_page_size(7));
    assert_eq!(view.page_size, 5);
    assert_eq!(view.page_index, 3);

    assert!(view.set_page_size(20));
    assert_eq!(view.page_size, 20);
    assert_eq!(view.page_index, 0);
}

#[test]
fn sort_cycles_through_directions() {
    let mut view = ViewState::default();

    view.cycle_sort(Column::Url);
    assert_eq!(
        view.sort,
        Some(SortSpec {
            column: Column::Url,
            direction: SortDirection::Ascending
        })
    );

    view.cycle_sort(Column::Url);
    assert_eq!(
        view.sort,
        Some(SortSpec {
            column: Column::Url,
            direction: SortDirection::Descending
        })
    );

    view.cycle_sort(Column::Url);
    assert_eq!(view.sort, None);

    // A different column restarts ascending.
    view.cycle_sort(Column::Status);
    view.cycle_sort(Column::Title);
    assert_eq!(
        view.sort,
        Some(SortSpec {
            column: Column::Title,
            direction: SortDirection::Ascending
        })
    );
}
