// File: crates/trellis-core/tests/datasource.rs
// Purpose: In-memory dimensional source — grouping, top-N, and predicate exclusion.

use trellis_core::data::{FilterTarget, GroupSource, Predicate};
use trellis_core::{DataTable, Key};

struct Row {
    city: &'static str,
    year: i64,
    pop: f64,
}

fn table() -> DataTable<Row> {
    DataTable::new(vec![
        Row { city: "oslo", year: 2023, pop: 1.0 },
        Row { city: "oslo", year: 2024, pop: 2.0 },
        Row { city: "bergen", year: 2023, pop: 3.0 },
        Row { city: "bergen", year: 2024, pop: 4.0 },
        Row { city: "tromso", year: 2024, pop: 0.5 },
    ])
}

#[test]
fn group_sum_aggregates_in_first_appearance_order() {
    let t = table();
    let dim = t.dimension(|r: &Row| Key::from(r.city));
    let group = dim.group_sum(|r| r.pop);

    let bins = group.all();
    assert_eq!(bins.len(), 3);
    assert_eq!(bins[0].key, Key::from("oslo"));
    assert_eq!(bins[0].value, 3.0);
    assert_eq!(bins[1].key, Key::from("bergen"));
    assert_eq!(bins[1].value, 7.0);
    assert_eq!(bins[2].key, Key::from("tromso"));
}

#[test]
fn group_count_counts_rows() {
    let t = table();
    let dim = t.dimension(|r: &Row| Key::Int(r.year));
    let group = dim.group_count();

    let bins = group.all();
    let y2024 = bins.iter().find(|b| b.key == Key::Int(2024)).unwrap();
    assert_eq!(y2024.value, 3.0);
}

#[test]
fn top_orders_by_descending_value() {
    let t = table();
    let dim = t.dimension(|r: &Row| Key::from(r.city));
    let group = dim.group_sum(|r| r.pop);

    let top2 = group.top(2);
    assert_eq!(top2.len(), 2);
    assert_eq!(top2[0].key, Key::from("bergen"));
    assert_eq!(top2[1].key, Key::from("oslo"));
}

#[test]
fn a_dimension_ignores_its_own_predicate() {
    let t = table();
    let city_dim = t.dimension(|r: &Row| Key::from(r.city));
    let city_group = city_dim.group_sum(|r| r.pop);
    let year_dim = t.dimension(|r: &Row| Key::Int(r.year));
    let year_group = year_dim.group_sum(|r| r.pop);

    city_dim.apply(Some(Predicate::Exact(Key::from("oslo"))));

    // The city group still sees every city...
    assert_eq!(city_group.all().len(), 3);
    // ...while the year group only sees oslo rows.
    let years = year_group.all();
    assert_eq!(years.iter().find(|b| b.key == Key::Int(2023)).unwrap().value, 1.0);
    assert_eq!(years.iter().find(|b| b.key == Key::Int(2024)).unwrap().value, 2.0);

    // Clearing the predicate restores the full view.
    city_dim.apply(None);
    let years = year_group.all();
    assert_eq!(years.iter().find(|b| b.key == Key::Int(2023)).unwrap().value, 4.0);
}

#[test]
fn range_predicate_is_half_open() {
    let t = table();
    let year_dim = t.dimension(|r: &Row| Key::Int(r.year));
    let city_dim = t.dimension(|r: &Row| Key::from(r.city));
    let city_group = city_dim.group_count();

    year_dim.apply(Some(Predicate::Range(2023.0, 2024.0)));
    let cities = city_group.all();
    // Only 2023 rows remain: oslo and bergen, once each.
    assert_eq!(cities.len(), 2);
    assert!(cities.iter().all(|b| b.value == 1.0));
}

#[test]
fn extend_adds_rows_to_every_view() {
    let t = table();
    let dim = t.dimension(|r: &Row| Key::from(r.city));
    let group = dim.group_count();
    assert_eq!(t.len(), 5);

    t.extend(vec![Row { city: "oslo", year: 2025, pop: 2.5 }]);
    assert_eq!(t.len(), 6);
    let oslo = group.all().into_iter().find(|b| b.key == Key::from("oslo")).unwrap();
    assert_eq!(oslo.value, 3.0);
}
