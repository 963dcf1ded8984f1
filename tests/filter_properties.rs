//! Behavioural properties of the filter engines, option lists and itinerary.

use proptest::prelude::*;

use wanderlist::data::options::derive_options;
use wanderlist::{filter_travel, normalize, Bounds, Itinerary, Table, TravelCriteria};

const HEADER: [&str; 6] = [
    "Land / Regio",
    "Continent",
    "Seizoen",
    "Minimum duur",
    "Maximum duur",
    "Budget",
];

fn table(rows: &[[&str; 6]]) -> Table {
    let body: Vec<Vec<&str>> = rows.iter().map(|r| r.to_vec()).collect();
    normalize(&HEADER, &body)
}

fn durations(rows: &[(u32, u32, u32)]) -> Table {
    let body: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, (min, max, budget))| {
            vec![
                format!("D{i}"),
                "Europe".to_string(),
                String::new(),
                min.to_string(),
                max.to_string(),
                budget.to_string(),
            ]
        })
        .collect();
    normalize(&HEADER, &body)
}

fn names(table: &Table) -> Vec<String> {
    table.travel_records().into_iter().map(|r| r.name).collect()
}

#[test]
fn bali_oslo_scenario() {
    let table = table(&[
        ["Bali", "Asia", "Summer;Autumn", "5", "14", "800"],
        ["Oslo", "Europe", "Winter", "2", "4", "1200"],
    ]);
    let criteria = TravelCriteria {
        duration: Some(Bounds::new(7.0, 10.0)),
        budget: Some(Bounds::new(0.0, 1000.0)),
        continents: ["Asia".to_string()].into(),
        ..Default::default()
    };
    assert_eq!(names(&filter_travel(&table, &criteria)), ["Bali"]);
}

#[test]
fn overlap_examples() {
    let table = durations(&[(3, 10, 100), (3, 5, 100)]);
    let criteria = TravelCriteria {
        duration: Some(Bounds::new(7.0, 14.0)),
        ..Default::default()
    };
    assert_eq!(names(&filter_travel(&table, &criteria)), ["D0"]);
}

#[test]
fn season_any_match() {
    let table = table(&[["Bali", "Asia", "Summer;Winter", "5", "14", "800"]]);
    let mut criteria = TravelCriteria::default();
    criteria.seasons.insert("Winter".into());
    assert_eq!(filter_travel(&table, &criteria).len(), 1);

    criteria.seasons = ["Autumn".to_string()].into();
    assert!(filter_travel(&table, &criteria).is_empty());
}

#[test]
fn unparseable_budget_is_always_excluded() {
    let table = table(&[
        ["Lyon", "Europe", "Spring", "3", "10", "n/a"],
        ["Nice", "Europe", "Spring", "3", "10", "700"],
    ]);
    assert_eq!(names(&filter_travel(&table, &TravelCriteria::default())), ["Nice"]);

    let criteria = TravelCriteria {
        continents: ["Europe".to_string()].into(),
        ..Default::default()
    };
    assert_eq!(names(&filter_travel(&table, &criteria)), ["Nice"]);
}

#[test]
fn empty_criteria_keep_complete_rows_in_order() {
    let table = table(&[
        ["C", "Europe", "", "1", "2", "10"],
        ["A", "Europe", "", "", "2", "10"],
        ["B", "Asia", "", "1", "2", "10"],
    ]);
    let result = filter_travel(&table, &TravelCriteria::default());
    assert_eq!(names(&result), ["C", "B"]);
}

#[test]
fn filtering_does_not_touch_the_input() {
    let table = durations(&[(1, 2, 100), (5, 9, 100)]);
    let before = table.clone();
    let criteria = TravelCriteria {
        duration: Some(Bounds::new(4.0, 4.0)),
        ..Default::default()
    };
    assert!(filter_travel(&table, &criteria).is_empty());
    assert_eq!(table, before);
}

#[test]
fn season_options_are_split_and_sorted() {
    let table = table(&[
        ["A", "Asia", "Summer;Winter", "1", "2", "3"],
        ["B", "Asia", "Autumn", "1", "2", "3"],
        ["C", "Asia", "", "1", "2", "3"],
    ]);
    let options: Vec<String> = derive_options(&table, "seizoen", true).into_iter().collect();
    assert_eq!(options, ["Autumn", "Summer", "Winter"]);
}

#[test]
fn itinerary_keeps_call_order_across_exports() {
    let mut itinerary = Itinerary::new();
    for destination in ["Ubud", "Kyoto", "Cusco"] {
        itinerary.append_day(destination, None, None, None);
    }
    let first: Vec<String> = itinerary
        .export()
        .iter()
        .map(|d| d.destination.clone())
        .collect();
    assert_eq!(first, ["Ubud", "Kyoto", "Cusco"]);
    assert_eq!(itinerary.export(), itinerary.export());
}

proptest! {
    #[test]
    fn duration_kept_iff_intervals_overlap(
        min in 0u32..30,
        span in 0u32..30,
        a in 0u32..40,
        b in 0u32..40,
    ) {
        let max = min + span;
        let table = durations(&[(min, max, 100)]);
        let criteria = TravelCriteria {
            duration: Some(Bounds::new(f64::from(a), f64::from(b))),
            ..Default::default()
        };
        let kept = filter_travel(&table, &criteria).len() == 1;
        prop_assert_eq!(kept, max >= a && min <= b);
    }

    #[test]
    fn filtering_is_idempotent(
        rows in prop::collection::vec((0u32..20, 0u32..20, 0u32..3000), 0..20),
        lo in 0u32..20,
        hi in 0u32..30,
        budget_cap in 0u32..3000,
    ) {
        let rows: Vec<(u32, u32, u32)> = rows
            .into_iter()
            .map(|(min, span, budget)| (min, min + span, budget))
            .collect();
        let table = durations(&rows);
        let criteria = TravelCriteria {
            duration: Some(Bounds::new(f64::from(lo), f64::from(hi))),
            budget: Some(Bounds::new(0.0, f64::from(budget_cap))),
            ..Default::default()
        };
        let once = filter_travel(&table, &criteria);
        let twice = filter_travel(&once, &criteria);
        prop_assert_eq!(once, twice);
    }
}
