//! Loading tables from disk, the session state on top of them, and the
//! destination write path.

use std::fs;
use std::time::Duration;

use tempfile::tempdir;

use wanderlist::data::loader::{load_file, read_raw};
use wanderlist::data::source::{CachedSource, FileSource, TableSource};
use wanderlist::data::writer::{append_destination, NewDestination};
use wanderlist::error::SourceError;
use wanderlist::export::{render, ExportFormat};
use wanderlist::{AppState, Bounds, ItineraryDay, Meal, TravelDimension};

const TRAVEL_CSV: &str = "\
 Land / Regio ,Land,Regio,Stad,Continent,Seizoen,Vervoersmiddel,Minimum duur,Maximum duur,Budget,Temperatuur
Indonesië / Bali,Indonesië,Bali,Ubud,Azië,Zomer;Herfst,Vliegtuig,5,14,800,29
Noorwegen / Oslo,Noorwegen,Oslo,Oslo,Europa,Winter,Trein;Auto,2,4,1200,-2
Frankrijk / Rhône,Frankrijk,Rhône,Lyon,Europa,Lente
";

const RESTAURANT_JSON: &str = r#"{
  "range": "Restaurants!A1:G",
  "values": [
    ["Naam", "Keuken", "Stad", "Prijs", "Maaltijd"],
    ["Warung", "Lokaal", "Ubud", "€", "ontbijt;lunch"],
    ["Locavore", "Lokaal", "Ubud", "€€€€", "diner"],
    ["Maaemo", "Noords", "Oslo", 4, "Diner"]
  ]
}"#;

#[test]
fn ragged_csv_is_padded_and_filterable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("travel.csv");
    fs::write(&path, TRAVEL_CSV).unwrap();

    let raw = read_raw(&path).unwrap();
    assert_eq!(raw.rows.len(), 3);

    let table = load_file(&path).unwrap();
    assert_eq!(table.columns()[0], "land / regio");
    assert_eq!(table.len(), 3);
    assert!(table.rows().all(|row| row.cells().len() == table.columns().len()));

    // Lyon has no durations or budget and never shows up
    let names: Vec<String> = table.travel_records().into_iter().map(|r| r.name).collect();
    assert_eq!(names, ["Indonesië / Bali", "Noorwegen / Oslo"]);
}

#[test]
fn unsupported_extension_is_a_typed_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("travel.xlsx");
    fs::write(&path, "whatever").unwrap();

    let err = read_raw(&path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SourceError>(),
        Some(SourceError::UnsupportedFormat(ext)) if ext == "xlsx"
    ));
}

#[test]
fn empty_file_is_no_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("travel.csv");
    fs::write(&path, "").unwrap();

    let mut state = AppState::default();
    state.reload(&mut FileSource::new(&path)).unwrap();
    assert!(state.travel.is_empty());
    assert!(state.visible_travel.is_empty());
    assert_eq!(state.status_message.as_deref(), Some("No destinations found."));
}

#[test]
fn session_filters_plans_and_exports() {
    let dir = tempdir().unwrap();
    let travel = dir.path().join("travel.csv");
    let restaurants = dir.path().join("restaurants.json");
    fs::write(&travel, TRAVEL_CSV).unwrap();
    fs::write(&restaurants, RESTAURANT_JSON).unwrap();

    let mut source = CachedSource::with_ttl(
        FileSource::new(&travel).with_restaurants(&restaurants),
        Duration::from_secs(60),
    );
    let mut state = AppState::default();
    state.reload(&mut source).unwrap();
    assert_eq!(state.visible_travel, [0, 1]);

    state.set_temperature(Some(Bounds::new(-5.0, 5.0)));
    assert_eq!(state.visible_travel, [1]);
    state.set_temperature(None);

    state.toggle_travel(TravelDimension::TransportMode, "Vliegtuig");
    let visible = state.visible_travel_table().travel_records();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].city, "Ubud");

    let dinner = state.meal_options(&visible[0].city, Meal::Dinner);
    assert_eq!(dinner.iter().collect::<Vec<_>>(), ["Locavore"]);

    state.set_price(Some(Bounds::new(4, 4)));
    let pricey: Vec<String> = state
        .visible_restaurant_table()
        .restaurant_records()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(pricey, ["Locavore", "Maaemo"]);

    state.plan_day(ItineraryDay::new("Ubud").with_meal(Meal::Dinner, "Locavore"));
    state.plan_day(ItineraryDay::new("Oslo"));
    let text = String::from_utf8(render(state.itinerary.export(), ExportFormat::Text).unwrap())
        .unwrap();
    assert!(text.contains("Day 1: Ubud"));
    assert!(text.contains("Day 2: Oslo"));
    assert!(text.contains("  Dinner: Locavore"));
}

#[test]
fn cached_source_survives_file_changes_until_invalidated() {
    let dir = tempdir().unwrap();
    let travel = dir.path().join("travel.csv");
    fs::write(&travel, TRAVEL_CSV).unwrap();

    let mut source = CachedSource::new(FileSource::new(&travel));
    assert_eq!(source.load_travel().unwrap().rows.len(), 3);

    fs::write(&travel, "Budget\n10\n").unwrap();
    assert_eq!(source.load_travel().unwrap().rows.len(), 3);

    source.invalidate();
    assert_eq!(source.load_travel().unwrap().rows.len(), 1);
}

#[test]
fn appended_destinations_can_be_filtered() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("new.csv");

    let kyoto = NewDestination {
        name: "Japan / Kansai".into(),
        country: "Japan".into(),
        continent: "Azië".into(),
        seasons: vec!["Lente".into(), "Herfst".into()],
        min_duration_days: 4,
        max_duration_days: 12,
        budget: 1800.0,
        temperature: Some(16.0),
        ..Default::default()
    };
    append_destination(&path, &kyoto).unwrap();
    append_destination(
        &path,
        &NewDestination {
            name: "Peru / Cusco".into(),
            min_duration_days: 7,
            max_duration_days: 21,
            budget: 1500.0,
            ..Default::default()
        },
    )
    .unwrap();

    let table = load_file(&path).unwrap();
    assert_eq!(table.len(), 2);
    let records = table.travel_records();
    assert_eq!(records[0].seasons(), ["Lente", "Herfst"]);
    assert_eq!(records[1].temperature, None);
}

#[test]
fn appending_follows_an_existing_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("travel.csv");
    fs::write(&path, "Budget,Land / Regio,Minimum duur,Maximum duur\n").unwrap();

    append_destination(
        &path,
        &NewDestination {
            name: "Marokko / Marrakech".into(),
            min_duration_days: 3,
            max_duration_days: 7,
            budget: 650.0,
            ..Default::default()
        },
    )
    .unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().nth(1), Some("650,Marokko / Marrakech,3,7"));
}

#[test]
fn appending_after_an_unterminated_last_row_keeps_it_intact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("travel.csv");
    fs::write(
        &path,
        "Land / Regio,Minimum duur,Maximum duur,Budget\nBali,5,14,800",
    )
    .unwrap();

    append_destination(
        &path,
        &NewDestination {
            name: "Oslo".into(),
            min_duration_days: 2,
            max_duration_days: 4,
            budget: 1200.0,
            ..Default::default()
        },
    )
    .unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().collect::<Vec<_>>()[1..], ["Bali,5,14,800", "Oslo,2,4,1200"]);

    let names: Vec<String> = load_file(&path)
        .unwrap()
        .travel_records()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, ["Bali", "Oslo"]);
}
