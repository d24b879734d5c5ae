/// Example demonstrating GROUP and APPLY over a rooms dataset
use campusql::{Catalog, Kind, QueryEngine, ResultRow};
use serde_json::json;

const ROOMS: &str = r#"[
    {"shortname": "DMP", "room_number": "310", "room_name": "DMP_310", "seats": 160, "furniture": "Classroom-Fixed Tables/Movable Chairs"},
    {"shortname": "DMP", "room_number": "110", "room_name": "DMP_110", "seats": 120, "furniture": "Classroom-Fixed Tablets"},
    {"shortname": "ANGU", "room_number": "098", "room_name": "ANGU_098", "seats": 260, "furniture": "Classroom-Fixed Tables/Movable Chairs"},
    {"shortname": "ANGU", "room_number": "037", "room_name": "ANGU_037", "seats": 54, "furniture": "Classroom-Movable Tables & Chairs"},
    {"shortname": "ALRD", "room_number": "105", "room_name": "ALRD_105", "seats": 94, "furniture": "Classroom-Fixed Tablets"}
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("CampusQL Aggregate Demo");
    println!("=======================\n");

    let catalog = Catalog::new();
    catalog.add_dataset_json("rooms", Kind::Rooms, ROOMS)?;
    for info in catalog.list_datasets()? {
        println!("Loaded {}", serde_json::to_string(&info)?);
    }
    println!();

    let engine = QueryEngine::new(catalog);

    // Example 1: one row per building
    println!("1. Seats per building (MAX, MIN, SUM, AVG, COUNT):");
    let rows = engine.perform_query(&json!({
        "WHERE": {},
        "OPTIONS": {
            "COLUMNS": ["rooms_shortname", "maxSeats", "minSeats", "totalSeats", "avgSeats", "rooms"],
            "ORDER": {"dir": "DOWN", "keys": ["totalSeats"]}
        },
        "TRANSFORMATIONS": {
            "GROUP": ["rooms_shortname"],
            "APPLY": [
                {"maxSeats": {"MAX": "rooms_seats"}},
                {"minSeats": {"MIN": "rooms_seats"}},
                {"totalSeats": {"SUM": "rooms_seats"}},
                {"avgSeats": {"AVG": "rooms_seats"}},
                {"rooms": {"COUNT": "rooms_name"}}
            ]
        }
    }))?;
    print_results(&rows);

    // Example 2: filter first, then group
    println!("2. Buildings with table seating, largest room first:");
    let rows = engine.perform_query(&json!({
        "WHERE": {"IS": {"rooms_furniture": "*Tables*"}},
        "OPTIONS": {
            "COLUMNS": ["rooms_shortname", "maxSeats"],
            "ORDER": {"dir": "DOWN", "keys": ["maxSeats", "rooms_shortname"]}
        },
        "TRANSFORMATIONS": {
            "GROUP": ["rooms_shortname"],
            "APPLY": [{"maxSeats": {"MAX": "rooms_seats"}}]
        }
    }))?;
    print_results(&rows);

    // Example 3: aggregating text is a runtime error
    println!("3. AVG over a text field:");
    let result = engine.perform_query(&json!({
        "WHERE": {},
        "OPTIONS": {"COLUMNS": ["rooms_shortname", "x"]},
        "TRANSFORMATIONS": {"GROUP": ["rooms_shortname"], "APPLY": [{"x": {"AVG": "rooms_furniture"}}]}
    }));
    if let Err(e) = result {
        println!("   {}\n", e);
    }

    Ok(())
}

fn print_results(rows: &[ResultRow]) {
    for row in rows {
        let cells: Vec<String> = row.iter().map(|(c, v)| format!("{}={}", c, v)).collect();
        println!("   {}", cells.join(", "));
    }
    println!();
}
