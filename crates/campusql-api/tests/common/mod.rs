// Shared fixtures for query integration tests

use campusql::{Catalog, Kind, QueryEngine, Record, ResultRow, Value};

fn section(
    dept: &str,
    id: &str,
    avg: f64,
    instructor: &str,
    uuid: &str,
    year: f64,
    pass: f64,
) -> Record {
    Record::new()
        .with("dept", dept)
        .with("id", id)
        .with("avg", avg)
        .with("instructor", instructor)
        .with("title", format!("{} {}", dept, id))
        .with("uuid", uuid)
        .with("year", year)
        .with("pass", pass)
        .with("fail", 5.0)
        .with("audit", 0.0)
}

fn room(shortname: &str, number: &str, seats: f64, furniture: &str) -> Record {
    Record::new()
        .with("shortname", shortname)
        .with("fullname", format!("{} Building", shortname))
        .with("room_number", number)
        .with("room_name", format!("{}_{}", shortname, number))
        .with("address", "6245 Agronomy Road V6T 1Z4")
        .with("type", "Small Group")
        .with("furniture", furniture)
        .with("href", format!("http://rooms.example/{}-{}", shortname, number))
        .with("seats", seats)
        .with("lat", 49.26125)
        .with("lon", -123.24807)
}

pub fn sections() -> Vec<Record> {
    vec![
        section("cpsc", "310", 85.5, "holmes, reid", "1001", 2015.0, 100.0),
        section("cpsc", "310", 78.25, "baniassad, elisa", "1002", 2016.0, 80.0),
        section("cpsc", "110", 81.17, "kiczales, gregor", "1003", 2015.0, 200.0),
        section("cpsc", "110", 81.18, "", "1004", 1900.0, 210.0),
        section("math", "100", 77.13, "Adams, carl", "1005", 2015.0, 150.0),
        section("math", "200", 96.0, "brown, lee", "1006", 2016.0, 30.0),
        section("biol", "112", 62.5, "zed, ann", "1007", 2014.0, 45.0),
    ]
}

pub fn rooms() -> Vec<Record> {
    vec![
        room("DMP", "310", 160.0, "Classroom-Fixed Tables/Movable Chairs"),
        room("DMP", "110", 120.0, "Classroom-Fixed Tablets"),
        room("ANGU", "098", 260.0, "Classroom-Fixed Tables/Movable Chairs"),
        room("ANGU", "037", 54.0, "Classroom-Movable Tables & Chairs"),
        room("ALRD", "105", 94.0, "Classroom-Fixed Tablets"),
    ]
}

/// Engine over a catalog holding `sections` and `rooms`
#[allow(dead_code)]
pub fn engine() -> QueryEngine<Catalog> {
    let catalog = Catalog::new();
    catalog
        .add_dataset("sections", Kind::Sections, sections())
        .expect("Failed to add sections");
    catalog
        .add_dataset("rooms", Kind::Rooms, rooms())
        .expect("Failed to add rooms");
    QueryEngine::new(catalog)
}

/// Values of one column, in row order
#[allow(dead_code)]
pub fn column(rows: &[ResultRow], name: &str) -> Vec<Value> {
    rows.iter()
        .map(|row| row.get(name).cloned().expect("column missing from row"))
        .collect()
}

/// Text values of one column, in row order
#[allow(dead_code)]
pub fn text_column(rows: &[ResultRow], name: &str) -> Vec<String> {
    column(rows, name).iter().map(Value::to_string).collect()
}
