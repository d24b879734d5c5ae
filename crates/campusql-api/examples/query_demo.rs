/// Example demonstrating filtering, projection and ordering in CampusQL
use campusql::logging::LogConfig;
use campusql::{Catalog, Kind, QueryEngine, Record, ResultRow};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=debug shows per-stage row counts
    let _guard = LogConfig::info().init();

    println!("CampusQL Query Demo");
    println!("===================\n");

    let catalog = Catalog::new();
    catalog.add_dataset(
        "ubc",
        Kind::Sections,
        vec![
            create_section("cpsc", "310", 85.5, "holmes, reid", 2015),
            create_section("cpsc", "110", 72.25, "kiczales, gregor", 2016),
            create_section("math", "100", 91.0, "Adams, carl", 2015),
            create_section("biol", "112", 64.0, "zed, ann", 2014),
        ],
    )?;
    let engine = QueryEngine::new(catalog);

    // Example 1: comparison filter
    println!("1. Sections averaging above 80, ordered by average:");
    let rows = engine.perform_query(&json!({
        "WHERE": {"GT": {"ubc_avg": 80}},
        "OPTIONS": {"COLUMNS": ["ubc_dept", "ubc_id", "ubc_avg"], "ORDER": "ubc_avg"}
    }))?;
    print_results(&rows);

    // Example 2: wildcard match with negation
    println!("2. Sections outside cpsc taught by anyone with a comma in their name:");
    let rows = engine.perform_query(&json!({
        "WHERE": {"AND": [
            {"NOT": {"IS": {"ubc_dept": "cp*"}}},
            {"IS": {"ubc_instructor": "*, *"}}
        ]},
        "OPTIONS": {"COLUMNS": ["ubc_dept", "ubc_instructor"], "ORDER": "ubc_instructor"}
    }))?;
    print_results(&rows);

    // Example 3: multi-key descending order
    println!("3. Everything, newest year first, then highest average:");
    let rows = engine.perform_query_str(
        r#"{
            "WHERE": {},
            "OPTIONS": {
                "COLUMNS": ["ubc_year", "ubc_avg", "ubc_dept"],
                "ORDER": {"dir": "DOWN", "keys": ["ubc_year", "ubc_avg"]}
            }
        }"#,
    )?;
    print_results(&rows);

    // Example 4: errors
    println!("4. A query mixing two datasets:");
    match engine.perform_query(&json!({
        "WHERE": {"GT": {"ubc_avg": 80}},
        "OPTIONS": {"COLUMNS": ["rooms_name"]}
    })) {
        Ok(_) => println!("   unexpectedly succeeded"),
        Err(e) => println!("   {} ({:?})\n", e, e.category()),
    }

    Ok(())
}

fn create_section(dept: &str, id: &str, avg: f64, instructor: &str, year: i64) -> Record {
    Record::new()
        .with("dept", dept)
        .with("id", id)
        .with("avg", avg)
        .with("instructor", instructor)
        .with("year", year)
}

fn print_results(rows: &[ResultRow]) {
    for row in rows {
        println!("   {}", serde_json::to_string(row).unwrap_or_default());
    }
    println!("   ({} rows)\n", rows.len());
}
