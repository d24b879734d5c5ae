#![no_main]

use arbitrary::Arbitrary;
use campusql::{Catalog, Kind, QueryEngine, Record};
use libfuzzer_sys::fuzz_target;
use serde_json::{json, Value as JsonValue};

const FIELDS: [&str; 6] = ["avg", "year", "pass", "dept", "instructor", "uuid"];
const TOKENS: [&str; 5] = ["MAX", "MIN", "AVG", "COUNT", "SUM"];

#[derive(Arbitrary, Debug)]
enum FuzzFilter {
    Empty,
    Gt(u8, i16),
    Lt(u8, i16),
    Eq(u8, i16),
    Is(u8, String),
    Not(Box<FuzzFilter>),
    And(Vec<FuzzFilter>),
    Or(Vec<FuzzFilter>),
}

#[derive(Arbitrary, Debug)]
struct FuzzQuery {
    filter: FuzzFilter,
    columns: Vec<u8>,
    group: Option<(u8, Vec<(u8, u8)>)>,
    order: Option<(bool, Vec<u8>)>,
}

fn key(i: u8) -> String {
    format!("ubc_{}", FIELDS[i as usize % FIELDS.len()])
}

fn filter_json(filter: &FuzzFilter, depth: usize) -> JsonValue {
    if depth > 8 {
        return json!({"GT": {"ubc_avg": 0}});
    }
    match filter {
        FuzzFilter::Empty => json!({}),
        FuzzFilter::Gt(k, v) => json!({"GT": {key(*k): v}}),
        FuzzFilter::Lt(k, v) => json!({"LT": {key(*k): v}}),
        FuzzFilter::Eq(k, v) => json!({"EQ": {key(*k): v}}),
        FuzzFilter::Is(k, s) => json!({"IS": {key(*k): s}}),
        FuzzFilter::Not(inner) => json!({"NOT": filter_json(inner, depth + 1)}),
        FuzzFilter::And(items) => json!({"AND": items.iter().take(4).map(|f| filter_json(f, depth + 1)).collect::<Vec<_>>()}),
        FuzzFilter::Or(items) => json!({"OR": items.iter().take(4).map(|f| filter_json(f, depth + 1)).collect::<Vec<_>>()}),
    }
}

fn fixture() -> QueryEngine<Catalog> {
    let catalog = Catalog::new();
    let records = (0..40)
        .map(|i| {
            Record::new()
                .with("dept", ["cpsc", "math", "Biol"][i % 3])
                .with("avg", 60.0 + i as f64 * 0.75)
                .with("year", (2010 + i % 5) as f64)
                .with("pass", (i * 7 % 50) as f64)
                .with("instructor", format!("prof, {}", i % 6))
                .with("uuid", format!("{}", i))
        })
        .collect();
    let _ = catalog.add_dataset("ubc", Kind::Sections, records);
    QueryEngine::new(catalog)
}

fuzz_target!(|input: FuzzQuery| {
    let mut columns: Vec<String> = input.columns.iter().take(6).map(|c| key(*c)).collect();
    let mut document = json!({"WHERE": filter_json(&input.filter, 0)});

    if let Some((group, rules)) = &input.group {
        let apply: Vec<JsonValue> = rules
            .iter()
            .take(4)
            .enumerate()
            .map(|(n, (token, field))| {
                json!({format!("agg{}", n): {TOKENS[*token as usize % TOKENS.len()]: key(*field)}})
            })
            .collect();
        columns = vec![key(*group)];
        columns.extend((0..apply.len()).map(|n| format!("agg{}", n)));
        document["TRANSFORMATIONS"] = json!({"GROUP": [key(*group)], "APPLY": apply});
    }

    let mut options = json!({"COLUMNS": columns});
    if let Some((down, picks)) = &input.order {
        let keys: Vec<&String> = picks
            .iter()
            .take(3)
            .filter_map(|p| columns.get(*p as usize % columns.len().max(1)))
            .collect();
        if !keys.is_empty() {
            options["ORDER"] = json!({"dir": if *down { "DOWN" } else { "UP" }, "keys": keys});
        }
    }
    document["OPTIONS"] = options;

    // Errors are fine, panics are not
    let _ = fixture().perform_query(&document);
});
