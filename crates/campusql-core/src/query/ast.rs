/// Abstract Syntax Tree (AST) node types for JSON queries
///
/// Defines the structure of compiled queries: WHERE filters, OPTIONS
/// (columns and ordering) and TRANSFORMATIONS (grouping and aggregation).
use crate::schema::Field;
use serde_json::{json, Map, Value as JsonValue};
use std::fmt;

/// A compiled query against exactly one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub options: Options,
    pub transformations: Option<Transformations>,
    dataset_id: String,
}

impl Query {
    pub(crate) fn new(
        filter: Filter,
        options: Options,
        transformations: Option<Transformations>,
        dataset_id: String,
    ) -> Self {
        Self {
            filter,
            options,
            transformations,
            dataset_id,
        }
    }

    /// The single dataset id every key in the query refers to
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Every dataset key in the query: filter, columns, order, group, apply
    pub fn keys(&self) -> Vec<&Key> {
        collect_keys(&self.filter, &self.options, self.transformations.as_ref())
    }

    /// Renders the query back into its wire shape
    pub fn to_json(&self) -> JsonValue {
        let mut doc = Map::new();
        doc.insert("WHERE".to_string(), self.filter.to_json());
        doc.insert("OPTIONS".to_string(), self.options.to_json());
        if let Some(ref transformations) = self.transformations {
            doc.insert("TRANSFORMATIONS".to_string(), transformations.to_json());
        }
        JsonValue::Object(doc)
    }
}

pub(crate) fn collect_keys<'a>(
    filter: &'a Filter,
    options: &'a Options,
    transformations: Option<&'a Transformations>,
) -> Vec<&'a Key> {
    let mut keys = Vec::new();
    filter.collect_keys(&mut keys);
    keys.extend(options.columns.iter().filter_map(AnyKey::as_key));
    if let Some(ref order) = options.order {
        keys.extend(order.keys().iter().filter_map(AnyKey::as_key));
    }
    if let Some(transformations) = transformations {
        keys.extend(transformations.group.iter());
        keys.extend(transformations.apply.iter().map(|rule| &rule.key));
    }
    keys
}

/// `<datasetId>_<field>` reference to a dataset column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub dataset_id: String,
    pub field: Field,
}

impl Key {
    pub fn new(dataset_id: impl Into<String>, field: Field) -> Self {
        Self {
            dataset_id: dataset_id.into(),
            field,
        }
    }
}

/// A dataset key or the name of an APPLY-produced column
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnyKey {
    Key(Key),
    Apply(String),
}

impl AnyKey {
    pub fn as_key(&self) -> Option<&Key> {
        match self {
            AnyKey::Key(key) => Some(key),
            AnyKey::Apply(_) => None,
        }
    }

    /// Column name in result rows
    pub fn column_name(&self) -> String {
        self.to_string()
    }
}

/// WHERE predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `WHERE: {}`, matches everything
    Empty,
    Logic {
        op: LogicOperator,
        operands: Vec<Filter>,
    },
    Compare {
        op: Comparator,
        key: Key,
        value: f64,
    },
    Match {
        key: Key,
        pattern: Pattern,
    },
    Not(Box<Filter>),
}

impl Filter {
    fn collect_keys<'a>(&'a self, keys: &mut Vec<&'a Key>) {
        match self {
            Filter::Empty => {}
            Filter::Logic { operands, .. } => {
                for operand in operands {
                    operand.collect_keys(keys);
                }
            }
            Filter::Compare { key, .. } | Filter::Match { key, .. } => keys.push(key),
            Filter::Not(inner) => inner.collect_keys(keys),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Filter::Empty => json!({}),
            Filter::Logic { op, operands } => {
                let operands: Vec<JsonValue> = operands.iter().map(Filter::to_json).collect();
                single_entry(op.to_string(), JsonValue::Array(operands))
            }
            Filter::Compare { op, key, value } => {
                single_entry(op.to_string(), single_entry(key.to_string(), json!(value)))
            }
            Filter::Match { key, pattern } => single_entry(
                "IS".to_string(),
                single_entry(key.to_string(), json!(pattern.to_string())),
            ),
            Filter::Not(inner) => single_entry("NOT".to_string(), inner.to_json()),
        }
    }
}

fn single_entry(key: String, value: JsonValue) -> JsonValue {
    let mut map = Map::new();
    map.insert(key, value);
    JsonValue::Object(map)
}

/// AND / OR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOperator {
    And,
    Or,
}

/// LT / GT / EQ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Gt,
    Eq,
}

impl Comparator {
    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            Comparator::Lt => left < right,
            Comparator::Gt => left > right,
            Comparator::Eq => left == right,
        }
    }
}

/// IS pattern, classified by where its wildcards sit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// `abc`
    Exact(String),
    /// `abc*`
    Prefix(String),
    /// `*abc`
    Suffix(String),
    /// `*abc*`
    Contains(String),
}

impl Pattern {
    /// Classifies an input string; `None` if a `*` sits anywhere but the ends.
    pub fn parse(input: &str) -> Option<Pattern> {
        let leading = input.starts_with('*');
        let body = if leading { &input[1..] } else { input };
        let trailing = body.ends_with('*');
        let body = if trailing { &body[..body.len() - 1] } else { body };

        if body.contains('*') {
            return None;
        }

        let body = body.to_string();
        Some(match (leading, trailing) {
            (true, true) => Pattern::Contains(body),
            (true, false) => Pattern::Suffix(body),
            (false, true) => Pattern::Prefix(body),
            (false, false) => Pattern::Exact(body),
        })
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Exact(s) => value == s,
            Pattern::Prefix(s) => value.starts_with(s.as_str()),
            Pattern::Suffix(s) => value.ends_with(s.as_str()),
            Pattern::Contains(s) => value.contains(s.as_str()),
        }
    }
}

/// GROUP and APPLY
#[derive(Debug, Clone, PartialEq)]
pub struct Transformations {
    pub group: Vec<Key>,
    pub apply: Vec<ApplyRule>,
}

impl Transformations {
    /// Whether a column may be addressed after aggregation
    pub fn provides(&self, column: &AnyKey) -> bool {
        match column {
            AnyKey::Key(key) => self.group.contains(key),
            AnyKey::Apply(name) => self.apply.iter().any(|rule| &rule.name == name),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        let group: Vec<JsonValue> = self.group.iter().map(|k| json!(k.to_string())).collect();
        let apply: Vec<JsonValue> = self
            .apply
            .iter()
            .map(|rule| {
                single_entry(
                    rule.name.clone(),
                    single_entry(rule.token.to_string(), json!(rule.key.to_string())),
                )
            })
            .collect();
        json!({ "GROUP": group, "APPLY": apply })
    }
}

/// `{ applykey: { TOKEN: key } }`
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyRule {
    pub name: String,
    pub token: ApplyToken,
    pub key: Key,
}

/// Aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyToken {
    Max,
    Min,
    Avg,
    Count,
    Sum,
}

impl ApplyToken {
    pub fn parse(token: &str) -> Option<ApplyToken> {
        match token {
            "MAX" => Some(ApplyToken::Max),
            "MIN" => Some(ApplyToken::Min),
            "AVG" => Some(ApplyToken::Avg),
            "COUNT" => Some(ApplyToken::Count),
            "SUM" => Some(ApplyToken::Sum),
            _ => None,
        }
    }

    /// COUNT accepts any field; the rest need numbers
    pub fn requires_numeric(self) -> bool {
        !matches!(self, ApplyToken::Count)
    }
}

/// COLUMNS and ORDER
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub columns: Vec<AnyKey>,
    pub order: Option<Order>,
}

impl Options {
    pub fn to_json(&self) -> JsonValue {
        let columns: Vec<JsonValue> = self.columns.iter().map(|c| json!(c.to_string())).collect();
        let mut options = Map::new();
        options.insert("COLUMNS".to_string(), JsonValue::Array(columns));
        match self.order {
            Some(Order::Single(ref key)) => {
                options.insert("ORDER".to_string(), json!(key.to_string()));
            }
            Some(Order::Multi {
                direction,
                ref keys,
            }) => {
                let keys: Vec<JsonValue> = keys.iter().map(|k| json!(k.to_string())).collect();
                options.insert(
                    "ORDER".to_string(),
                    json!({ "dir": direction.to_string(), "keys": keys }),
                );
            }
            None => {}
        }
        JsonValue::Object(options)
    }
}

/// ORDER clause
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    /// `ORDER: "key"`, always ascending
    Single(AnyKey),
    /// `ORDER: { dir, keys }`
    Multi {
        direction: Direction,
        keys: Vec<AnyKey>,
    },
}

impl Order {
    pub fn keys(&self) -> &[AnyKey] {
        match self {
            Order::Single(key) => std::slice::from_ref(key),
            Order::Multi { keys, .. } => keys,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

// Display implementations for debugging and error messages

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.dataset_id, self.field)
    }
}

impl fmt::Display for AnyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyKey::Key(key) => write!(f, "{}", key),
            AnyKey::Apply(name) => write!(f, "{}", name),
        }
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicOperator::And => write!(f, "AND"),
            LogicOperator::Or => write!(f, "OR"),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Lt => write!(f, "LT"),
            Comparator::Gt => write!(f, "GT"),
            Comparator::Eq => write!(f, "EQ"),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Exact(s) => write!(f, "{}", s),
            Pattern::Prefix(s) => write!(f, "{}*", s),
            Pattern::Suffix(s) => write!(f, "*{}", s),
            Pattern::Contains(s) => write!(f, "*{}*", s),
        }
    }
}

impl fmt::Display for ApplyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyToken::Max => write!(f, "MAX"),
            ApplyToken::Min => write!(f, "MIN"),
            ApplyToken::Avg => write!(f, "AVG"),
            ApplyToken::Count => write!(f, "COUNT"),
            ApplyToken::Sum => write!(f, "SUM"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}
