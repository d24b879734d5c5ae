/// Query executor
///
/// Runs a compiled query over one dataset in four stages: filter,
/// transform, project and sort.
use super::aggregate;
use super::ast::*;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::record::{Record, Value, ValueIdentity};
use crate::schema::Field;
use feruca::{Collator, Locale, Tailoring};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Query result row
///
/// Columns keep the order of `OPTIONS.COLUMNS`; serializes to a JSON
/// object in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl ResultRow {
    /// Column names, shared by every row of one result
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in column order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Looks a value up by column name
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true for a row without columns
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(column, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Intermediate row between transform and projection
enum Row<'a> {
    Source(&'a Record),
    Group(GroupRow),
}

/// One synthetic row per group: the group-key values and one value per
/// APPLY rule, kept apart so applykeys never shadow record fields
struct GroupRow {
    keys: Vec<(Field, Option<Value>)>,
    aggregates: HashMap<String, Value>,
}

impl Row<'_> {
    fn key_value(&self, field: Field) -> Option<&Value> {
        match self {
            Row::Source(record) => record.get(field),
            Row::Group(group) => group
                .keys
                .iter()
                .find(|(f, _)| *f == field)
                .and_then(|(_, value)| value.as_ref()),
        }
    }

    fn apply_value(&self, name: &str) -> Option<&Value> {
        match self {
            Row::Source(_) => None,
            Row::Group(group) => group.aggregates.get(name),
        }
    }
}

/// Query executor
pub struct Executor<'a> {
    query: &'a Query,
    dataset: &'a Dataset,
}

impl<'a> Executor<'a> {
    /// Create new executor
    pub fn new(query: &'a Query, dataset: &'a Dataset) -> Self {
        Self { query, dataset }
    }

    /// Execute the query; a failing aggregate aborts without partial rows
    pub fn execute(&self) -> Result<Vec<ResultRow>> {
        let matched = self.execute_filter();
        debug!(
            dataset = self.dataset.id(),
            scanned = self.dataset.records().len(),
            matched = matched.len(),
            "filter stage"
        );

        let rows = match self.query.transformations {
            Some(ref transformations) => {
                let groups = self.execute_transform(transformations, matched)?;
                debug!(groups = groups.len(), "transform stage");
                groups
            }
            None => matched.into_iter().map(Row::Source).collect(),
        };

        let mut results = self.execute_project(&rows);
        debug!(
            rows = results.len(),
            dropped = rows.len() - results.len(),
            "project stage"
        );

        self.execute_sort(&mut results);
        Ok(results)
    }

    fn execute_filter(&self) -> Vec<&'a Record> {
        let filter = &self.query.filter;
        self.dataset
            .records()
            .iter()
            .filter(|record| evaluate_filter(filter, record))
            .collect()
    }

    fn execute_transform(
        &self,
        transformations: &Transformations,
        records: Vec<&'a Record>,
    ) -> Result<Vec<Row<'a>>> {
        // Tuple keys: joined strings would let ("a_b", "c") collide with ("a", "b_c")
        let mut index: HashMap<Vec<Option<ValueIdentity>>, usize> = HashMap::new();
        let mut groups: Vec<Vec<&'a Record>> = Vec::new();

        for record in records {
            let identity = transformations
                .group
                .iter()
                .map(|key| record.get(key.field).map(Value::identity))
                .collect();
            let slot = *index.entry(identity).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(record);
        }

        let mut rows = Vec::with_capacity(groups.len());
        for members in groups {
            let keys = transformations
                .group
                .iter()
                .map(|key| (key.field, members[0].get(key.field).cloned()))
                .collect();

            let mut aggregates = HashMap::with_capacity(transformations.apply.len());
            for rule in &transformations.apply {
                let value = aggregate::evaluate(rule, &members)?;
                trace!(apply = %rule.name, value = %value, members = members.len(), "aggregate");
                aggregates.insert(rule.name.clone(), value);
            }

            rows.push(Row::Group(GroupRow { keys, aggregates }));
        }

        Ok(rows)
    }

    fn execute_project(&self, rows: &[Row<'_>]) -> Vec<ResultRow> {
        let columns: Arc<[String]> = self
            .query
            .options
            .columns
            .iter()
            .map(AnyKey::column_name)
            .collect();

        rows.iter()
            .filter_map(|row| {
                self.project_values(row).map(|values| ResultRow {
                    columns: Arc::clone(&columns),
                    values,
                })
            })
            .collect()
    }

    /// `None` when a key column is absent or holds the wrong primitive type
    fn project_values(&self, row: &Row<'_>) -> Option<Vec<Value>> {
        self.query
            .options
            .columns
            .iter()
            .map(|column| match column {
                AnyKey::Key(key) => row
                    .key_value(key.field)
                    .filter(|value| value.matches_type(key.field.field_type()))
                    .cloned(),
                AnyKey::Apply(name) => row.apply_value(name).cloned(),
            })
            .collect()
    }

    fn execute_sort(&self, rows: &mut [ResultRow]) {
        let Some(ref order) = self.query.options.order else {
            return;
        };

        let direction = match order {
            Order::Single(_) => Direction::Up,
            Order::Multi { direction, .. } => *direction,
        };
        let positions: Vec<usize> = order
            .keys()
            .iter()
            .filter_map(|key| self.query.options.columns.iter().position(|c| c == key))
            .collect();

        let mut comparator = ValueComparator::new();
        // sort_by is stable, ties keep their input order
        rows.sort_by(|a, b| {
            let ordering = positions
                .iter()
                .map(|&idx| comparator.compare(&a.values[idx], &b.values[idx]))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal);

            match direction {
                Direction::Up => ordering,
                Direction::Down => ordering.reverse(),
            }
        });
    }
}

/// Execute `query` against `dataset`
pub fn execute(query: &Query, dataset: &Dataset) -> Result<Vec<ResultRow>> {
    Executor::new(query, dataset).execute()
}

/// Evaluates a WHERE predicate against one record.
///
/// A comparison or match on a missing or wrongly typed value is false.
pub fn evaluate_filter(filter: &Filter, record: &Record) -> bool {
    match filter {
        Filter::Empty => true,
        Filter::Logic {
            op: LogicOperator::And,
            operands,
        } => operands.iter().all(|f| evaluate_filter(f, record)),
        Filter::Logic {
            op: LogicOperator::Or,
            operands,
        } => operands.iter().any(|f| evaluate_filter(f, record)),
        Filter::Compare { op, key, value } => record
            .get(key.field)
            .and_then(Value::as_number)
            .is_some_and(|n| op.apply(n, *value)),
        Filter::Match { key, pattern } => record
            .get(key.field)
            .and_then(Value::as_text)
            .is_some_and(|s| pattern.matches(s)),
        Filter::Not(inner) => !evaluate_filter(inner, record),
    }
}

/// Orders result values.
///
/// Numbers compare numerically. Text follows the Unicode collation of the
/// root locale: accents and case only break ties between equal base letters,
/// and lowercase sorts before uppercase. Mixed types compare equal.
pub struct ValueComparator {
    collator: Collator,
}

impl ValueComparator {
    /// Comparator with root-locale tailoring and punctuation kept significant
    pub fn new() -> Self {
        Self {
            collator: Collator::new(Tailoring::Cldr(Locale::Root), false, true),
        }
    }

    /// Compare two values
    pub fn compare(&mut self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => {
                x.partial_cmp(y).unwrap_or(Ordering::Equal)
            }
            (Value::Text(x), Value::Text(y)) => {
                self.collator.collate(x.as_str(), y.as_str())
            }
            _ => Ordering::Equal,
        }
    }
}

impl Default for ValueComparator {
    fn default() -> Self {
        Self::new()
    }
}

/// Orders two result values with a fresh [`ValueComparator`].
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    ValueComparator::new().compare(a, b)
}
