/// Aggregate functions
///
/// Evaluates one APPLY rule over the members of a group. AVG and SUM
/// accumulate in fixed-point decimal, fall back to floating point for
/// totals outside its range, and round to two places.
use super::ast::{ApplyRule, ApplyToken, Key};
use crate::error::{Error, Result};
use crate::record::{Record, Value};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;
use std::str::FromStr;

const RESULT_SCALE: u32 = 2;

/// Evaluates `rule` over a non-empty group.
pub fn evaluate(rule: &ApplyRule, members: &[&Record]) -> Result<Value> {
    if rule.token.requires_numeric() && !rule.key.field.is_numeric() {
        return Err(type_error(rule.token, &rule.key, "a textual field"));
    }

    let values = members.iter().map(|record| record.get(rule.key.field));

    match rule.token {
        ApplyToken::Count => {
            let distinct: HashSet<_> = values.map(|v| v.map(Value::identity)).collect();
            Ok(Value::Number(distinct.len() as f64))
        }
        ApplyToken::Max => extremum(rule, values, f64::max),
        ApplyToken::Min => extremum(rule, values, f64::min),
        ApplyToken::Sum => Ok(Value::Number(Total::of(rule, values)?.rounded())),
        ApplyToken::Avg => {
            let avg = Total::of(rule, values)?.divided_by(members.len());
            Ok(Value::Number(avg.rounded()))
        }
    }
}

/// Running total of a group. `exact` is `None` once a value or the sum
/// leaves the `Decimal` range; the float total is used from then on.
struct Total {
    exact: Option<Decimal>,
    approximate: f64,
}

impl Total {
    fn of<'a>(
        rule: &ApplyRule,
        values: impl Iterator<Item = Option<&'a Value>>,
    ) -> Result<Self> {
        let mut total = Total {
            exact: Some(Decimal::ZERO),
            approximate: 0.0,
        };
        for value in values {
            let n = numeric(rule, value)?;
            total.approximate += n;
            total.exact = total
                .exact
                .zip(to_decimal(n))
                .and_then(|(sum, d)| sum.checked_add(d));
        }
        Ok(total)
    }

    fn divided_by(self, count: usize) -> Self {
        Total {
            exact: self
                .exact
                .and_then(|sum| sum.checked_div(Decimal::from(count))),
            approximate: self.approximate / count as f64,
        }
    }

    fn rounded(&self) -> f64 {
        self.exact
            .map(round)
            .and_then(|d| d.to_f64())
            .unwrap_or_else(|| round_float(self.approximate))
    }
}

fn extremum<'a>(
    rule: &ApplyRule,
    values: impl Iterator<Item = Option<&'a Value>>,
    pick: fn(f64, f64) -> f64,
) -> Result<Value> {
    let mut best: Option<f64> = None;
    for value in values {
        let n = numeric(rule, value)?;
        best = Some(best.map_or(n, |b| pick(b, n)));
    }
    best.map(Value::Number)
        .ok_or_else(|| Error::RuntimeType(format!("{} over an empty group", rule.token)))
}

fn numeric(rule: &ApplyRule, value: Option<&Value>) -> Result<f64> {
    match value {
        Some(Value::Number(n)) => Ok(*n),
        Some(Value::Text(s)) => Err(type_error(rule.token, &rule.key, &format!("text {:?}", s))),
        None => Err(type_error(rule.token, &rule.key, "a missing value")),
    }
}

fn type_error(token: ApplyToken, key: &Key, found: &str) -> Error {
    Error::RuntimeType(format!("{} on {} found {}", token, key, found))
}

// Decimal digits of the shortest f64 representation, so 81.17 stays 81.17
fn to_decimal(n: f64) -> Option<Decimal> {
    Decimal::from_str(&n.to_string())
        .ok()
        .or_else(|| Decimal::try_from(n).ok())
}

fn round(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(RESULT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

// Floats this large have no fractional digits left to round
fn round_float(n: f64) -> f64 {
    const SCALE: f64 = 100.0;
    if n.abs() >= 1e15 {
        n
    } else {
        (n * SCALE).round() / SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    fn rule(token: ApplyToken, field: Field) -> ApplyRule {
        ApplyRule {
            name: "out".into(),
            token,
            key: Key::new("ubc", field),
        }
    }

    fn sections(avgs: &[f64]) -> Vec<Record> {
        avgs.iter().map(|a| Record::new().with("avg", *a)).collect()
    }

    fn eval(token: ApplyToken, field: Field, records: &[Record]) -> Result<Value> {
        let members: Vec<&Record> = records.iter().collect();
        evaluate(&rule(token, field), &members)
    }

    #[test]
    fn test_avg_rounds_half_away_from_zero() {
        let records = sections(&[81.17, 81.18, 77.13]);
        assert_eq!(
            eval(ApplyToken::Avg, Field::Avg, &records).unwrap(),
            Value::Number(79.83)
        );

        let records = sections(&[0.125, 0.0]);
        // 0.0625 -> 0.06, 0.125 -> 0.13
        assert_eq!(
            eval(ApplyToken::Avg, Field::Avg, &records).unwrap(),
            Value::Number(0.06)
        );
        let records = sections(&[0.125]);
        assert_eq!(
            eval(ApplyToken::Sum, Field::Avg, &records).unwrap(),
            Value::Number(0.13)
        );
    }

    #[test]
    fn test_sum_has_no_binary_drift() {
        let records = sections(&[0.1, 0.2, 0.3]);
        assert_eq!(
            eval(ApplyToken::Sum, Field::Avg, &records).unwrap(),
            Value::Number(0.6)
        );
    }

    #[test]
    fn test_sum_and_avg_beyond_decimal_range() {
        let records = sections(&[1e29]);
        assert_eq!(
            eval(ApplyToken::Sum, Field::Avg, &records).unwrap(),
            Value::Number(1e29)
        );

        let records = sections(&[1e300, 1e300]);
        assert_eq!(
            eval(ApplyToken::Sum, Field::Avg, &records).unwrap(),
            Value::Number(2e300)
        );
        assert_eq!(
            eval(ApplyToken::Avg, Field::Avg, &records).unwrap(),
            Value::Number(1e300)
        );

        // the sum overflows Decimal although each value fits
        let records = sections(&[6e28, 6e28, 1.5]);
        let Value::Number(sum) = eval(ApplyToken::Sum, Field::Avg, &records).unwrap() else {
            panic!("SUM should be numeric");
        };
        assert_eq!(sum, 6e28 + 6e28 + 1.5);
    }

    #[test]
    fn test_round_float_half_away_from_zero() {
        assert_eq!(round_float(2.5e-1), 0.25);
        assert_eq!(round_float(-1.005e2), -100.5);
        assert_eq!(round_float(3e20), 3e20);
    }

    #[test]
    fn test_max_min() {
        let records = sections(&[70.5, 99.0, -3.0]);
        assert_eq!(
            eval(ApplyToken::Max, Field::Avg, &records).unwrap(),
            Value::Number(99.0)
        );
        assert_eq!(
            eval(ApplyToken::Min, Field::Avg, &records).unwrap(),
            Value::Number(-3.0)
        );
    }

    #[test]
    fn test_count_is_distinct() {
        let records = vec![
            Record::new().with("dept", "A"),
            Record::new().with("dept", "A"),
            Record::new().with("dept", "B"),
        ];
        assert_eq!(
            eval(ApplyToken::Count, Field::Dept, &records).unwrap(),
            Value::Number(2.0)
        );
    }

    #[test]
    fn test_count_treats_missing_as_one_value() {
        let records = vec![
            Record::new().with("dept", "A"),
            Record::new(),
            Record::new(),
        ];
        assert_eq!(
            eval(ApplyToken::Count, Field::Dept, &records).unwrap(),
            Value::Number(2.0)
        );
    }

    #[test]
    fn test_numeric_aggregate_on_text_fails() {
        let records = vec![Record::new().with("avg", "high")];
        for token in [ApplyToken::Max, ApplyToken::Min, ApplyToken::Avg, ApplyToken::Sum] {
            assert!(matches!(
                eval(token, Field::Avg, &records),
                Err(Error::RuntimeType(_))
            ));
        }
    }

    #[test]
    fn test_numeric_aggregate_on_textual_field_fails() {
        let records = vec![Record::new().with("dept", "cpsc")];
        assert!(matches!(
            eval(ApplyToken::Sum, Field::Dept, &records),
            Err(Error::RuntimeType(_))
        ));
    }

    #[test]
    fn test_numeric_aggregate_on_missing_fails() {
        let records = vec![Record::new().with("avg", 80.0), Record::new()];
        assert!(matches!(
            eval(ApplyToken::Avg, Field::Avg, &records),
            Err(Error::RuntimeType(_))
        ));
    }
}
