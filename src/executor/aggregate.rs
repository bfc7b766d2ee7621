//! Projection and aggregation
//!
//! Without transformations each candidate is projected onto the output
//! columns. With transformations candidates are grouped by the tuple of
//! group-key values, groups keep first-occurrence order, and each apply
//! rule is computed per group.

use std::collections::{HashMap, HashSet};

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};

use super::result::Row;
use crate::dataset::{number_to_json, Record};
use crate::planner::{ApplyOp, ApplyRule, Column, FieldKey, Transformations};

/// Projects or aggregates candidates into output rows
pub fn aggregate<R: Record>(
    candidates: &[&R],
    transformations: Option<&Transformations>,
    columns: &[Column],
) -> Vec<Row> {
    match transformations {
        None => candidates.iter().map(|r| project(*r, columns)).collect(),
        Some(t) => group(candidates, &t.group)
            .into_iter()
            .map(|members| aggregate_group(&members, t, columns))
            .collect(),
    }
}

fn project<R: Record>(record: &R, columns: &[Column]) -> Row {
    let mut row = Map::with_capacity(columns.len());
    for column in columns {
        if let Column::Field(fk) = column {
            let value = record.get(fk.field).map(|v| v.to_json()).unwrap_or(Value::Null);
            row.insert(fk.key.clone(), value);
        }
    }
    row
}

/// Partitions candidates by group-key tuple, in first-occurrence order
fn group<'r, R: Record>(
    candidates: &[&'r R],
    keys: &[FieldKey],
) -> Vec<Vec<&'r R>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<&'r R>> = Vec::new();

    for record in candidates {
        let tuple = Value::Array(
            keys.iter()
                .map(|k| record.get(k.field).map(|v| v.to_json()).unwrap_or(Value::Null))
                .collect(),
        )
        .to_string();

        match index.get(&tuple) {
            Some(&slot) => groups[slot].push(*record),
            None => {
                index.insert(tuple, groups.len());
                groups.push(vec![*record]);
            }
        }
    }
    groups
}

fn aggregate_group<R: Record>(members: &[&R], t: &Transformations, columns: &[Column]) -> Row {
    let mut row = Map::with_capacity(columns.len());
    for column in columns {
        match column {
            Column::Field(fk) => {
                let value = members
                    .first()
                    .and_then(|r| r.get(fk.field))
                    .map(|v| v.to_json())
                    .unwrap_or(Value::Null);
                row.insert(fk.key.clone(), value);
            }
            Column::Apply(name) => {
                if let Some(rule) = t.apply.iter().find(|rule| &rule.name == name) {
                    row.insert(name.clone(), apply(rule, members));
                }
            }
        }
    }
    row
}

/// Computes one apply rule over a group
fn apply<R: Record>(rule: &ApplyRule, members: &[&R]) -> Value {
    let field = rule.field.field;
    if rule.op == ApplyOp::Count {
        let distinct: HashSet<String> = members
            .iter()
            .filter_map(|r| r.get(field))
            .map(|v| v.to_json().to_string())
            .collect();
        return Value::from(distinct.len());
    }

    let numbers: Vec<f64> = members
        .iter()
        .filter_map(|r| r.get(field).and_then(|v| v.as_number()))
        .collect();
    if numbers.is_empty() {
        return Value::Null;
    }

    let result = match rule.op {
        ApplyOp::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ApplyOp::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
        ApplyOp::Sum => round2(numbers.iter().sum()),
        ApplyOp::Avg => average(&numbers),
        ApplyOp::Count => numbers.len() as f64,
    };
    number_to_json(result)
}

/// Mean through a decimal accumulator, rounded half away from zero
fn average(numbers: &[f64]) -> f64 {
    let total: Decimal = numbers.iter().filter_map(|n| Decimal::from_f64(*n)).sum();
    let mean = total / Decimal::from(numbers.len());
    mean.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(f64::NAN)
}

fn round2(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}
