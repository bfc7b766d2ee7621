//! Query grammar validator
//!
//! Turns a raw JSON query into a [`ParsedQuery`] or rejects it. Validation
//! is pure: the same query against the same catalog always yields the same
//! result, and no partial parse is ever returned.
//!
//! Order of checks:
//! 1. Top-level keys are exactly WHERE, OPTIONS[, TRANSFORMATIONS]
//! 2. Target dataset resolved from the first underscored COLUMNS entry
//! 3. TRANSFORMATIONS (GROUP keys, APPLY rules)
//! 4. COLUMNS and ORDER
//! 5. WHERE filter tree

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use super::ast::{
    ApplyOp, ApplyRule, Column, Comparison, ComparisonOp, FieldKey, FilterNode, Literal,
    ParsedQuery, SortDirection, SortSpec, Transformations,
};
use super::errors::{PlannerError, PlannerResult};
use crate::dataset::{DatasetKind, Field};

/// Read-only view of the registered datasets
pub trait DatasetCatalog {
    /// Returns the kind of a registered dataset
    fn dataset_kind(&self, id: &str) -> Option<DatasetKind>;
}

impl DatasetCatalog for HashMap<String, DatasetKind> {
    fn dataset_kind(&self, id: &str) -> Option<DatasetKind> {
        self.get(id).copied()
    }
}

/// Splits `<datasetId>_<field>`; `None` unless there are exactly two parts
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    let mut parts = key.split('_');
    let id = parts.next()?;
    let field = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((id, field))
}

/// Query validator backed by a dataset catalog
pub struct QueryValidator<'a, C: DatasetCatalog> {
    catalog: &'a C,
}

impl<'a, C: DatasetCatalog> QueryValidator<'a, C> {
    /// Creates a new validator
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Validates a raw query
    pub fn validate(&self, raw: &Value) -> PlannerResult<ParsedQuery> {
        let query = raw
            .as_object()
            .ok_or_else(|| PlannerError::query_invalid("Query must be a JSON object"))?;

        let keys: Vec<&str> = query.keys().map(String::as_str).collect();
        let has_transformations = match keys.as_slice() {
            ["WHERE", "OPTIONS"] => false,
            ["WHERE", "OPTIONS", "TRANSFORMATIONS"] => true,
            _ => {
                return Err(PlannerError::query_invalid(format!(
                    "Query keys must be WHERE, OPTIONS[, TRANSFORMATIONS], found {:?}",
                    keys
                )))
            }
        };

        let options = query["OPTIONS"]
            .as_object()
            .ok_or_else(|| PlannerError::query_invalid("OPTIONS must be an object"))?;
        let option_keys: Vec<&str> = options.keys().map(String::as_str).collect();
        if !matches!(option_keys.as_slice(), ["COLUMNS"] | ["COLUMNS", "ORDER"]) {
            return Err(PlannerError::query_invalid(format!(
                "OPTIONS keys must be COLUMNS[, ORDER], found {:?}",
                option_keys
            )));
        }
        let raw_columns = options["COLUMNS"]
            .as_array()
            .filter(|cols| !cols.is_empty())
            .ok_or_else(|| PlannerError::query_invalid("COLUMNS must be a non-empty array"))?;

        let target = self.resolve_target(raw_columns)?;

        let transformations = if has_transformations {
            Some(target.parse_transformations(&query["TRANSFORMATIONS"])?)
        } else {
            None
        };

        let columns = target.parse_columns(raw_columns, transformations.as_ref())?;
        let order = options
            .get("ORDER")
            .map(|order| parse_order(order, &columns))
            .transpose()?;
        let filter = target.parse_where(&query["WHERE"])?;

        Ok(ParsedQuery {
            dataset_id: target.id,
            kind: target.kind,
            filter,
            columns,
            order,
            transformations,
        })
    }

    /// Finds the target dataset from the first underscored column
    fn resolve_target(&self, columns: &[Value]) -> PlannerResult<Target> {
        let first = columns
            .iter()
            .filter_map(Value::as_str)
            .find(|key| key.contains('_'))
            .ok_or_else(|| PlannerError::query_invalid("COLUMNS names no dataset key"))?;

        let (id, field_name) = split_key(first)
            .ok_or_else(|| PlannerError::invalid_key(first, "malformed dataset key"))?;
        let registered = self
            .catalog
            .dataset_kind(id)
            .ok_or_else(|| PlannerError::unknown_dataset(id))?;
        let field = Field::parse(field_name)
            .ok_or_else(|| PlannerError::invalid_key(first, "unknown field"))?;
        if field.kind() != registered {
            return Err(PlannerError::invalid_key(
                first,
                format!("field does not exist in {} dataset '{}'", registered, id),
            ));
        }

        Ok(Target {
            id: id.to_string(),
            kind: registered,
        })
    }
}

/// The single dataset a query may reference
struct Target {
    id: String,
    kind: DatasetKind,
}

impl Target {
    /// Validates a `<datasetId>_<field>` key against this target
    fn field_key(&self, key: &str) -> PlannerResult<FieldKey> {
        let (id, field_name) =
            split_key(key).ok_or_else(|| PlannerError::invalid_key(key, "malformed dataset key"))?;
        if id != self.id {
            return Err(PlannerError::multiple_datasets(&self.id, id));
        }
        let field = Field::parse(field_name)
            .filter(|f| f.kind() == self.kind)
            .ok_or_else(|| {
                PlannerError::invalid_key(key, format!("not a {} field", self.kind))
            })?;
        Ok(FieldKey {
            key: key.to_string(),
            field,
        })
    }

    fn parse_columns(
        &self,
        raw: &[Value],
        transformations: Option<&Transformations>,
    ) -> PlannerResult<Vec<Column>> {
        raw.iter()
            .map(|entry| {
                let name = entry
                    .as_str()
                    .ok_or_else(|| PlannerError::query_invalid("COLUMNS entries must be strings"))?;
                match transformations {
                    None => self.field_key(name).map(Column::Field),
                    Some(t) => {
                        if let Some(group) = t.group.iter().find(|g| g.key == name) {
                            Ok(Column::Field(group.clone()))
                        } else if t.apply.iter().any(|rule| rule.name == name) {
                            Ok(Column::Apply(name.to_string()))
                        } else {
                            Err(PlannerError::invalid_key(
                                name,
                                "column must be a GROUP key or an APPLY name",
                            ))
                        }
                    }
                }
            })
            .collect()
    }

    fn parse_transformations(&self, raw: &Value) -> PlannerResult<Transformations> {
        let obj = raw
            .as_object()
            .ok_or_else(|| PlannerError::query_invalid("TRANSFORMATIONS must be an object"))?;
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        if keys.as_slice() != ["GROUP", "APPLY"] {
            return Err(PlannerError::query_invalid(format!(
                "TRANSFORMATIONS keys must be GROUP, APPLY, found {:?}",
                keys
            )));
        }

        let group = obj["GROUP"]
            .as_array()
            .filter(|g| !g.is_empty())
            .ok_or_else(|| PlannerError::query_invalid("GROUP must be a non-empty array"))?
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .ok_or_else(|| PlannerError::query_invalid("GROUP entries must be strings"))
                    .and_then(|key| self.field_key(key))
            })
            .collect::<PlannerResult<Vec<_>>>()?;

        let raw_apply = obj["APPLY"]
            .as_array()
            .ok_or_else(|| PlannerError::query_invalid("APPLY must be an array"))?;
        let mut seen = HashSet::new();
        let mut apply = Vec::with_capacity(raw_apply.len());
        for entry in raw_apply {
            let rule = self.parse_apply_rule(entry)?;
            if !seen.insert(rule.name.clone()) {
                return Err(PlannerError::invalid_key(&rule.name, "duplicate APPLY name"));
            }
            apply.push(rule);
        }

        Ok(Transformations { group, apply })
    }

    fn parse_apply_rule(&self, raw: &Value) -> PlannerResult<ApplyRule> {
        let (name, body) = single_entry(raw, "APPLY rule")?;
        if name.is_empty() || name.contains('_') {
            return Err(PlannerError::invalid_key(
                name,
                "APPLY name must be non-empty and contain no underscore",
            ));
        }
        let (token, target) = single_entry(body, "APPLY body")?;
        let op = ApplyOp::parse(token)
            .ok_or_else(|| PlannerError::invalid_key(token, "unknown APPLY token"))?;
        let key = target
            .as_str()
            .ok_or_else(|| PlannerError::invalid_key(name, "APPLY target must be a string"))?;
        let field = self.field_key(key)?;
        if op.requires_numeric() && !field.field.is_numeric() {
            return Err(PlannerError::invalid_key(
                key,
                format!("{} requires a numeric field", token),
            ));
        }

        Ok(ApplyRule {
            name: name.to_string(),
            op,
            field,
        })
    }

    fn parse_where(&self, raw: &Value) -> PlannerResult<Option<FilterNode>> {
        let obj = raw
            .as_object()
            .ok_or_else(|| PlannerError::query_invalid("WHERE must be an object"))?;
        if obj.is_empty() {
            return Ok(None);
        }
        self.parse_filter(raw).map(Some)
    }

    fn parse_filter(&self, raw: &Value) -> PlannerResult<FilterNode> {
        let (key, body) = single_entry(raw, "filter")?;
        match key {
            "AND" | "OR" => {
                let children = body
                    .as_array()
                    .filter(|c| !c.is_empty())
                    .ok_or_else(|| {
                        PlannerError::invalid_key(key, "must be a non-empty array")
                    })?
                    .iter()
                    .map(|child| self.parse_filter(child))
                    .collect::<PlannerResult<Vec<_>>>()?;
                Ok(if key == "AND" {
                    FilterNode::And(children)
                } else {
                    FilterNode::Or(children)
                })
            }
            "NOT" => Ok(FilterNode::not(self.parse_filter(body)?)),
            "LT" | "GT" | "EQ" => {
                let op = match key {
                    "LT" => ComparisonOp::Lt,
                    "GT" => ComparisonOp::Gt,
                    _ => ComparisonOp::Eq,
                };
                let (field_key, literal) = single_entry(body, key)?;
                let field = self.field_key(field_key)?;
                if !field.field.is_numeric() {
                    return Err(PlannerError::invalid_key(field_key, "not a numeric field"));
                }
                let value = literal.as_f64().ok_or_else(|| {
                    PlannerError::invalid_key(field_key, format!("{} needs a number", key))
                })?;
                Ok(FilterNode::Comparison(Comparison {
                    op,
                    field: field.field,
                    value: Literal::Number(value),
                }))
            }
            "IS" => {
                let (field_key, literal) = single_entry(body, key)?;
                let field = self.field_key(field_key)?;
                if field.field.is_numeric() {
                    return Err(PlannerError::invalid_key(field_key, "not a string field"));
                }
                let pattern = literal.as_str().ok_or_else(|| {
                    PlannerError::invalid_key(field_key, "IS needs a string")
                })?;
                if has_interior_wildcard(pattern) {
                    return Err(PlannerError::invalid_key(
                        field_key,
                        "wildcard only allowed at start or end",
                    ));
                }
                Ok(FilterNode::is(field.field, pattern))
            }
            other => Err(PlannerError::invalid_key(other, "unknown filter")),
        }
    }
}

fn parse_order(raw: &Value, columns: &[Column]) -> PlannerResult<SortSpec> {
    let in_columns = |key: &str| columns.iter().any(|c| c.name() == key);

    match raw {
        Value::String(key) if in_columns(key) => Ok(SortSpec::up(key.as_str())),
        Value::String(key) => Err(PlannerError::invalid_key(key, "ORDER key not in COLUMNS")),
        Value::Object(obj) => {
            if obj.len() != 2 || !obj.contains_key("dir") || !obj.contains_key("keys") {
                return Err(PlannerError::query_invalid(
                    "ORDER object must have exactly dir and keys",
                ));
            }
            let direction = match obj["dir"].as_str() {
                Some("UP") => SortDirection::Up,
                Some("DOWN") => SortDirection::Down,
                _ => return Err(PlannerError::query_invalid("ORDER dir must be UP or DOWN")),
            };
            let keys = obj["keys"]
                .as_array()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| PlannerError::query_invalid("ORDER keys must be a non-empty array"))?
                .iter()
                .map(|entry| match entry.as_str() {
                    Some(key) if in_columns(key) => Ok(key.to_string()),
                    Some(key) => Err(PlannerError::invalid_key(key, "ORDER key not in COLUMNS")),
                    None => Err(PlannerError::query_invalid("ORDER keys must be strings")),
                })
                .collect::<PlannerResult<Vec<_>>>()?;
            Ok(SortSpec { keys, direction })
        }
        _ => Err(PlannerError::query_invalid("ORDER must be a string or an object")),
    }
}

/// Returns the only entry of a single-key object
fn single_entry<'v>(raw: &'v Value, what: &str) -> PlannerResult<(&'v str, &'v Value)> {
    let obj: &Map<String, Value> = raw
        .as_object()
        .ok_or_else(|| PlannerError::query_invalid(format!("{} must be an object", what)))?;
    if obj.len() != 1 {
        return Err(PlannerError::query_invalid(format!(
            "{} must have exactly one key, found {}",
            what,
            obj.len()
        )));
    }
    obj.iter()
        .next()
        .map(|(k, v)| (k.as_str(), v))
        .ok_or_else(|| PlannerError::query_invalid(format!("{} is empty", what)))
}

/// True if `*` appears anywhere but the first or last position
fn has_interior_wildcard(pattern: &str) -> bool {
    let chars: Vec<char> = pattern.chars().collect();
    chars.len() > 2 && chars[1..chars.len() - 1].contains(&'*')
}
