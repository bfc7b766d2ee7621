//! Parsed query structures
//!
//! The validator produces a [`ParsedQuery`]; the executor consumes it.
//! Filter trees are built fresh per query and never shared.

use crate::dataset::{DatasetKind, Field};

/// Comparison operators, including the negated forms produced by
/// negation normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Lt,
    Gt,
    Eq,
    /// Negated `Lt`
    Gte,
    /// Negated `Gt`
    Lte,
    /// Negated `Eq`
    Neq,
    Is,
    /// Negated `Is`
    IsNot,
}

impl ComparisonOp {
    /// Returns the logical complement of this operator
    pub fn negate(self) -> Self {
        match self {
            ComparisonOp::Lt => ComparisonOp::Gte,
            ComparisonOp::Gte => ComparisonOp::Lt,
            ComparisonOp::Gt => ComparisonOp::Lte,
            ComparisonOp::Lte => ComparisonOp::Gt,
            ComparisonOp::Eq => ComparisonOp::Neq,
            ComparisonOp::Neq => ComparisonOp::Eq,
            ComparisonOp::Is => ComparisonOp::IsNot,
            ComparisonOp::IsNot => ComparisonOp::Is,
        }
    }

    /// Returns true for string-match operators
    pub fn is_string_match(self) -> bool {
        matches!(self, ComparisonOp::Is | ComparisonOp::IsNot)
    }

    /// Returns the operator name for log output
    pub fn op_name(self) -> &'static str {
        match self {
            ComparisonOp::Lt => "lt",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Eq => "eq",
            ComparisonOp::Gte => "gte",
            ComparisonOp::Lte => "lte",
            ComparisonOp::Neq => "neq",
            ComparisonOp::Is => "is",
            ComparisonOp::IsNot => "isnot",
        }
    }
}

/// Literal operand of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

/// A single comparison leaf
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub op: ComparisonOp,
    pub field: Field,
    pub value: Literal,
}

impl Comparison {
    /// Returns the comparison with its operator negated
    pub fn negated(&self) -> Self {
        Self {
            op: self.op.negate(),
            field: self.field,
            value: self.value.clone(),
        }
    }
}

/// Boolean filter tree built from `WHERE`
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
    Comparison(Comparison),
}

impl FilterNode {
    fn numeric(op: ComparisonOp, field: Field, value: f64) -> Self {
        FilterNode::Comparison(Comparison {
            op,
            field,
            value: Literal::Number(value),
        })
    }

    /// `LT` leaf
    pub fn lt(field: Field, value: f64) -> Self {
        Self::numeric(ComparisonOp::Lt, field, value)
    }

    /// `GT` leaf
    pub fn gt(field: Field, value: f64) -> Self {
        Self::numeric(ComparisonOp::Gt, field, value)
    }

    /// `EQ` leaf
    pub fn eq(field: Field, value: f64) -> Self {
        Self::numeric(ComparisonOp::Eq, field, value)
    }

    /// `IS` leaf
    pub fn is(field: Field, pattern: impl Into<String>) -> Self {
        FilterNode::Comparison(Comparison {
            op: ComparisonOp::Is,
            field,
            value: Literal::Text(pattern.into()),
        })
    }

    /// `NOT` node
    pub fn not(child: FilterNode) -> Self {
        FilterNode::Not(Box::new(child))
    }

    /// Returns true if any `Not` node remains in the tree
    pub fn contains_not(&self) -> bool {
        match self {
            FilterNode::Not(_) => true,
            FilterNode::And(children) | FilterNode::Or(children) => {
                children.iter().any(FilterNode::contains_not)
            }
            FilterNode::Comparison(_) => false,
        }
    }
}

/// A validated `<datasetId>_<field>` key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldKey {
    /// Full query key, e.g. `courses_avg`
    pub key: String,
    pub field: Field,
}

/// An output column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Dataset field (or group key)
    Field(FieldKey),
    /// Name of an apply rule
    Apply(String),
}

impl Column {
    /// Output name of the column
    pub fn name(&self) -> &str {
        match self {
            Column::Field(fk) => &fk.key,
            Column::Apply(name) => name,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Up,
    Down,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Up => "UP",
            SortDirection::Down => "DOWN",
        }
    }
}

/// Sort specification: ordered keys, one direction for all of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub keys: Vec<String>,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn up(key: impl Into<String>) -> Self {
        Self {
            keys: vec![key.into()],
            direction: SortDirection::Up,
        }
    }

    pub fn down(key: impl Into<String>) -> Self {
        Self {
            keys: vec![key.into()],
            direction: SortDirection::Down,
        }
    }
}

/// Aggregate operators of `APPLY`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOp {
    Max,
    Min,
    Avg,
    Sum,
    Count,
}

impl ApplyOp {
    /// Parses an `APPLY` token
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "MAX" => Some(ApplyOp::Max),
            "MIN" => Some(ApplyOp::Min),
            "AVG" => Some(ApplyOp::Avg),
            "SUM" => Some(ApplyOp::Sum),
            "COUNT" => Some(ApplyOp::Count),
            _ => None,
        }
    }

    /// Returns true if the operator only accepts numeric fields
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, ApplyOp::Count)
    }
}

/// A named aggregation from `APPLY`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyRule {
    pub name: String,
    pub op: ApplyOp,
    pub field: FieldKey,
}

/// Parsed `TRANSFORMATIONS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformations {
    pub group: Vec<FieldKey>,
    pub apply: Vec<ApplyRule>,
}

/// A fully validated query
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuery {
    /// Target dataset id
    pub dataset_id: String,
    /// Kind of the target dataset
    pub kind: DatasetKind,
    /// Filter tree; `None` selects every record
    pub filter: Option<FilterNode>,
    /// Output columns in `COLUMNS` order
    pub columns: Vec<Column>,
    pub order: Option<SortSpec>,
    pub transformations: Option<Transformations>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negate_is_involution() {
        let ops = [
            ComparisonOp::Lt,
            ComparisonOp::Gt,
            ComparisonOp::Eq,
            ComparisonOp::Gte,
            ComparisonOp::Lte,
            ComparisonOp::Neq,
            ComparisonOp::Is,
            ComparisonOp::IsNot,
        ];
        for op in ops {
            assert_ne!(op.negate(), op);
            assert_eq!(op.negate().negate(), op);
        }
        assert_eq!(ComparisonOp::Lt.negate(), ComparisonOp::Gte);
    }

    #[test]
    fn test_contains_not() {
        let tree = FilterNode::And(vec![
            FilterNode::gt(Field::Avg, 90.0),
            FilterNode::Or(vec![FilterNode::not(FilterNode::is(Field::Dept, "cpsc"))]),
        ]);
        assert!(tree.contains_not());
        assert!(!FilterNode::gt(Field::Avg, 90.0).contains_not());
    }

    #[test]
    fn test_apply_op_parse() {
        assert_eq!(ApplyOp::parse("AVG"), Some(ApplyOp::Avg));
        assert_eq!(ApplyOp::parse("avg"), None);
        assert!(!ApplyOp::Count.requires_numeric());
        assert!(ApplyOp::Sum.requires_numeric());
    }
}
