//! Predicate filtering for query execution
//!
//! A normalized filter tree is compiled once per query: wildcard patterns
//! become anchored case-insensitive regexes, numeric leaves compare as f64.
//! No type coercion; a field of the wrong type never matches.

use regex::{Regex, RegexBuilder};

use super::errors::{ExecutorError, ExecutorResult};
use super::normalize::normalize;
use crate::dataset::{Field, Record};
use crate::planner::{Comparison, ComparisonOp, FilterNode, Literal};

/// Anchored wildcard pattern for `IS`
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    regex: Regex,
}

impl WildcardPattern {
    /// Compiles a pattern; `*` is only meaningful at either end
    pub fn new(pattern: &str) -> ExecutorResult<Self> {
        let (leading, rest) = match pattern.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let (trailing, inner) = match rest.strip_suffix('*') {
            Some(inner) => (true, inner),
            None => (false, rest),
        };

        let source = format!(
            "^{}{}{}$",
            if leading { ".*" } else { "" },
            regex::escape(inner),
            if trailing { ".*" } else { "" },
        );
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| ExecutorError::execution_failed(format!("pattern '{}': {}", pattern, e)))?;

        Ok(Self { regex })
    }

    /// Returns true if `text` matches the pattern
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Compiled comparison leaf
#[derive(Debug, Clone)]
pub enum PredicateFilter {
    Numeric {
        op: ComparisonOp,
        field: Field,
        value: f64,
    },
    Text {
        negated: bool,
        field: Field,
        pattern: WildcardPattern,
    },
}

impl PredicateFilter {
    /// Compiles a single comparison
    pub fn compile(cmp: &Comparison) -> ExecutorResult<Self> {
        match (&cmp.value, cmp.op.is_string_match()) {
            (Literal::Number(value), false) => Ok(PredicateFilter::Numeric {
                op: cmp.op,
                field: cmp.field,
                value: *value,
            }),
            (Literal::Text(pattern), true) => Ok(PredicateFilter::Text {
                negated: cmp.op == ComparisonOp::IsNot,
                field: cmp.field,
                pattern: WildcardPattern::new(pattern)?,
            }),
            _ => Err(ExecutorError::execution_failed(format!(
                "operator {} does not accept {:?}",
                cmp.op.op_name(),
                cmp.value
            ))),
        }
    }

    /// Checks if a record matches this comparison
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            PredicateFilter::Numeric { op, field, value } => {
                let actual = match record.get(*field).and_then(|v| v.as_number()) {
                    Some(n) => n,
                    None => return false,
                };
                match op {
                    ComparisonOp::Lt => actual < *value,
                    ComparisonOp::Gt => actual > *value,
                    ComparisonOp::Eq => actual == *value,
                    ComparisonOp::Gte => actual >= *value,
                    ComparisonOp::Lte => actual <= *value,
                    ComparisonOp::Neq => actual != *value,
                    ComparisonOp::Is | ComparisonOp::IsNot => false,
                }
            }
            PredicateFilter::Text {
                negated,
                field,
                pattern,
            } => match record.get(*field).and_then(|v| v.as_text()) {
                Some(text) => pattern.is_match(text) != *negated,
                None => false,
            },
        }
    }
}

/// Compiled, Not-free filter tree
#[derive(Debug, Clone)]
pub enum CompiledFilter {
    And(Vec<CompiledFilter>),
    Or(Vec<CompiledFilter>),
    Leaf(PredicateFilter),
}

impl CompiledFilter {
    /// Normalizes negations and compiles the tree
    pub fn compile(node: &FilterNode) -> ExecutorResult<Self> {
        Self::build(&normalize(node))
    }

    fn build(node: &FilterNode) -> ExecutorResult<Self> {
        match node {
            FilterNode::And(children) => Ok(CompiledFilter::And(
                children.iter().map(Self::build).collect::<ExecutorResult<_>>()?,
            )),
            FilterNode::Or(children) => Ok(CompiledFilter::Or(
                children.iter().map(Self::build).collect::<ExecutorResult<_>>()?,
            )),
            FilterNode::Comparison(cmp) => PredicateFilter::compile(cmp).map(CompiledFilter::Leaf),
            FilterNode::Not(_) => Err(ExecutorError::execution_failed("unnormalized NOT")),
        }
    }

    /// Checks if a single record satisfies the whole tree
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            CompiledFilter::And(children) => children.iter().all(|c| c.matches(record)),
            CompiledFilter::Or(children) => children.iter().any(|c| c.matches(record)),
            CompiledFilter::Leaf(pred) => pred.matches(record),
        }
    }
}
