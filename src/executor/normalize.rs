//! Negation normalization
//!
//! Pushes every `Not` down to the comparison leaves using De Morgan's laws
//! and flips the leaf operator. The input tree is never mutated; the output
//! contains no `Not` nodes and normalizing it again returns an equal tree.

use crate::planner::FilterNode;

/// Returns the Not-free equivalent of `node`
pub fn normalize(node: &FilterNode) -> FilterNode {
    push_down(node, false)
}

fn push_down(node: &FilterNode, negated: bool) -> FilterNode {
    match node {
        FilterNode::Not(child) => push_down(child, !negated),
        FilterNode::And(children) => {
            let children = children.iter().map(|c| push_down(c, negated)).collect();
            if negated {
                FilterNode::Or(children)
            } else {
                FilterNode::And(children)
            }
        }
        FilterNode::Or(children) => {
            let children = children.iter().map(|c| push_down(c, negated)).collect();
            if negated {
                FilterNode::And(children)
            } else {
                FilterNode::Or(children)
            }
        }
        FilterNode::Comparison(cmp) if negated => FilterNode::Comparison(cmp.negated()),
        FilterNode::Comparison(cmp) => FilterNode::Comparison(cmp.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Field;
    use crate::planner::{Comparison, ComparisonOp, Literal};

    fn leaf(op: ComparisonOp, value: f64) -> FilterNode {
        FilterNode::Comparison(Comparison {
            op,
            field: Field::Avg,
            value: Literal::Number(value),
        })
    }

    #[test]
    fn test_not_comparison_flips_operator() {
        let tree = FilterNode::not(FilterNode::lt(Field::Avg, 90.0));
        assert_eq!(normalize(&tree), leaf(ComparisonOp::Gte, 90.0));

        let tree = FilterNode::not(FilterNode::is(Field::Dept, "cpsc"));
        match normalize(&tree) {
            FilterNode::Comparison(cmp) => assert_eq!(cmp.op, ComparisonOp::IsNot),
            other => panic!("unexpected node {:?}", other),
        }
    }

    #[test]
    fn test_de_morgan() {
        let tree = FilterNode::not(FilterNode::And(vec![
            FilterNode::gt(Field::Avg, 80.0),
            FilterNode::eq(Field::Avg, 85.0),
        ]));
        assert_eq!(
            normalize(&tree),
            FilterNode::Or(vec![
                leaf(ComparisonOp::Lte, 80.0),
                leaf(ComparisonOp::Neq, 85.0),
            ])
        );

        let tree = FilterNode::not(FilterNode::Or(vec![
            FilterNode::gt(Field::Avg, 80.0),
            FilterNode::lt(Field::Avg, 50.0),
        ]));
        assert_eq!(
            normalize(&tree),
            FilterNode::And(vec![
                leaf(ComparisonOp::Lte, 80.0),
                leaf(ComparisonOp::Gte, 50.0),
            ])
        );
    }

    #[test]
    fn test_double_negation_cancels() {
        let inner = FilterNode::Or(vec![
            FilterNode::gt(Field::Avg, 80.0),
            FilterNode::is(Field::Dept, "cp*"),
        ]);
        let tree = FilterNode::not(FilterNode::not(inner.clone()));
        assert_eq!(normalize(&tree), inner);
    }

    #[test]
    fn test_idempotent_and_input_untouched() {
        let tree = FilterNode::And(vec![
            FilterNode::not(FilterNode::Or(vec![
                FilterNode::not(FilterNode::gt(Field::Avg, 1.0)),
                FilterNode::is(Field::Dept, "a*"),
            ])),
            FilterNode::eq(Field::Avg, 3.0),
        ]);
        let before = tree.clone();
        let once = normalize(&tree);
        assert!(!once.contains_not());
        assert_eq!(normalize(&once), once);
        assert_eq!(tree, before);
    }
}
