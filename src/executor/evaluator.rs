//! Filter tree evaluation over a record store
//!
//! Works on record positions so every result is deduplicated and in scan
//! order. A leaf scans the store once; `Or` is the union of its children;
//! `And` takes the first child's set and narrows it with each later child.

use std::collections::BTreeSet;

use tracing::debug;

use super::filters::CompiledFilter;
use crate::dataset::Record;

/// Returns the records selected by `filter`; `None` selects every record
pub fn evaluate<'r, R: Record>(filter: Option<&CompiledFilter>, records: &'r [R]) -> Vec<&'r R> {
    let selected: Vec<&R> = match filter {
        None => records.iter().collect(),
        Some(filter) => candidates(filter, records)
            .into_iter()
            .map(|i| &records[i])
            .collect(),
    };
    debug!(
        kind = %R::KIND,
        scanned = records.len(),
        selected = selected.len(),
        "filter evaluated"
    );
    selected
}

fn candidates<R: Record>(filter: &CompiledFilter, records: &[R]) -> BTreeSet<usize> {
    match filter {
        CompiledFilter::Leaf(pred) => records
            .iter()
            .enumerate()
            .filter(|(_, r)| pred.matches(*r))
            .map(|(i, _)| i)
            .collect(),
        CompiledFilter::Or(children) => children
            .iter()
            .flat_map(|child| candidates(child, records))
            .collect(),
        CompiledFilter::And(children) => {
            let (first, rest) = match children.split_first() {
                Some(split) => split,
                None => return (0..records.len()).collect(),
            };
            let mut set = candidates(first, records);
            for child in rest {
                set.retain(|&i| child.matches(&records[i]));
            }
            set
        }
    }
}
