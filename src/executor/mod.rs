//! Query executor subsystem for insightdb
//!
//! The executor consumes validated queries and produces deterministic
//! results.
//!
//! # Execution Flow (strict order)
//!
//! 1. Normalize negations and compile the filter tree
//! 2. Evaluate the filter over the record store (scan order)
//! 3. Project, or group and aggregate
//! 4. Enforce the result row limit
//! 5. Apply sort (if specified)

mod aggregate;
mod errors;
mod evaluator;
mod executor;
mod filters;
mod normalize;
mod result;
mod sorter;

pub use aggregate::aggregate;
pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use evaluator::evaluate;
pub use executor::{QueryExecutor, MAX_RESULT_ROWS};
pub use filters::{CompiledFilter, PredicateFilter, WildcardPattern};
pub use normalize::normalize;
pub use result::{ExecutionResult, Row};
pub use sorter::ResultSorter;
