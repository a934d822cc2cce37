//! error types for query construction and checking

use crate::query::QueryId;
use crate::F;

/// a malformed query shape, detected before anything is registered
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("the included table has no columns")]
    EmptyIncluded,

    #[error("no including fragments were provided")]
    NoFragments,

    #[error(
        "Table(T)[fragment={fragment}] and lookups(S) don't have the same number of columns {got} {expected}"
    )]
    ColumnCountMismatch {
        fragment: usize,
        got: usize,
        expected: usize,
    },

    #[error(
        "the fragment {fragment} of the including table is malformed, all columns must have the same length: `{column}` has size {got}, expected {expected}"
    )]
    FragmentSizeMismatch {
        fragment: usize,
        column: String,
        got: usize,
        expected: usize,
    },

    #[error("{got} including filters were provided for {expected} fragments")]
    FilterCountMismatch { got: usize, expected: usize },

    #[error(
        "the filter of including fragment #{fragment} does not have the same size ({got}) as the table fragment it is referring to ({expected})"
    )]
    IncludingFilterSize {
        fragment: usize,
        got: usize,
        expected: usize,
    },

    #[error(
        "the included table is malformed, all columns must have the same length: `{column}` has size {got}, expected {expected}"
    )]
    IncludedSizeMismatch {
        column: String,
        got: usize,
        expected: usize,
    },

    #[error(
        "the included filter (size={got}) does not have the same size as the table it is referring to (size={expected})"
    )]
    IncludedFilterSize { got: usize, expected: usize },

    #[error("range query on `{column}` has an empty range (bound 0)")]
    ZeroRangeBound { column: String },

    #[error("cannot open column `{column}`: it has no rows")]
    EmptyColumn { column: String },
}

/// a recoverable failure while checking a query against a runtime
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckError {
    #[error("query `{query}`: row {row} was not found in the `including` table : [{}]", .values.join(", "))]
    RowNotIncluded {
        query: String,
        row: usize,
        /// `column=value` pairs of the missing row
        values: Vec<String>,
    },

    #[error("query `{query}`: row {row} of `{column}` holds {value}, not below {bound}")]
    OutOfRange {
        query: String,
        column: String,
        row: usize,
        value: F,
        bound: u128,
    },

    #[error("column `{column}` belongs to round {round} but the runtime only committed round {committed}")]
    RoundNotCommitted {
        column: String,
        round: usize,
        committed: usize,
    },

    #[error("cannot check round {round}: the runtime only committed round {committed}")]
    RoundNotReached { round: usize, committed: usize },

    #[error("column `{column}` has no assignment")]
    MissingAssignment { column: String },

    #[error("assignment of `{column}` has {got} values, the column has size {expected}")]
    AssignmentSize {
        column: String,
        got: usize,
        expected: usize,
    },

    #[error("query `{query}` ({id}) has no recorded parameters")]
    MissingParams { query: String, id: QueryId },

    #[error("query `{query}`: recorded parameters {claimed:?} differ from the computed {computed:?}")]
    ParamsMismatch {
        query: String,
        claimed: Vec<F>,
        computed: Vec<F>,
    },

    #[error("query `{query}` cannot be checked in a circuit")]
    CircuitUnsupported { query: String },
}

pub type Result<T> = core::result::Result<T, CheckError>;
