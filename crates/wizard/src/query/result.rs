use serde::{Deserialize, Serialize};

use crate::circuit::Variable;
use crate::F;

/// value derived by a query from a native runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryResult {
    /// pure constraint, nothing derived
    None,
    Values(Vec<F>),
}

impl QueryResult {
    pub fn values(&self) -> &[F] {
        match self {
            QueryResult::None => &[],
            QueryResult::Values(values) => values,
        }
    }
}

/// in-circuit counterpart of [`QueryResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResultInCircuit {
    None,
    Values(Vec<Variable>),
}
