use super::{Query, QueryKind, QueryResult, QueryResultInCircuit};
use crate::circuit::CircuitApi;
use crate::column::Column;
use crate::error::{CheckError, ConstructionError, Result};
use crate::metadata::Metadata;
use crate::runtime::{CircuitRuntime, Runtime};

/// every value of `column`, read as an unsigned integer, is below `bound`
#[derive(Debug)]
pub struct QueryRange {
    pub column: Column,
    pub bound: u128,

    metadata: Metadata,
    round: usize,
}

impl QueryRange {
    pub(crate) fn validate(column: &Column, bound: u128) -> core::result::Result<(), ConstructionError> {
        if bound == 0 {
            return Err(ConstructionError::ZeroRangeBound {
                column: column.name().to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn new(column: Column, bound: u128, metadata: Metadata) -> Self {
        let round = column.round();
        Self {
            column,
            bound,
            metadata,
            round,
        }
    }
}

impl Query for QueryRange {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn kind(&self) -> QueryKind {
        QueryKind::Range
    }

    fn round(&self) -> usize {
        self.round
    }

    fn check(&self, run: &Runtime) -> Result<()> {
        let values = self.column.get_assignment(run)?;
        match values.iter().position(|v| v.value() >= self.bound) {
            None => Ok(()),
            Some(row) => Err(CheckError::OutOfRange {
                query: self.canonical_name(),
                column: self.column.name().to_string(),
                row,
                value: values[row],
                bound: self.bound,
            }),
        }
    }

    fn check_in_circuit(&self, api: &mut dyn CircuitApi, run: &CircuitRuntime) -> Result<()> {
        for var in self.column.get_assignment(run)? {
            api.assert_less_than(*var, self.bound);
        }
        Ok(())
    }

    /// range constraints are pure side-constraints, nothing is derived
    fn compute_result(&self, _run: &Runtime) -> Result<QueryResult> {
        Ok(QueryResult::None)
    }

    fn compute_result_in_circuit(
        &self,
        _api: &mut dyn CircuitApi,
        _run: &CircuitRuntime,
    ) -> Result<QueryResultInCircuit> {
        Ok(QueryResultInCircuit::None)
    }

    fn describe(&self) -> String {
        format!("column: {}\nbound: {}", self.column, self.bound)
    }
}
