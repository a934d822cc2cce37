use super::{Query, QueryKind, QueryResult, QueryResultInCircuit};
use crate::circuit::CircuitApi;
use crate::column::Column;
use crate::error::{CheckError, ConstructionError, Result};
use crate::metadata::Metadata;
use crate::runtime::{CircuitRuntime, Runtime};

/// opens `column` at its first row
///
/// The prover records the claimed value as the query parameters of the
/// runtime; checking compares it against the column.
#[derive(Debug)]
pub struct QueryLocalOpening {
    pub column: Column,

    metadata: Metadata,
    round: usize,
}

impl QueryLocalOpening {
    pub(crate) fn validate(column: &Column) -> core::result::Result<(), ConstructionError> {
        if column.size() == 0 {
            return Err(ConstructionError::EmptyColumn {
                column: column.name().to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn new(column: Column, metadata: Metadata) -> Self {
        let round = column.round();
        Self {
            column,
            metadata,
            round,
        }
    }

    fn missing_params(&self) -> CheckError {
        CheckError::MissingParams {
            query: self.canonical_name(),
            id: self.id(),
        }
    }
}

impl Query for QueryLocalOpening {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn kind(&self) -> QueryKind {
        QueryKind::LocalOpening
    }

    fn round(&self) -> usize {
        self.round
    }

    fn check(&self, run: &Runtime) -> Result<()> {
        let computed = self.compute_result(run)?;
        let claimed = run
            .query_params(self.id())
            .ok_or_else(|| self.missing_params())?;

        if claimed != computed.values() {
            return Err(CheckError::ParamsMismatch {
                query: self.canonical_name(),
                claimed: claimed.to_vec(),
                computed: computed.values().to_vec(),
            });
        }
        Ok(())
    }

    fn check_in_circuit(&self, api: &mut dyn CircuitApi, run: &CircuitRuntime) -> Result<()> {
        let opened = self.column.get_assignment(run)?[0];
        match run.query_params(self.id()) {
            Some([claimed]) => {
                api.assert_is_equal(*claimed, opened);
                Ok(())
            }
            _ => Err(self.missing_params()),
        }
    }

    fn compute_result(&self, run: &Runtime) -> Result<QueryResult> {
        // non-empty since construction, and assignments match the column size
        let values = self.column.get_assignment(run)?;
        Ok(QueryResult::Values(vec![values[0]]))
    }

    fn compute_result_in_circuit(
        &self,
        _api: &mut dyn CircuitApi,
        run: &CircuitRuntime,
    ) -> Result<QueryResultInCircuit> {
        let vars = self.column.get_assignment(run)?;
        Ok(QueryResultInCircuit::Values(vec![vars[0]]))
    }

    fn describe(&self) -> String {
        format!("column: {}\nposition: 0", self.column)
    }
}
