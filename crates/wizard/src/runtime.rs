//! native and in-circuit runtimes
//!
//! Both map columns to their committed values for one proof instance: the
//! native [`Runtime`] to field elements, the [`CircuitRuntime`] to circuit
//! variables. Reads are refused for columns of a round the runtime has not
//! committed yet.

use std::collections::BTreeMap;

use crate::circuit::{CircuitBuilder, Variable};
use crate::column::{Column, ColumnId};
use crate::error::{CheckError, Result};
use crate::query::QueryId;
use crate::transcript::ChallengeSource;
use crate::F;

/// uniform read access to column assignments
pub trait Assignments {
    type Value;

    /// highest round whose columns may be read
    fn committed_round(&self) -> usize;

    fn lookup(&self, id: ColumnId) -> Option<&[Self::Value]>;

    fn assignment(&self, column: &Column) -> Result<&[Self::Value]> {
        let committed = self.committed_round();
        if column.round() > committed {
            return Err(CheckError::RoundNotCommitted {
                column: column.name().to_string(),
                round: column.round(),
                committed,
            });
        }
        self.lookup(column.id())
            .ok_or_else(|| CheckError::MissingAssignment {
                column: column.name().to_string(),
            })
    }
}

/// concrete assignments of one proof instance
#[derive(Debug, Default, Clone)]
pub struct Runtime {
    assignments: BTreeMap<ColumnId, Vec<F>>,
    params: BTreeMap<QueryId, Vec<F>>,
    committed_round: usize,
    challenges: ChallengeSource,
}

impl Runtime {
    /// runtime drawing challenges from OS entropy, round 0 committed
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_challenges(challenges: ChallengeSource) -> Self {
        Self {
            challenges,
            ..Self::default()
        }
    }

    /// bind the values of `column`
    pub fn assign(&mut self, column: &Column, values: Vec<F>) -> Result<()> {
        if values.len() != column.size() {
            return Err(CheckError::AssignmentSize {
                column: column.name().to_string(),
                got: values.len(),
                expected: column.size(),
            });
        }
        self.assignments.insert(column.id(), values);
        Ok(())
    }

    /// record the values a query claims (e.g. an opening sent to the verifier)
    pub fn assign_query_params(&mut self, id: QueryId, values: Vec<F>) {
        self.params.insert(id, values);
    }

    pub fn query_params(&self, id: QueryId) -> Option<&[F]> {
        self.params.get(&id).map(Vec::as_slice)
    }

    /// mark every round up to `round` as committed; never moves backwards
    pub fn commit_round(&mut self, round: usize) {
        self.committed_round = self.committed_round.max(round);
    }

    pub fn challenges(&self) -> &ChallengeSource {
        &self.challenges
    }
}

impl Assignments for Runtime {
    type Value = F;

    fn committed_round(&self) -> usize {
        self.committed_round
    }

    fn lookup(&self, id: ColumnId) -> Option<&[F]> {
        self.assignments.get(&id).map(Vec::as_slice)
    }
}

/// circuit variables standing for the assignments of one proof instance
#[derive(Debug, Default, Clone)]
pub struct CircuitRuntime {
    assignments: BTreeMap<ColumnId, Vec<Variable>>,
    params: BTreeMap<QueryId, Vec<Variable>>,
    committed_round: usize,
}

impl CircuitRuntime {
    /// allocate one witness variable per assigned value of `run`, in column
    /// then query id order
    pub fn allocate(builder: &mut CircuitBuilder, run: &Runtime) -> Self {
        let assignments = run
            .assignments
            .iter()
            .map(|(id, values)| (*id, allocate_all(builder, values)))
            .collect();
        let params = run
            .params
            .iter()
            .map(|(id, values)| (*id, allocate_all(builder, values)))
            .collect();

        Self {
            assignments,
            params,
            committed_round: run.committed_round,
        }
    }

    pub fn query_params(&self, id: QueryId) -> Option<&[Variable]> {
        self.params.get(&id).map(Vec::as_slice)
    }
}

fn allocate_all(builder: &mut CircuitBuilder, values: &[F]) -> Vec<Variable> {
    values.iter().map(|v| builder.add_witness(*v)).collect()
}

impl Assignments for CircuitRuntime {
    type Value = Variable;

    fn committed_round(&self) -> usize {
        self.committed_round
    }

    fn lookup(&self, id: ColumnId) -> Option<&[Variable]> {
        self.assignments.get(&id).map(Vec::as_slice)
    }
}
