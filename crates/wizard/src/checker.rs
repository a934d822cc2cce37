//! round driver: checks registered queries in round order
//!
//! Queries of one round only read their own columns from a shared runtime
//! and write nothing, so they are checked independently (on the rayon pool
//! with the `parallel` feature). Fail-fast mode aborts the batch on the
//! first failure; otherwise every failure is collected in a [`CheckReport`].

use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::circuit::CircuitApi;
use crate::config::CheckConfig;
use crate::error::{CheckError, Result};
use crate::query::{Query, QueryId, QueryResult};
use crate::registry::QueryRegistry;
use crate::runtime::{Assignments, CircuitRuntime, Runtime};

/// outcome of checking one or more rounds
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// number of queries checked
    pub checked: usize,
    /// failures in query order; always empty in fail-fast mode
    pub failures: Vec<(QueryId, CheckError)>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    fn merge(&mut self, other: CheckReport) {
        self.checked += other.checked;
        self.failures.extend(other.failures);
    }

    /// first failure, if any
    pub fn into_result(self) -> Result<()> {
        match self.failures.into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(()),
        }
    }
}

fn ensure_committed(round: usize, committed: usize) -> Result<()> {
    if round > committed {
        return Err(CheckError::RoundNotReached { round, committed });
    }
    Ok(())
}

fn check_one(query: &Arc<dyn Query>, run: &Runtime) -> Result<()> {
    query.check(run).map_err(|err| {
        warn!(query = %query.canonical_name(), %err, "query check failed");
        err
    })
}

#[cfg(feature = "parallel")]
fn check_fail_fast(queries: &[Arc<dyn Query>], run: &Runtime, parallel: bool) -> Result<()> {
    if parallel {
        queries.par_iter().try_for_each(|q| check_one(q, run))
    } else {
        queries.iter().try_for_each(|q| check_one(q, run))
    }
}

#[cfg(not(feature = "parallel"))]
fn check_fail_fast(queries: &[Arc<dyn Query>], run: &Runtime, _parallel: bool) -> Result<()> {
    queries.iter().try_for_each(|q| check_one(q, run))
}

fn failure(query: &Arc<dyn Query>, run: &Runtime) -> Option<(QueryId, CheckError)> {
    check_one(query, run).err().map(|err| (query.id(), err))
}

#[cfg(feature = "parallel")]
fn check_collect(queries: &[Arc<dyn Query>], run: &Runtime, parallel: bool) -> Vec<(QueryId, CheckError)> {
    if parallel {
        queries.par_iter().filter_map(|q| failure(q, run)).collect()
    } else {
        queries.iter().filter_map(|q| failure(q, run)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn check_collect(queries: &[Arc<dyn Query>], run: &Runtime, _parallel: bool) -> Vec<(QueryId, CheckError)> {
    queries.iter().filter_map(|q| failure(q, run)).collect()
}

/// check every query registered at `round`
///
/// Fails with [`CheckError::RoundNotReached`] if the runtime has not
/// committed `round`. In fail-fast mode the first failure is returned as
/// the error; otherwise failures are listed in the report.
pub fn check_round(
    registry: &QueryRegistry,
    round: usize,
    run: &Runtime,
    config: &CheckConfig,
) -> Result<CheckReport> {
    ensure_committed(round, run.committed_round())?;

    let queries = registry.at_round(round);
    debug!(round, queries = queries.len(), parallel = config.parallel, "checking round");

    if config.fail_fast {
        check_fail_fast(queries, run, config.parallel)?;
        return Ok(CheckReport {
            checked: queries.len(),
            failures: Vec::new(),
        });
    }

    Ok(CheckReport {
        checked: queries.len(),
        failures: check_collect(queries, run, config.parallel),
    })
}

/// check every round the runtime has committed, in increasing order
pub fn check_committed(registry: &QueryRegistry, run: &Runtime, config: &CheckConfig) -> Result<CheckReport> {
    let mut report = CheckReport::default();
    if registry.is_empty() {
        return Ok(report);
    }

    let last = run.committed_round().min(registry.num_rounds() - 1);
    for round in 0..=last {
        report.merge(check_round(registry, round, run, config)?);
    }
    Ok(report)
}

/// compute the results of every query of `round`, in registration order
pub fn compute_round_results(
    registry: &QueryRegistry,
    round: usize,
    run: &Runtime,
) -> Result<Vec<(QueryId, QueryResult)>> {
    ensure_committed(round, run.committed_round())?;
    registry
        .at_round(round)
        .iter()
        .map(|q| -> Result<(QueryId, QueryResult)> { Ok((q.id(), q.compute_result(run)?)) })
        .collect()
}

/// assert every query of `round` into the circuit behind `api`
///
/// Refuses the whole round, before asserting anything, if one of its
/// queries has no circuit form.
pub fn check_round_in_circuit(
    registry: &QueryRegistry,
    round: usize,
    api: &mut dyn CircuitApi,
    run: &CircuitRuntime,
) -> Result<()> {
    ensure_committed(round, run.committed_round())?;

    let queries = registry.at_round(round);
    if let Some(unsupported) = queries.iter().find(|q| !q.supports_circuit_check()) {
        return Err(CheckError::CircuitUnsupported {
            query: unsupported.canonical_name(),
        });
    }

    for query in queries {
        query.check_in_circuit(api, run)?;
    }
    debug!(round, queries = queries.len(), "round asserted in circuit");
    Ok(())
}
