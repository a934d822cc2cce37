//! inclusion query (a.k.a. lookup constraint)
//!
//! Asserts that every row of the "included" table appears among the rows of
//! the "including" table. Both sides may be filtered by binary columns and
//! the including table may be fragmented into several physically distinct
//! tables of the same width.
//!
//! ## native check
//!
//! Each row is collapsed into a single fingerprint
//! `sum_i alpha^i * row[i]` for a random `alpha`, so membership is a set
//! lookup instead of a tuple comparison. Two distinct rows collide with
//! probability at most `(ncols - 1) / 2^128` over the choice of `alpha`
//! (a nonzero polynomial of degree `ncols - 1` has at most that many
//! roots), so a missing row is accepted with at most that probability per
//! compared pair. A collision never rejects a row that is present.

use std::collections::HashSet;

use tracing::{trace, warn};
use wizard_binary_fields::BinaryFieldElement;

use super::{join_columns, Query, QueryKind, QueryResult, QueryResultInCircuit};
use crate::circuit::CircuitApi;
use crate::column::Column;
use crate::error::{CheckError, ConstructionError, Result};
use crate::metadata::Metadata;
use crate::runtime::{CircuitRuntime, Runtime};
use crate::F;

#[derive(Debug)]
pub struct QueryInclusion {
    /// table over which the constraint applies, all columns of one size
    pub included: Vec<Column>,
    /// reference table, indexed `[fragment][column]`; an unfragmented table
    /// has a single fragment
    pub including: Vec<Vec<Column>>,
    /// (allegedly) binary column: 1 if the included row is subject to the
    /// constraint, 0 if it is disregarded
    pub included_filter: Option<Column>,
    /// one (allegedly) binary column per fragment: 1 if the including row
    /// may be matched, 0 if it is forbidden
    pub including_filter: Option<Vec<Column>>,

    metadata: Metadata,
    round: usize,
}

impl QueryInclusion {
    /// validate the table shapes and return the round of the query
    pub(crate) fn shape_round(
        included: &[Column],
        including: &[Vec<Column>],
        included_filter: Option<&Column>,
        including_filter: Option<&[Column]>,
    ) -> core::result::Result<usize, ConstructionError> {
        if included.is_empty() {
            return Err(ConstructionError::EmptyIncluded);
        }

        if including.is_empty() {
            return Err(ConstructionError::NoFragments);
        }

        if let Some(filters) = including_filter {
            if filters.len() != including.len() {
                return Err(ConstructionError::FilterCountMismatch {
                    got: filters.len(),
                    expected: including.len(),
                });
            }
        }

        let n_col = included.len();
        let mut round = 0;

        for (frag, columns) in including.iter().enumerate() {
            if columns.len() != n_col {
                return Err(ConstructionError::ColumnCountMismatch {
                    fragment: frag,
                    got: columns.len(),
                    expected: n_col,
                });
            }

            let size = columns[0].size();
            for c in columns {
                round = round.max(c.round());
                if c.size() != size {
                    return Err(ConstructionError::FragmentSizeMismatch {
                        fragment: frag,
                        column: c.name().to_string(),
                        got: c.size(),
                        expected: size,
                    });
                }
            }

            if let Some(filters) = including_filter {
                let filter = &filters[frag];
                round = round.max(filter.round());
                if filter.size() != size {
                    return Err(ConstructionError::IncludingFilterSize {
                        fragment: frag,
                        got: filter.size(),
                        expected: size,
                    });
                }
            }
        }

        let size = included[0].size();
        for c in included {
            round = round.max(c.round());
            if c.size() != size {
                return Err(ConstructionError::IncludedSizeMismatch {
                    column: c.name().to_string(),
                    got: c.size(),
                    expected: size,
                });
            }
        }

        if let Some(filter) = included_filter {
            round = round.max(filter.round());
            if filter.size() != size {
                return Err(ConstructionError::IncludedFilterSize {
                    got: filter.size(),
                    expected: size,
                });
            }
        }

        Ok(round)
    }

    pub(crate) fn new(
        included: Vec<Column>,
        including: Vec<Vec<Column>>,
        included_filter: Option<Column>,
        including_filter: Option<Vec<Column>>,
        round: usize,
        metadata: Metadata,
    ) -> Self {
        Self {
            included,
            including,
            included_filter,
            including_filter,
            metadata,
            round,
        }
    }

    pub fn is_filtered_on_including(&self) -> bool {
        self.including_filter.is_some()
    }

    pub fn is_filtered_on_included(&self) -> bool {
        self.included_filter.is_some()
    }

    pub fn num_fragments(&self) -> usize {
        self.including.len()
    }
}

/// `sum_i alpha^i * columns[i][row]`, evaluated with horner
pub fn row_fingerprint(alpha: F, row: usize, columns: &[&[F]]) -> F {
    columns
        .iter()
        .rev()
        .fold(F::zero(), |acc, column| acc.mul(&alpha).add(&column[row]))
}

fn fetch_all<'r>(columns: &[Column], run: &'r Runtime) -> Result<Vec<&'r [F]>> {
    columns.iter().map(|c| c.get_assignment(run)).collect()
}

impl Query for QueryInclusion {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn kind(&self) -> QueryKind {
        QueryKind::Inclusion
    }

    fn round(&self) -> usize {
        self.round
    }

    fn check(&self, run: &Runtime) -> Result<()> {
        let including = self
            .including
            .iter()
            .map(|fragment| fetch_all(fragment, run))
            .collect::<Result<Vec<_>>>()?;
        let included = fetch_all(&self.included, run)?;

        let filter_including = self
            .including_filter
            .as_deref()
            .map(|filters| fetch_all(filters, run))
            .transpose()?;
        let filter_included = self
            .included_filter
            .as_ref()
            .map(|filter| filter.get_assignment(run))
            .transpose()?;

        let name = self.canonical_name();
        let alpha = run.challenges().draw(&name);

        // gather the eligible rows of every fragment
        let mut inclusion_set = HashSet::new();
        for (frag, columns) in including.iter().enumerate() {
            let filter = filter_including.as_ref().map(|filters| filters[frag]);
            for row in 0..self.including[frag][0].size() {
                if filter.map_or(true, |f| f[row] == F::one()) {
                    inclusion_set.insert(row_fingerprint(alpha, row, columns));
                }
            }
        }

        trace!(
            query = %name,
            fragments = including.len(),
            distinct_rows = inclusion_set.len(),
            "inclusion set built"
        );

        for row in 0..self.included[0].size() {
            if filter_included.map_or(false, |f| f[row].is_zero()) {
                continue;
            }

            if !inclusion_set.contains(&row_fingerprint(alpha, row, &included)) {
                let values = self
                    .included
                    .iter()
                    .zip(&included)
                    .map(|(column, values)| format!("{}={}", column, values[row]))
                    .collect();
                let err = CheckError::RowNotIncluded {
                    query: name,
                    row,
                    values,
                };
                warn!(%err, "inclusion check failed");
                return Err(err);
            }
        }

        Ok(())
    }

    fn supports_circuit_check(&self) -> bool {
        false
    }

    /// panics: a membership search has no direct circuit form, the
    /// constraint must be compiled into a lookup argument beforehand
    fn check_in_circuit(&self, _api: &mut dyn CircuitApi, _run: &CircuitRuntime) -> Result<()> {
        panic!(
            "UNSUPPORTED: can't check an inclusion query directly in the circuit ({})",
            self.canonical_name()
        )
    }

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
        let mut out = format!("included: [{}]", join_columns(&self.included));
        if let Some(filter) = &self.included_filter {
            out.push_str(&format!(" filtered by {filter}"));
        }
        for (frag, columns) in self.including.iter().enumerate() {
            out.push_str(&format!("\nincluding[{frag}]: [{}]", join_columns(columns)));
            if let Some(filters) = &self.including_filter {
                out.push_str(&format!(" filtered by {}", filters[frag]));
            }
        }
        out
    }
}
