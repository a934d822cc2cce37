//! the query family
//!
//! Every constraint kind implements [`Query`]: identity accessors, metadata
//! annotation, a native check, an in-circuit check and a result accessor.
//! Queries are shared as `Arc<dyn Query>` between the registry and the
//! check driver, so annotation goes through `&self`.

use std::fmt;

use crate::circuit::CircuitApi;
use crate::error::Result;
use crate::metadata::Metadata;
use crate::runtime::{CircuitRuntime, Runtime};

mod inclusion;
mod local_opening;
mod range;
mod result;

pub use crate::metadata::QueryId;
pub use inclusion::{row_fingerprint, QueryInclusion};
pub use local_opening::QueryLocalOpening;
pub use range::QueryRange;
pub use result::{QueryResult, QueryResultInCircuit};

/// tag identifying the variant of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Inclusion,
    Range,
    LocalOpening,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Inclusion => "inclusion",
            QueryKind::Range => "range",
            QueryKind::LocalOpening => "local_opening",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// common interface of every query kind
///
/// `with_name`, `with_tags` and `with_doc` chain on concrete query types
/// only; through an `Arc<dyn Query>` annotate via `metadata().set_name(..)`,
/// `add_tags(..)` and `set_doc(..)`.
pub trait Query: fmt::Debug + Send + Sync {
    fn metadata(&self) -> &Metadata;

    fn kind(&self) -> QueryKind;

    /// max round of every column the query references, fixed at construction
    fn round(&self) -> usize;

    /// check the query against concrete assignments
    fn check(&self, run: &Runtime) -> Result<()>;

    /// whether [`Query::check_in_circuit`] may be called at all
    fn supports_circuit_check(&self) -> bool {
        true
    }

    /// assert the query as circuit constraints
    fn check_in_circuit(&self, api: &mut dyn CircuitApi, run: &CircuitRuntime) -> Result<()>;

    fn compute_result(&self, run: &Runtime) -> Result<QueryResult>;

    fn compute_result_in_circuit(
        &self,
        api: &mut dyn CircuitApi,
        run: &CircuitRuntime,
    ) -> Result<QueryResultInCircuit>;

    /// variant specific lines of [`Query::explain`]
    fn describe(&self) -> String;

    fn id(&self) -> QueryId {
        self.metadata().id()
    }

    /// stable diagnostic key: scope, name and id joined with `/`
    fn canonical_name(&self) -> String {
        self.metadata().canonical(self.kind())
    }

    fn explain(&self) -> String {
        self.metadata()
            .explain(self.kind(), self.round(), &self.describe())
    }

    fn tags(&self) -> Vec<String> {
        self.metadata().tags()
    }

    fn list_tags(&self) -> Vec<String> {
        self.metadata().list_tags(self.kind())
    }

    fn with_name(&self, name: impl Into<String>) -> &Self
    where
        Self: Sized,
    {
        self.metadata().set_name(name);
        self
    }

    fn with_tags<I, S>(&self, tags: I) -> &Self
    where
        Self: Sized,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata().add_tags(tags);
        self
    }

    fn with_doc(&self, doc: impl Into<String>) -> &Self
    where
        Self: Sized,
    {
        self.metadata().set_doc(doc);
        self
    }
}

impl fmt::Display for dyn Query + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

/// comma separated column names
pub(crate) fn join_columns(columns: &[crate::column::Column]) -> String {
    columns
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}
