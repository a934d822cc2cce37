//! Constraint-query core of a wizard (interactive oracle proof) protocol
//!
//! A prover commits to columns of field elements over several rounds;
//! queries assert relations between those columns. Each query is scheduled
//! at the round where all of its columns are committed and can be checked
//! either natively against concrete assignments or as circuit constraints.
//!
//! # Query kinds
//!
//! - [`QueryInclusion`]: lookup constraint, every (filtered) row of one
//!   table appears among the (filtered) rows of a possibly fragmented table.
//!   Checked natively with a random-linear-combination fingerprint; has no
//!   direct circuit form.
//! - [`QueryRange`]: every value of a column is below a bound.
//! - [`QueryLocalOpening`]: opens a column at its first row, the one kind
//!   here that derives a result.
//!
//! # Example
//!
//! ```rust
//! use wizard::{check_committed, CheckConfig, ProtocolBuilder, Runtime, F};
//!
//! let mut builder = ProtocolBuilder::new();
//! let a = builder.declare_column("a", 2, 0);
//! let t = builder.declare_column("t", 3, 0);
//! builder.new_inclusion(vec![a.clone()], vec![vec![t.clone()]], None, None).unwrap();
//!
//! let mut run = Runtime::new();
//! run.assign(&a, vec![F::from(1u64), F::from(3u64)]).unwrap();
//! run.assign(&t, vec![F::from(1u64), F::from(2u64), F::from(3u64)]).unwrap();
//!
//! let report = check_committed(builder.registry(), &run, &CheckConfig::default()).unwrap();
//! assert!(report.is_ok());
//! ```

pub mod builder;
pub mod checker;
pub mod circuit;
pub mod column;
pub mod config;
pub mod error;
pub mod metadata;
pub mod query;
pub mod registry;
pub mod runtime;
pub mod transcript;

pub use wizard_binary_fields::{BinaryElem128, BinaryFieldElement};

/// field of every column value
pub type F = BinaryElem128;

pub use builder::ProtocolBuilder;
pub use checker::{
    check_committed, check_round, check_round_in_circuit, compute_round_results, CheckReport,
};
pub use circuit::{Circuit, CircuitApi, CircuitBuilder, Constraint, Variable};
pub use column::{Column, ColumnId};
pub use config::CheckConfig;
pub use error::{CheckError, ConstructionError, Result};
pub use metadata::{Metadata, QueryId, Scope};
pub use query::{
    Query, QueryInclusion, QueryKind, QueryLocalOpening, QueryRange, QueryResult,
    QueryResultInCircuit,
};
pub use registry::QueryRegistry;
pub use runtime::{Assignments, CircuitRuntime, Runtime};
pub use transcript::{ChallengeSource, Sha256Transcript};
