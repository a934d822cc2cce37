//! column handles
//!
//! A column is a named, sized vector of field elements committed at a given
//! protocol round. Queries only hold handles; the values live in a runtime.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::runtime::Assignments;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnId(pub u64);

#[derive(Debug)]
struct ColumnInfo {
    id: ColumnId,
    name: String,
    size: usize,
    round: usize,
}

/// cheap-clone handle to a declared column
#[derive(Debug, Clone)]
pub struct Column(Arc<ColumnInfo>);

impl Column {
    pub(crate) fn new(id: ColumnId, name: String, size: usize, round: usize) -> Self {
        Self(Arc::new(ColumnInfo {
            id,
            name,
            size,
            round,
        }))
    }

    pub fn id(&self) -> ColumnId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn size(&self) -> usize {
        self.0.size
    }

    pub fn round(&self) -> usize {
        self.0.round
    }

    /// values of this column in `run`, native or in-circuit
    pub fn get_assignment<'r, R: Assignments>(&self, run: &'r R) -> Result<&'r [R::Value]> {
        run.assignment(self)
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Column {}

impl Hash for Column {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}
