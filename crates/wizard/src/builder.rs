//! protocol builder: declares columns and constructs queries
//!
//! The builder owns the id counters and the scope stack, so independent
//! protocols (and tests) never share state.

use std::sync::Arc;

use tracing::debug;

use crate::column::{Column, ColumnId};
use crate::error::ConstructionError;
use crate::metadata::{Metadata, QueryId, Scope};
use crate::query::{Query, QueryInclusion, QueryLocalOpening, QueryRange};
use crate::registry::QueryRegistry;

#[derive(Debug, Default)]
pub struct ProtocolBuilder {
    next_query_id: u64,
    next_column_id: u64,
    scope: Scope,
    columns: Vec<Column>,
    queries: QueryRegistry,
}

impl ProtocolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_column(&mut self, name: impl Into<String>, size: usize, round: usize) -> Column {
        let column = Column::new(ColumnId(self.next_column_id), name.into(), size, round);
        self.next_column_id += 1;
        self.columns.push(column.clone());
        column
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn push_scope(&mut self, name: impl Into<String>) {
        self.scope.push(name.into());
    }

    pub fn pop_scope(&mut self) -> Option<String> {
        self.scope.pop()
    }

    /// run `f` with `name` pushed on the scope stack
    pub fn with_scope<T>(&mut self, name: impl Into<String>, f: impl FnOnce(&mut Self) -> T) -> T {
        self.push_scope(name);
        let out = f(self);
        self.pop_scope();
        out
    }

    fn new_metadata(&mut self) -> Metadata {
        let id = QueryId(self.next_query_id);
        self.next_query_id += 1;
        Metadata::new(id, self.scope.clone())
    }

    fn register<Q: Query + 'static>(&mut self, query: Q) -> Arc<Q> {
        let query = Arc::new(query);
        let round = self.queries.add_to_round(query.clone());
        debug!(
            query = %query.canonical_name(),
            kind = %query.kind(),
            round,
            "registered query"
        );
        query
    }

    /// construct and register an inclusion query
    ///
    /// `including` is indexed `[fragment][column]`; `including_filter`, when
    /// given, holds one filter per fragment. Nothing is registered and no id
    /// is consumed if the shapes are inconsistent.
    pub fn new_inclusion(
        &mut self,
        included: Vec<Column>,
        including: Vec<Vec<Column>>,
        included_filter: Option<Column>,
        including_filter: Option<Vec<Column>>,
    ) -> Result<Arc<QueryInclusion>, ConstructionError> {
        let round = QueryInclusion::shape_round(
            &included,
            &including,
            included_filter.as_ref(),
            including_filter.as_deref(),
        )?;

        let metadata = self.new_metadata();
        Ok(self.register(QueryInclusion::new(
            included,
            including,
            included_filter,
            including_filter,
            round,
            metadata,
        )))
    }

    /// construct and register a range query: every value of `column` < `bound`
    pub fn new_range(&mut self, column: &Column, bound: u128) -> Result<Arc<QueryRange>, ConstructionError> {
        QueryRange::validate(column, bound)?;
        let metadata = self.new_metadata();
        Ok(self.register(QueryRange::new(column.clone(), bound, metadata)))
    }

    /// construct and register an opening of `column` at row 0
    pub fn new_local_opening(&mut self, column: &Column) -> Result<Arc<QueryLocalOpening>, ConstructionError> {
        QueryLocalOpening::validate(column)?;
        let metadata = self.new_metadata();
        Ok(self.register(QueryLocalOpening::new(column.clone(), metadata)))
    }

    pub fn registry(&self) -> &QueryRegistry {
        &self.queries
    }

    pub fn into_registry(self) -> QueryRegistry {
        self.queries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_and_independent() {
        let mut a = ProtocolBuilder::new();
        let mut b = ProtocolBuilder::new();
        let col_a = a.declare_column("x", 4, 0);
        let col_b = b.declare_column("x", 4, 0);

        let q0 = a.new_range(&col_a, 16).unwrap();
        let q1 = a.new_range(&col_a, 16).unwrap();
        let other = b.new_range(&col_b, 16).unwrap();

        assert_eq!(q0.id(), QueryId(0));
        assert_eq!(q1.id(), QueryId(1));
        assert_eq!(other.id(), QueryId(0));
    }

    #[test]
    fn test_failed_construction_consumes_nothing() {
        let mut builder = ProtocolBuilder::new();
        let col = builder.declare_column("x", 4, 0);

        assert_eq!(
            builder.new_range(&col, 0).unwrap_err(),
            ConstructionError::ZeroRangeBound { column: "x".into() }
        );
        assert!(builder.registry().is_empty());

        let q = builder.new_range(&col, 1).unwrap();
        assert_eq!(q.id(), QueryId(0));
    }

    #[test]
    fn test_queries_land_in_their_round() {
        let mut builder = ProtocolBuilder::new();
        let early = builder.declare_column("early", 4, 0);
        let late = builder.declare_column("late", 4, 2);

        let q_early = builder.new_range(&early, 8).unwrap();
        let q_late = builder
            .new_inclusion(vec![early.clone()], vec![vec![late.clone()]], None, None)
            .unwrap();

        let registry = builder.registry();
        assert_eq!(registry.num_rounds(), 3);
        assert_eq!(registry.at_round(0).len(), 1);
        assert!(registry.at_round(1).is_empty());
        assert_eq!(registry.at_round(2)[0].id(), q_late.id());
        assert!(registry.at_round(7).is_empty());
        assert_eq!(registry.get(q_early.id()).unwrap().round(), 0);
        assert!(registry.get(QueryId(42)).is_none());

        let rounds: Vec<usize> = registry.by_round().map(|(r, qs)| r * 10 + qs.len()).collect();
        assert_eq!(rounds, vec![1, 10, 21]);
    }

    #[test]
    fn test_scopes_prefix_names() {
        let mut builder = ProtocolBuilder::new();
        let col = builder.declare_column("limb", 4, 0);

        let q = builder.with_scope("arith", |b| {
            b.with_scope("limbs", |b| b.new_range(&col, 1 << 16).unwrap())
        });
        assert!(builder.scope().is_root());
        assert_eq!(q.canonical_name(), "arith/limbs/range_0/0");

        q.with_name("limb-16").with_tags(["bytes"]).with_doc("16-bit limbs");
        assert_eq!(q.canonical_name(), "arith/limbs/limb-16/0");
        assert_eq!(q.list_tags(), vec!["bytes", "range", "arith", "limbs"]);
    }

    #[test]
    fn test_annotate_through_shared_handle() {
        let mut builder = ProtocolBuilder::new();
        let col = builder.declare_column("x", 4, 0);
        builder.new_range(&col, 16).unwrap();

        let shared = builder.registry().at_round(0)[0].clone();
        shared.metadata().set_name("nibble");
        shared.metadata().add_tags(["hot"]);
        assert_eq!(shared.canonical_name(), "nibble/0");
        assert_eq!(shared.list_tags(), vec!["hot", "range"]);
    }
}
