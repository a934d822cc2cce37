//! queries indexed by the round at which they become checkable

use std::sync::Arc;

use crate::query::{Query, QueryId};

#[derive(Debug, Default)]
pub struct QueryRegistry {
    /// `rounds[r]` holds the queries whose round is `r`
    rounds: Vec<Vec<Arc<dyn Query>>>,
    /// every query, in registration (hence id) order
    queries: Vec<Arc<dyn Query>>,
}

impl QueryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// file `query` under its own round, keeping every list in id order
    ///
    /// Returns the round the query was filed under.
    pub fn add_to_round(&mut self, query: Arc<dyn Query>) -> usize {
        let round = query.round();
        if self.rounds.len() <= round {
            self.rounds.resize_with(round + 1, Vec::new);
        }
        insert_by_id(&mut self.rounds[round], Arc::clone(&query));
        insert_by_id(&mut self.queries, query);
        round
    }

    /// queries of `round` in id order, empty past the last populated round
    pub fn at_round(&self, round: usize) -> &[Arc<dyn Query>] {
        self.rounds.get(round).map(Vec::as_slice).unwrap_or(&[])
    }

    /// one past the highest round holding a query
    pub fn num_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn get(&self, id: QueryId) -> Option<&Arc<dyn Query>> {
        self.queries
            .binary_search_by_key(&id, |q| q.id())
            .ok()
            .map(|i| &self.queries[i])
    }

    /// every query in id order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Query>> {
        self.queries.iter()
    }

    /// `(round, queries)` in increasing round order
    pub fn by_round(&self) -> impl Iterator<Item = (usize, &[Arc<dyn Query>])> {
        self.rounds
            .iter()
            .enumerate()
            .map(|(round, queries)| (round, queries.as_slice()))
    }
}

fn insert_by_id(queries: &mut Vec<Arc<dyn Query>>, query: Arc<dyn Query>) {
    let id = query.id();
    let at = queries.partition_point(|q| q.id() < id);
    queries.insert(at, query);
}
