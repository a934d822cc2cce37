//! query identity, naming and annotations

use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::query::QueryKind;

/// unique, monotonically assigned query identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueryId(pub u64);

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// hierarchical naming context, outermost segment first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Scope {
    segments: Vec<String>,
}

impl Scope {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    pub(crate) fn push(&mut self, name: String) {
        self.segments.push(name);
    }

    pub(crate) fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn full_scope(&self) -> String {
        self.segments.join("/")
    }
}

#[derive(Debug, Default)]
struct Annotations {
    name: Option<String>,
    tags: Vec<String>,
    doc: String,
}

/// identity and diagnostics attached to every query
///
/// The id and scope are fixed at construction. Name, tags and doc may be
/// annotated afterwards through a shared reference.
#[derive(Debug)]
pub struct Metadata {
    id: QueryId,
    scope: Scope,
    annotations: RwLock<Annotations>,
}

impl Metadata {
    pub(crate) fn new(id: QueryId, scope: Scope) -> Self {
        Self {
            id,
            scope,
            annotations: RwLock::new(Annotations::default()),
        }
    }

    pub fn id(&self) -> QueryId {
        self.id
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.annotations.write().name = Some(name.into());
    }

    pub fn add_tags<I, S>(&self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotations
            .write()
            .tags
            .extend(tags.into_iter().map(Into::into));
    }

    pub fn set_doc(&self, doc: impl Into<String>) {
        self.annotations.write().doc = doc.into();
    }

    pub fn name(&self) -> Option<String> {
        self.annotations.read().name.clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.annotations.read().tags.clone()
    }

    pub fn doc(&self) -> String {
        self.annotations.read().doc.clone()
    }

    /// explicit name, or `<kind>_<id>`
    pub fn name_or_default(&self, kind: QueryKind) -> String {
        self.name()
            .unwrap_or_else(|| format!("{}_{}", kind.as_str(), self.id))
    }

    /// scope segments, name and id joined with `/`
    pub fn canonical(&self, kind: QueryKind) -> String {
        let mut parts: Vec<String> = self.scope.segments.clone();
        parts.push(self.name_or_default(kind));
        parts.push(self.id.to_string());
        parts.join("/")
    }

    /// explicit tags, then the kind, then the scope segments, without repeats
    pub fn list_tags(&self, kind: QueryKind) -> Vec<String> {
        let implied = std::iter::once(kind.as_str().to_string()).chain(self.scope.segments.iter().cloned());

        let mut tags: Vec<String> = Vec::new();
        for tag in self.tags().into_iter().chain(implied) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }

    pub fn explain(&self, kind: QueryKind, round: usize, details: &str) -> String {
        let mut out = format!("{} query `{}` (round {})", kind, self.canonical(kind), round);
        let doc = self.doc();
        if !doc.is_empty() {
            out.push_str(&format!("\n  doc: {doc}"));
        }
        let tags = self.list_tags(kind);
        out.push_str(&format!("\n  tags: {}", tags.join(", ")));
        for line in details.lines() {
            out.push_str("\n  ");
            out.push_str(line);
        }
        out
    }
}
