use tracing::{debug, warn};

use crate::stage::handle::StageHandle;

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

struct Edge<T> {
    predicate: Option<Predicate<T>>,
    target: StageHandle<T>,
}

/// Predicate-guarded fan-out from one producing stage to its consumers.
///
/// Edges are evaluated in link order and the first predicate returning
/// `true` wins, so each item reaches exactly one consumer. An edge linked
/// with [`otherwise`](Self::otherwise) matches everything and must come
/// last. An item matching no edge is dropped, not treated as a fault.
///
/// Routing is a local, synchronous decision made as each output is
/// produced: no buffering of routing decisions, and items from one
/// producer arrive at a given target in production order.
pub struct Router<T> {
    edges: Vec<Edge<T>>,
    has_default: bool,
}

impl<T: Send + 'static> Router<T> {
    /// Creates a router with no edges; every output will be dropped.
    #[must_use]
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            has_default: false,
        }
    }

    /// Adds a predicated edge.
    ///
    /// # Panics
    ///
    /// Panics if the default edge has already been linked; the default
    /// must be the last edge.
    #[must_use]
    pub fn when(
        mut self,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
        target: StageHandle<T>,
    ) -> Self {
        assert!(!self.has_default, "the default edge must be linked last");
        self.edges.push(Edge {
            predicate: Some(Box::new(predicate)),
            target,
        });
        self
    }

    /// Adds the catch-all default edge.
    ///
    /// # Panics
    ///
    /// Panics if a default edge has already been linked; a stage may have
    /// at most one.
    #[must_use]
    pub fn otherwise(mut self, target: StageHandle<T>) -> Self {
        assert!(
            !self.has_default,
            "a stage may have at most one default edge"
        );
        self.has_default = true;
        self.edges.push(Edge {
            predicate: None,
            target,
        });
        self
    }

    pub(crate) async fn deliver(&self, item: T) {
        for edge in &self.edges {
            let matched = edge.predicate.as_ref().is_none_or(|predicate| predicate(&item));
            if matched {
                if let Err(e) = edge.target.submit(item).await {
                    // the target was already driven to a terminal outcome
                    // by a concurrent cascade; the item is discarded
                    warn!(
                        target_stage = edge.target.name(),
                        error = %e,
                        "route target closed; item dropped"
                    );
                }
                return;
            }
        }
        debug!("item matched no route; dropped");
    }
}

impl<T: Send + 'static> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}
