//! Opaque, stable identifiers for orders and trades, plus the owning pool.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// An opaque identifier for an order or a trade.
///
/// Identifiers are issued by the engine at admission time and stay valid for
/// the lifetime of the engine (until [`crate::OrderBook::clear`]), so they
/// can be compared and looked up long after the order they name has filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id(Uuid);

impl Id {
    pub(crate) fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The owning set of every identifier the engine has ever issued.
///
/// Orders and trades reference identifiers by value; the pool exists so the
/// full set is enumerable and membership is checkable even after the orders
/// themselves have left the book.
#[derive(Debug, Clone, Default)]
pub struct IdPool {
    ids: HashSet<Id>,
}

impl IdPool {
    pub(crate) fn insert(&mut self, id: Id) {
        self.ids.insert(id);
    }

    /// True if the identifier was issued by this engine.
    #[must_use]
    pub fn contains(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }

    /// Number of identifiers issued so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if no identifier has been issued yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over all issued identifiers in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.ids.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
    }
}
