// Copyright 2025 Cowboy AI, LLC.

//! Entity identity and the aggregate root marker

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed entity ID using phantom types for type safety
///
/// IDs are assigned once when the entity is created and never reused.
/// The phantom type parameter keeps a pair ID from being passed where
/// a draft ID is expected.
///
/// # Examples
///
/// ```rust
/// use cordo_intake::{EntityId, PairMarker, DraftMarker};
///
/// let pair_id = EntityId::<PairMarker>::new();
/// let draft_id = EntityId::<DraftMarker>::new();
///
/// // These are different types - won't compile if mixed up:
/// // let _: EntityId<PairMarker> = draft_id; // ERROR!
/// assert_ne!(pair_id.as_uuid(), draft_id.as_uuid());
/// ```
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId<T> {
    id: Uuid,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }
}

// Manual impls so the marker type needs none of these traits itself.
impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityId").field(&self.id).finish()
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

impl<T> std::str::FromStr for EntityId<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self::from_uuid)
    }
}

/// Marker type for pair (line item) identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairMarker;

/// Marker type for order draft identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftMarker;

/// Identity of one pair of shoes within a draft
pub type PairId = EntityId<PairMarker>;

/// Identity of an order draft
pub type DraftId = EntityId<DraftMarker>;

/// Marker trait for aggregate roots
///
/// All changes to entities within an aggregate must go through the root.
pub trait AggregateRoot: Sized {
    /// The type of ID for this aggregate
    type Id: Copy + Eq + Send + Sync;

    /// Get the aggregate's ID
    fn id(&self) -> Self::Id;

    /// Get the aggregate's version, bumped on every mutation
    fn version(&self) -> u64;

    /// Increment the version
    fn increment_version(&mut self);
}
