// Copyright 2025 Cowboy AI, LLC.

//! # Persistence Layer
//!
//! Durable storage for the in-progress draft so a reload or an accidental
//! close does not lose the customer's work.
//!
//! ## Components
//!
//! - **Snapshot Stores**: string key/value storage, in memory or on disk
//! - **Persistence Gateway**: snapshot encoding, freshness window and
//!   normalization on restore

pub mod gateway;
pub mod snapshot_store;

pub use gateway::{DraftSnapshot, PersistenceGateway, DEFAULT_DRAFT_KEY, DEFAULT_TTL_HOURS};
pub use snapshot_store::{FileSnapshotStore, InMemorySnapshotStore, SnapshotError, SnapshotStore};
