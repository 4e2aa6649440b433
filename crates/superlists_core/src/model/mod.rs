//! Domain model for lists, items and the users they are shared with.
//!
//! # Responsibility
//! - Define plain records the repositories persist and services return.
//! - Keep list-level invariants (first item, sharee set) next to the data.
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned at creation.
//! - A persisted list always has at least one item.

pub mod item;
pub mod list;
pub mod user;
