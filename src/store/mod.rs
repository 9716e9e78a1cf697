//! # Store Module
//!
//! In-memory, per-type record stores used by controllers to persist and
//! retrieve domain records.
//!
//! ## Overview
//!
//! - [`Schema`] declares the attribute set of a record type once. A type may
//!   extend a base schema; the base attributes are snapshotted at that point.
//! - [`Fields`] is the schema-bound storage every record embeds: an optional
//!   identity plus one value per declared attribute.
//! - [`Record`] is the trait a domain type implements to be storable.
//! - [`Store`] holds the records of one type behind a single `RwLock`.
//!
//! ## Record Lifecycle
//!
//! 1. `T::build()` creates an unsaved record with no identity
//! 2. `merge` applies a JSON payload (partial or full)
//! 3. `Store::save` assigns an identity if absent, runs the hooks and inserts
//! 4. `Store::delete` removes the record; no tombstone is kept
//!
//! ## Example
//!
//! ```rust,ignore
//! let todos: Store<Todo> = Store::new();
//! let mut todo = Todo::build();
//! todo.merge(&payload, false)?;
//! let id = todos.save(&mut todo);
//! assert_eq!(todos.find(id.as_str())?.title(), Some("buy milk"));
//! ```
//!
//! Nothing here is durable; a store lives exactly as long as the process.

mod core;
mod record;
mod schema;

pub use self::core::Store;
pub use record::{Fields, Record};
pub use schema::{AttrKind, Attribute, Schema};
