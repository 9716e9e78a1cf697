//! # Tramline
//!
//! **Tramline** is a small in-process request dispatch stack: an ordered path
//! router, per-request controllers with one action per HTTP verb, and typed
//! in-memory record stores.
//!
//! ## Overview
//!
//! A host (a server loop, a CLI, a test) hands the [`Router`] a method, a
//! request target, headers and a body. The router walks its table in
//! registration order, binds the path captures into the [`Request`] and calls
//! the first matching [`Handler`]. Controllers look records up in a
//! [`Store`], render through the [`Views`] collaborators and hand back a
//! [`Response`] triple of status, headers and body chunks.
//!
//! ## Architecture
//!
//! - **[`router`]** - Path templates, regex matchers and first-match dispatch
//! - **[`controller`]** - Verb-to-action tables and the per-request controller
//! - **[`store`]** - Schemas, schema-bound records and the typed in-memory stores
//! - **[`request`]** / **[`response`]** - The request context and the response triple
//! - **[`views`]** - Rendering (`minijinja`) and the logical-kind MIME table
//! - **[`config`]** / **[`logging`]** - YAML configuration and `tracing` setup
//! - **[`error`]** / **[`ids`]** - The crate error type and ULID-backed identities
//!
//! ### Request Handling Flow
//!
//! ```text
//! host ──► Router::handle ──► Request ──► first matching route?
//!                                           │ yes                    │ no
//!                                           ▼                        ▼
//!                              ControllerHandler::call        default handler
//!                                  verb ─► action                (NotFound)
//!                                  RecordNotFound ─► default handler
//!                                           │
//!                                           ▼
//!                             Response (status, headers, chunks)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tramline::{ControllerHandler, Request, Router};
//!
//! let state = Arc::new(AppState::default());
//! let mut router = Router::new();
//! router.register(
//!     "/todos/:id",
//!     ControllerHandler::new("todo", Arc::clone(&state)).get(|c, args| {
//!         let todo = c.state().todos.find(args.require("id")?)?;
//!         c.render_json(&todo.to_json())
//!     }),
//! );
//!
//! let response = router.dispatch(Request::new("GET", "/todos/1")?)?;
//! ```
//!
//! ## Runtime Considerations
//!
//! Dispatch is synchronous and runs on the caller's thread. The router and
//! its handlers are `Send + Sync`, so one router can serve many threads;
//! each store serializes its own mutations behind a single lock.
//!
//! ## Example: To-do App
//!
//! `demos/todo_app` is a complete application built on the crate: a
//! timestamped `Todo` record, `/todos` and `/todos/:id` controllers, and a
//! CLI host that dispatches one request and prints the response.

pub mod config;
pub mod controller;
pub mod error;
pub mod ids;
pub mod logging;
pub mod request;
pub mod response;
pub mod router;
pub mod store;
pub mod views;

pub use controller::{Args, Controller, ControllerHandler, Verb};
pub use error::{Error, Result};
pub use ids::{RecordId, RequestId};
pub use request::{Params, Request};
pub use response::{Body, Response};
pub use router::{Fallback, Handler, NotFound, PathMatcher, PathTemplate, Router};
pub use store::{AttrKind, Fields, Record, Schema, Store};
pub use views::{MimeTypes, MiniJinjaRenderer, Renderer, Views};
