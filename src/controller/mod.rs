//! # Controller Module
//!
//! Turns a matched route into a call of the action registered for the
//! request verb, and the controller's state afterwards into a response.
//!
//! ## Dispatch Protocol
//!
//! 1. A fresh [`Controller`] is built for the request (status 200, no headers, empty body)
//! 2. The HTTP method selects a [`Verb`]; no action for it is
//!    [`Error::UnhandledVerb`](crate::Error::UnhandledVerb)
//! 3. Route captures are bound as [`Args`]: named, positional, or none
//! 4. The action runs and may consult stores and render views
//! 5. `RecordNotFound` is answered by the router's default handler
//! 6. The controller's status, headers and body become the [`Response`](crate::Response)
//!
//! ## Example
//!
//! ```rust,ignore
//! let todo = ControllerHandler::new("todo", Arc::clone(&state))
//!     .get(|c, args| {
//!         let todo = c.state().todos.find(args.require("id")?)?;
//!         c.render_json(&todo.to_json())
//!     })
//!     .delete(|c, args| {
//!         if let Some(todo) = c.state().todos.safe_find(args.require("id")?) {
//!             c.state().todos.delete(&todo);
//!         }
//!         c.head(204);
//!         Ok(())
//!     });
//! router.register("/todos/:id", todo);
//! ```

mod args;
mod core;
mod verb;

pub use self::core::{Action, Controller, ControllerHandler};
pub use args::Args;
pub use verb::Verb;
