//! # Router Module
//!
//! Maps an incoming request path to a registered handler and binds the
//! path captures into the request context.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling string patterns (`/todos/:id`) into path templates at registration
//! - Accepting already-compiled matchers ([`regex::Regex`] or any [`PathMatcher`])
//! - Matching requests against routes in registration order (first match wins)
//! - Attaching named or positional captures to the [`Request`](crate::request::Request)
//! - Falling back to a swappable default handler ([`NotFound`] unless replaced)
//!
//! ## Example
//!
//! ```rust,ignore
//! use tramline::router::Router;
//!
//! let mut router = Router::new();
//! router
//!     .register("/todos", todos_controller)
//!     .register("/todos/:id", todo_controller);
//!
//! let response = router.dispatch(Request::new("GET", "/todos/42")?)?;
//! ```
//!
//! ## Performance
//!
//! Dispatch is O(n) in the number of routes. There is no caching and no
//! trie; a pathological custom regex dominates match cost.

mod core;
mod template;

pub use self::core::{Fallback, Handler, NotFound, Router};
pub use template::{IntoMatcher, PathMatcher, PathTemplate};
