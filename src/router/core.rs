use crate::error::{Error, Result};
use crate::request::Request;
use crate::response::Response;
use std::io::Read;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span, warn};

use super::template::{IntoMatcher, PathMatcher};

/// Anything that turns a request into a response: controllers, the default
/// not-found handler, or a plain closure.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: Request) -> Result<Response>;
}

impl<F> Handler for F
where
    F: Fn(Request) -> Result<Response> + Send + Sync + 'static,
{
    fn call(&self, request: Request) -> Result<Response> {
        self(request)
    }
}

/// Built-in default handler: `404` with a plain-text body naming the path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn call(&self, request: Request) -> Result<Response> {
        Ok(Response::text(404, format!("Not Found: {}", request.path())))
    }
}

/// The router's default handler, attached to every dispatched request's
/// extensions so downstream handlers can substitute its response.
#[derive(Clone)]
pub struct Fallback(pub Arc<dyn Handler>);

impl Fallback {
    /// The fallback attached to `request`, or [`NotFound`] when the request
    /// did not come through a router.
    #[must_use]
    pub fn of(request: &Request) -> Self {
        request
            .extensions()
            .get::<Fallback>()
            .cloned()
            .unwrap_or_else(|| Fallback(Arc::new(NotFound)))
    }

    pub fn call(&self, request: Request) -> Result<Response> {
        self.0.call(request)
    }
}

struct Route {
    matcher: Box<dyn PathMatcher>,
    handler: Arc<dyn Handler>,
}

/// Ordered route table. The first route whose pattern matches wins.
///
/// Registration never fails and never checks for duplicate or overlapping
/// patterns; routes are never reordered. Matching is a linear scan over the
/// table.
pub struct Router {
    routes: Vec<Route>,
    default: Arc<dyn Handler>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Empty router whose default handler is [`NotFound`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            default: Arc::new(NotFound),
        }
    }

    /// Replace the default handler invoked when no route matches.
    #[must_use]
    pub fn with_default(mut self, handler: impl Handler) -> Self {
        self.default = Arc::new(handler);
        self
    }

    /// Append a route. String patterns are compiled as path templates
    /// (`/todos/:id`); a [`regex::Regex`] is used as-is.
    pub fn register(&mut self, pattern: impl IntoMatcher, handler: impl Handler) -> &mut Self {
        self.register_shared(pattern, Arc::new(handler))
    }

    /// Like [`Router::register`] for a handler shared between routes.
    pub fn register_shared(
        &mut self,
        pattern: impl IntoMatcher,
        handler: Arc<dyn Handler>,
    ) -> &mut Self {
        let matcher = pattern.into_matcher();
        debug!(
            route_index = self.routes.len(),
            pattern = %matcher.describe(),
            "Route registered"
        );
        self.routes.push(Route { matcher, handler });
        self
    }

    /// Registered patterns in priority order
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.routes.iter().map(|r| r.matcher.describe()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Log the routing table at info level
    pub fn log_routes(&self) {
        info!(
            routes_count = self.routes.len(),
            routes = ?self.routes(),
            "Routing table loaded"
        );
    }

    /// Route `request` to the first matching handler, or to the default
    /// handler when nothing matches, and return that handler's result.
    pub fn dispatch(&self, mut request: Request) -> Result<Response> {
        let span = info_span!(
            "request",
            request_id = %request.request_id(),
            method = %request.method(),
            path = %request.path()
        );
        let _entered = span.enter();

        debug!(routes_count = self.routes.len(), "Route match attempt");
        let match_start = Instant::now();

        request
            .extensions_mut()
            .insert(Fallback(Arc::clone(&self.default)));

        for (idx, route) in self.routes.iter().enumerate() {
            let Some(params) = route.matcher.match_path(request.path()) else {
                continue;
            };
            let match_duration = match_start.elapsed();
            if match_duration > Duration::from_millis(1) {
                warn!(
                    route_index = idx,
                    route_pattern = %route.matcher.describe(),
                    path_params = ?params,
                    duration_us = match_duration.as_micros(),
                    "Slow route matching detected"
                );
            } else {
                info!(
                    route_index = idx,
                    route_pattern = %route.matcher.describe(),
                    path_params = ?params,
                    duration_us = match_duration.as_micros(),
                    "Route matched"
                );
            }
            request.set_params(params);
            return route.handler.call(request);
        }

        warn!(
            duration_us = match_start.elapsed().as_micros(),
            "No route matched"
        );
        self.default.call(request)
    }

    /// Host entry point: raw method, request target, headers and a body
    /// reader in; the handler's response out.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidMethod`] for a malformed method, an application error
    /// if the body cannot be read, or whatever the matched handler returns.
    pub fn handle<I, K, V, R>(
        &self,
        method: &str,
        target: &str,
        headers: I,
        body: R,
    ) -> Result<Response>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
        R: Read,
    {
        let mut request = Request::new(method, target)?;
        for (name, value) in headers {
            request = request.with_header(name.as_ref(), value);
        }
        let request = request.read_body(body).map_err(|e| {
            Error::Application(anyhow::Error::new(e).context("failed to read request body"))
        })?;
        self.dispatch(request)
    }
}
