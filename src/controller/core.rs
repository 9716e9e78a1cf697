use crate::error::{Error, Result};
use crate::request::{HeaderVec, Request};
use crate::response::{Body, Response};
use crate::router::{Fallback, Handler};
use crate::views::Views;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use super::args::Args;
use super::verb::Verb;

/// Action registered for one verb of a controller.
pub type Action<S> = Arc<dyn Fn(&mut Controller<S>, Args) -> Result<()> + Send + Sync>;

/// Per-request controller instance.
///
/// Created fresh for every request with status `200`, no headers and an
/// empty body. Actions mutate it; once the action returns, the dispatcher
/// reads it back out as a [`Response`] and the instance is dropped.
pub struct Controller<S> {
    request: Request,
    state: Arc<S>,
    views: Views,
    status: u16,
    headers: HeaderVec,
    body: Body,
    assigns: Map<String, Value>,
}

impl<S> Controller<S> {
    fn new(request: Request, state: Arc<S>, views: Views) -> Self {
        Self {
            request,
            state,
            views,
            status: 200,
            headers: HeaderVec::new(),
            body: Body::Empty,
            assigns: Map::new(),
        }
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Application state shared by every request (stores live here).
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a response header
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }

    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = body.into();
    }

    /// Record a value in the instance state handed to templates by default.
    pub fn assign(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.assigns.insert(key.to_string(), value);
        Ok(())
    }

    #[must_use]
    pub fn assigns(&self) -> &Map<String, Value> {
        &self.assigns
    }

    /// Render `template` into the body and set `content-type` for `kind`.
    ///
    /// Without an explicit `payload` the template sees every assigned value.
    pub fn render(&mut self, template: &str, kind: &str, payload: Option<Value>) -> Result<()> {
        let data = payload.unwrap_or_else(|| Value::Object(self.assigns.clone()));
        let rendered = self.views.renderer().render(template, &data)?;
        let content_type = self.views.mime().resolve(kind).to_string();
        debug!(template, content_type = %content_type, "Template rendered");
        self.body = Body::from(rendered);
        self.set_header("content-type", content_type);
        Ok(())
    }

    /// Serialize `value` as the JSON body.
    pub fn render_json(&mut self, value: &impl Serialize) -> Result<()> {
        let body = serde_json::to_string(value)?;
        let content_type = self.views.mime().resolve("json").to_string();
        self.body = Body::from(body);
        self.set_header("content-type", content_type);
        Ok(())
    }

    /// `302 Found` pointing at `location`, with an empty body.
    pub fn redirect_to(&mut self, location: &str) {
        self.status = 302;
        self.set_header("location", location);
        self.body = Body::Empty;
    }

    /// Status only, empty body (e.g. `204 No Content`).
    pub fn head(&mut self, status: u16) {
        self.status = status;
        self.body = Body::Empty;
    }

    fn into_response(self) -> Response {
        Response::new(self.status, self.headers, self.body)
    }
}

/// A controller type as a router [`Handler`]: a name, shared state, and one
/// action per verb registered up front.
///
/// On each call it builds a [`Controller`], picks the action for the request
/// verb, binds the route captures as [`Args`] and assembles the response. A
/// [`Error::RecordNotFound`] from the action is answered by a fresh call to
/// the router's default handler, which replaces the whole response. Any
/// other error, including a verb with no action, propagates.
pub struct ControllerHandler<S> {
    name: &'static str,
    state: Arc<S>,
    views: Views,
    actions: HashMap<Verb, Action<S>>,
}

impl<S> fmt::Debug for ControllerHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut verbs: Vec<&str> = self.actions.keys().map(|v| v.as_str()).collect();
        verbs.sort_unstable();
        f.debug_struct("ControllerHandler")
            .field("name", &self.name)
            .field("verbs", &verbs)
            .finish()
    }
}

impl<S: Send + Sync + 'static> ControllerHandler<S> {
    #[must_use]
    pub fn new(name: &'static str, state: Arc<S>) -> Self {
        Self {
            name,
            state,
            views: Views::default(),
            actions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_views(mut self, views: Views) -> Self {
        self.views = views;
        self
    }

    /// Register the action for `verb`, replacing any earlier one.
    #[must_use]
    pub fn on<F>(mut self, verb: Verb, action: F) -> Self
    where
        F: Fn(&mut Controller<S>, Args) -> Result<()> + Send + Sync + 'static,
    {
        self.actions.insert(verb, Arc::new(action));
        self
    }

    #[must_use]
    pub fn get<F>(self, action: F) -> Self
    where
        F: Fn(&mut Controller<S>, Args) -> Result<()> + Send + Sync + 'static,
    {
        self.on(Verb::Get, action)
    }

    #[must_use]
    pub fn post<F>(self, action: F) -> Self
    where
        F: Fn(&mut Controller<S>, Args) -> Result<()> + Send + Sync + 'static,
    {
        self.on(Verb::Post, action)
    }

    #[must_use]
    pub fn put<F>(self, action: F) -> Self
    where
        F: Fn(&mut Controller<S>, Args) -> Result<()> + Send + Sync + 'static,
    {
        self.on(Verb::Put, action)
    }

    #[must_use]
    pub fn patch<F>(self, action: F) -> Self
    where
        F: Fn(&mut Controller<S>, Args) -> Result<()> + Send + Sync + 'static,
    {
        self.on(Verb::Patch, action)
    }

    #[must_use]
    pub fn delete<F>(self, action: F) -> Self
    where
        F: Fn(&mut Controller<S>, Args) -> Result<()> + Send + Sync + 'static,
    {
        self.on(Verb::Delete, action)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn handles(&self, verb: Verb) -> bool {
        self.actions.contains_key(&verb)
    }
}

impl<S: Send + Sync + 'static> Handler for ControllerHandler<S> {
    fn call(&self, request: Request) -> Result<Response> {
        let action = Verb::from_method(request.method())
            .and_then(|verb| self.actions.get(&verb))
            .ok_or_else(|| {
                error!(
                    controller = self.name,
                    verb = %request.method(),
                    "Controller has no action for verb"
                );
                Error::UnhandledVerb {
                    controller: self.name,
                    verb: request.method().to_string(),
                }
            })?;

        let args = Args::from(request.params().clone());
        info!(
            controller = self.name,
            verb = %request.method(),
            args = ?args,
            "Controller action start"
        );

        let start = Instant::now();
        let mut controller = Controller::new(request, Arc::clone(&self.state), self.views.clone());

        match action(&mut controller, args) {
            Ok(()) => {
                let response = controller.into_response();
                info!(
                    controller = self.name,
                    status = response.status,
                    execution_time_us = start.elapsed().as_micros(),
                    "Controller action complete"
                );
                Ok(response)
            }
            Err(err) if err.is_record_not_found() => {
                info!(
                    controller = self.name,
                    error = %err,
                    "Record not found - substituting default response"
                );
                let request = controller.request;
                Fallback::of(&request).call(request)
            }
            Err(err) => Err(err),
        }
    }
}
