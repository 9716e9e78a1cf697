#![allow(dead_code)]

use std::sync::Arc;
use todo_app::{build_router, bundled_renderer, AppState};
use tramline::{MimeTypes, Request, Response, Result, Router, Views};

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
}

impl TestApp {
    /// Router over the fixture todos `1` and `2`.
    pub fn seeded() -> Self {
        Self::with_state(AppState::seeded().unwrap())
    }

    pub fn empty() -> Self {
        Self::with_state(AppState::default())
    }

    fn with_state(state: AppState) -> Self {
        let state = Arc::new(state);
        let router = build_router(Arc::clone(&state), bundled_views());
        Self { state, router }
    }

    pub fn send(&self, method: &str, target: &str) -> Result<Response> {
        self.router.dispatch(Request::new(method, target)?)
    }

    pub fn send_json(&self, method: &str, target: &str, body: &str) -> Result<Response> {
        let req = Request::new(method, target)?
            .with_header("content-type", "application/json")
            .with_body(body.to_string());
        self.router.dispatch(req)
    }
}

pub fn bundled_views() -> Views {
    Views::new(bundled_renderer().unwrap(), MimeTypes::default())
}

pub fn json_body(response: &Response) -> serde_json::Value {
    serde_json::from_str(&response.body_string()).unwrap()
}
