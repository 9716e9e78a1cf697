//! To-do demo application for `tramline`.
//!
//! Two controllers over one in-memory store:
//!
//! | Route        | Verb   | Action                          |
//! |--------------|--------|---------------------------------|
//! | `/todos`     | GET    | index (JSON, or HTML on Accept) |
//! | `/todos`     | POST   | create, `201`                   |
//! | `/todos/:id` | GET    | show                            |
//! | `/todos/:id` | PUT    | replace merge                   |
//! | `/todos/:id` | PATCH  | partial merge                   |
//! | `/todos/:id` | DELETE | destroy, `204`, idempotent      |

pub mod controllers;
pub mod models;

use std::sync::Arc;
use tracing::info;
use tramline::config::ViewsConfig;
use tramline::{MiniJinjaRenderer, Result, Router, Store, Views};

pub use models::Todo;

/// Shared by every request.
#[derive(Default)]
pub struct AppState {
    pub todos: Store<Todo>,
}

impl AppState {
    /// State holding the fixture todos `1` and `2`.
    pub fn seeded() -> Result<Self> {
        let state = Self::default();
        state.seed()?;
        Ok(state)
    }

    pub fn seed(&self) -> Result<()> {
        for (id, title, completed) in [("1", "Buy milk", false), ("2", "Write report", true)] {
            let mut todo = Todo::with_id(id, title, completed)?;
            self.todos.save(&mut todo);
        }
        info!(count = self.todos.len(), "Fixtures seeded");
        Ok(())
    }
}

const TEMPLATES: [(&str, &str); 2] = [
    ("todos/index.html", include_str!("../templates/todos/index.html")),
    ("todos/show.html", include_str!("../templates/todos/show.html")),
];

/// Renderer with the bundled templates registered.
pub fn bundled_renderer() -> Result<MiniJinjaRenderer> {
    let mut renderer = MiniJinjaRenderer::new();
    for (name, source) in TEMPLATES {
        renderer.add_template(name, source)?;
    }
    Ok(renderer)
}

/// Views from configuration. Without a `templates_dir` the bundled
/// templates are used.
pub fn views(config: &ViewsConfig) -> anyhow::Result<Views> {
    if config.templates_dir.is_some() {
        return config.views();
    }
    Ok(Views::new(bundled_renderer()?, config.mime_types()))
}

pub fn build_router(state: Arc<AppState>, views: Views) -> Router {
    let mut router = Router::new();
    router
        .register("/todos", controllers::todos(Arc::clone(&state), views.clone()))
        .register("/todos/:id", controllers::todo(state, views));
    router.log_routes();
    router
}
