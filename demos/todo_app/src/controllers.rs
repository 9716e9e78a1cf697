use serde_json::{json, Map, Value};
use std::sync::Arc;
use tramline::{Controller, ControllerHandler, Record, Result, Views};

use crate::models::Todo;
use crate::AppState;

/// The request asked for HTML rather than JSON.
fn wants_html(c: &Controller<AppState>) -> bool {
    c.request()
        .header("accept")
        .is_some_and(|accept| accept.contains("text/html"))
}

/// JSON body with the server-managed timestamps removed.
fn client_payload(c: &Controller<AppState>) -> Result<Map<String, Value>> {
    let mut payload = c.request().json_object()?;
    for stamp in Todo::TIMESTAMPS {
        payload.remove(stamp);
    }
    Ok(payload)
}

fn unprocessable(c: &mut Controller<AppState>, message: &str) -> Result<()> {
    c.set_status(422);
    c.render_json(&json!({ "error": message }))
}

/// `/todos`: index and create.
pub fn todos(state: Arc<AppState>, views: Views) -> ControllerHandler<AppState> {
    ControllerHandler::new("todos", state)
        .with_views(views)
        .get(|c, _args| {
            let mut todos = c.state().todos.all();
            if let Some(filter) = c.request().query_param("completed") {
                let wanted = filter == "true";
                todos.retain(|t| t.completed() == wanted);
            }
            todos.sort_by(|a, b| (a.created_at(), a.id()).cmp(&(b.created_at(), b.id())));
            let items: Vec<Value> = todos.iter().map(|t| t.to_json()).collect();

            if wants_html(c) {
                c.assign("todos", &items)?;
                return c.render("todos/index.html", "html", None);
            }
            c.render_json(&items)
        })
        .post(|c, _args| {
            let payload = client_payload(c)?;
            let mut todo = Todo::build();
            todo.merge(&payload, false)?;
            if todo.title().map_or(true, |t| t.trim().is_empty()) {
                return unprocessable(c, "title is required");
            }
            if todo.get("completed")?.is_null() {
                todo.set("completed", false)?;
            }
            let id = c.state().todos.save(&mut todo);
            c.set_status(201);
            c.set_header("location", format!("/todos/{id}"));
            c.render_json(&todo.to_json())
        })
}

/// `/todos/:id`: show, replace, update and destroy.
pub fn todo(state: Arc<AppState>, views: Views) -> ControllerHandler<AppState> {
    ControllerHandler::new("todo", state)
        .with_views(views)
        .get(|c, args| {
            let todo = c.state().todos.find(args.require("id")?)?;
            if wants_html(c) {
                return c.render("todos/show.html", "html", Some(todo.to_json()));
            }
            c.render_json(&todo.to_json())
        })
        .put(|c, args| update(c, args.require("id")?, true))
        .patch(|c, args| update(c, args.require("id")?, false))
        .delete(|c, args| {
            if let Some(todo) = c.state().todos.safe_find(args.require("id")?) {
                c.state().todos.delete(&todo);
            }
            c.head(204);
            Ok(())
        })
}

fn update(c: &mut Controller<AppState>, id: &str, replace: bool) -> Result<()> {
    let mut todo = c.state().todos.find(id)?;
    let payload = client_payload(c)?;
    todo.merge(&payload, replace)?;
    if todo.title().map_or(true, |t| t.trim().is_empty()) {
        return unprocessable(c, "title must not be empty");
    }
    c.state().todos.save(&mut todo);
    c.render_json(&todo.to_json())
}
