mod common;

use common::{bundled_views, json_body, TestApp};
use serde_json::json;
use std::sync::Arc;
use tramline::{Error, Request, Response, Result, Router};

#[test]
fn test_delete_existing_todo_is_204_empty() {
    let app = TestApp::seeded();
    let res = app.send("DELETE", "/todos/1").unwrap();
    assert_eq!(res.status, 204);
    assert!(res.headers.is_empty());
    assert!(res.body.is_empty());
    assert!(app.state.todos.safe_find("1").is_none());
    assert!(app.state.todos.safe_find("2").is_some());
}

#[test]
fn test_delete_is_idempotent() {
    let app = TestApp::seeded();
    assert_eq!(app.send("DELETE", "/todos/1").unwrap().status, 204);
    let again = app.send("DELETE", "/todos/1").unwrap();
    assert_eq!(again.status, 204);
    assert!(again.body.is_empty());
    assert_eq!(app.send("DELETE", "/todos/never").unwrap().status, 204);
}

#[test]
fn test_unregistered_path_gets_not_found() {
    let app = TestApp::seeded();
    let res = app.send("GET", "/nothing/here").unwrap();
    assert_eq!(res.status, 404);
    assert_eq!(res.get_header("content-type"), Some("text/plain"));
    assert_eq!(res.body_string(), "Not Found: /nothing/here");
}

#[test]
fn test_show_missing_todo_is_not_found() {
    let app = TestApp::seeded();
    let res = app.send("GET", "/todos/404-me").unwrap();
    assert_eq!(res.status, 404);
    assert_eq!(res.body_string(), "Not Found: /todos/404-me");

    let res = app
        .send_json("PATCH", "/todos/404-me", r#"{"title":"x"}"#)
        .unwrap();
    assert_eq!(res.status, 404);
}

#[test]
fn test_unhandled_verb_is_error() {
    let app = TestApp::seeded();
    let err = app.send("DELETE", "/todos").unwrap_err();
    assert!(matches!(
        err,
        Error::UnhandledVerb { controller: "todos", ref verb } if verb == "DELETE"
    ));
    assert!(matches!(
        app.send("OPTIONS", "/todos/1"),
        Err(Error::UnhandledVerb {
            controller: "todo",
            ..
        })
    ));
}

#[test]
fn test_show_returns_json() {
    let app = TestApp::seeded();
    let res = app.send("GET", "/todos/2").unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.get_header("content-type"), Some("application/json"));
    let body = json_body(&res);
    assert_eq!(body["id"], "2");
    assert_eq!(body["title"], "Write report");
    assert_eq!(body["completed"], true);
    assert!(body["created_at"].is_i64());
}

#[test]
fn test_show_renders_html_on_accept() {
    let app = TestApp::seeded();
    let req = Request::new("GET", "/todos/1")
        .unwrap()
        .with_header("Accept", "text/html");
    let res = app.router.dispatch(req).unwrap();
    assert_eq!(res.get_header("content-type"), Some("text/html"));
    let body = res.body_string();
    assert!(body.contains("<h1>Buy milk</h1>"));
    assert!(body.contains("Open"));
}

#[test]
fn test_index_lists_and_filters() {
    let app = TestApp::seeded();
    let all = json_body(&app.send("GET", "/todos").unwrap());
    let mut ids: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["1", "2"]);

    let done = json_body(&app.send("GET", "/todos?completed=true").unwrap());
    assert_eq!(done.as_array().unwrap().len(), 1);
    assert_eq!(done[0]["id"], "2");
}

#[test]
fn test_index_html_escapes_titles() {
    let app = TestApp::empty();
    app.send_json("POST", "/todos", r#"{"title":"<b>bold</b>"}"#)
        .unwrap();
    let req = Request::new("GET", "/todos")
        .unwrap()
        .with_header("accept", "text/html,application/xhtml+xml");
    let body = app.router.dispatch(req).unwrap().body_string();
    assert!(body.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(!body.contains("<b>bold</b>"));
}

#[test]
fn test_index_html_empty() {
    let app = TestApp::empty();
    let req = Request::new("GET", "/todos")
        .unwrap()
        .with_header("accept", "text/html");
    let body = app.router.dispatch(req).unwrap().body_string();
    assert!(body.contains("Nothing to do"));
}

#[test]
fn test_create_assigns_identity() {
    let app = TestApp::empty();
    let res = app
        .send_json("POST", "/todos", r#"{"title":"Walk dog"}"#)
        .unwrap();
    assert_eq!(res.status, 201);
    let body = json_body(&res);
    let id = body["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(body["completed"], false);
    let location = format!("/todos/{id}");
    assert_eq!(res.get_header("location"), Some(location.as_str()));

    let stored = app.state.todos.find(&id).unwrap();
    assert_eq!(stored.title(), Some("Walk dog"));
    assert_eq!(app.state.todos.len(), 1);
}

#[test]
fn test_create_requires_title() {
    let app = TestApp::empty();
    let res = app
        .send_json("POST", "/todos", r#"{"completed":true}"#)
        .unwrap();
    assert_eq!(res.status, 422);
    assert_eq!(json_body(&res), json!({"error": "title is required"}));
    assert!(app.state.todos.is_empty());
}

#[test]
fn test_create_ignores_undeclared_keys() {
    let app = TestApp::empty();
    let res = app
        .send_json("POST", "/todos", r#"{"title":"x","priority":1,"id":"forged"}"#)
        .unwrap();
    assert_eq!(res.status, 201);
    let body = json_body(&res);
    assert!(body.get("priority").is_none());
    assert_ne!(body["id"], "forged");
    assert!(app.state.todos.safe_find("forged").is_none());
}

#[test]
fn test_client_cannot_set_timestamps() {
    let app = TestApp::seeded();
    let res = app
        .send_json(
            "POST",
            "/todos",
            r#"{"title":"x","created_at":1,"updated_at":2}"#,
        )
        .unwrap();
    assert_eq!(res.status, 201);
    let body = json_body(&res);
    assert!(body["created_at"].as_i64().unwrap() > 2);
    assert!(body["updated_at"].as_i64().unwrap() > 2);

    let original = app.state.todos.find("1").unwrap().created_at();
    let res = app
        .send_json("PATCH", "/todos/1", r#"{"created_at":5}"#)
        .unwrap();
    assert_eq!(json_body(&res)["created_at"].as_i64(), original);
    assert_eq!(app.state.todos.find("1").unwrap().created_at(), original);
}

#[test]
fn test_create_rejects_malformed_json() {
    let app = TestApp::empty();
    assert!(matches!(
        app.send_json("POST", "/todos", "{"),
        Err(Error::MalformedBody(_))
    ));
    assert!(matches!(
        app.send_json("POST", "/todos", "[1,2]"),
        Err(Error::MalformedBody(_))
    ));
}

#[test]
fn test_patch_merges_partially() {
    let app = TestApp::seeded();
    let res = app
        .send_json("PATCH", "/todos/1", r#"{"completed":true}"#)
        .unwrap();
    assert_eq!(res.status, 200);
    let body = json_body(&res);
    assert_eq!(body["title"], "Buy milk");
    assert_eq!(body["completed"], true);
    assert!(app.state.todos.find("1").unwrap().completed());
}

#[test]
fn test_put_replaces_present_attributes() {
    let app = TestApp::seeded();
    let res = app
        .send_json(
            "PUT",
            "/todos/2",
            r#"{"title":"Rewrite report","completed":false}"#,
        )
        .unwrap();
    let body = json_body(&res);
    assert_eq!(body["title"], "Rewrite report");
    assert_eq!(body["completed"], false);

    let stored = app.state.todos.find("2").unwrap();
    assert_eq!(stored.title(), Some("Rewrite report"));
    assert!(stored.updated_at() >= stored.created_at());
}

#[test]
fn test_update_type_error_leaves_store_untouched() {
    let app = TestApp::seeded();
    let err = app
        .send_json("PATCH", "/todos/1", r#"{"title":"New","completed":"yes"}"#)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::AttributeType {
            attribute: "completed",
            ..
        }
    ));
    assert_eq!(app.state.todos.find("1").unwrap().title(), Some("Buy milk"));
}

#[test]
fn test_handle_entry_point_with_reader_body() {
    let app = TestApp::empty();
    let res = app
        .router
        .handle(
            "post",
            "/todos",
            [("Content-Type", "application/json")],
            &br#"{"title":"From reader"}"#[..],
        )
        .unwrap();
    assert_eq!(res.status, 201);
    assert_eq!(res.reason(), "Created");
}

#[test]
fn test_custom_default_handler_backs_controllers() {
    let app = TestApp::seeded();
    let views = bundled_views();
    let mut router = Router::new().with_default(|req: Request| -> Result<Response> {
        Ok(Response::text(410, format!("gone: {}", req.path())))
    });
    router
        .register(
            "/todos",
            todo_app::controllers::todos(Arc::clone(&app.state), views.clone()),
        )
        .register(
            "/todos/:id",
            todo_app::controllers::todo(Arc::clone(&app.state), views),
        );

    let res = router
        .dispatch(Request::new("GET", "/todos/zzz").unwrap())
        .unwrap();
    assert_eq!(res.status, 410);
    assert_eq!(res.body_string(), "gone: /todos/zzz");
    assert_eq!(router.routes(), vec!["/todos", "/todos/:id"]);
}
