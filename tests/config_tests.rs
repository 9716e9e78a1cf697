use std::fs;
use tramline::config::AppConfig;
use tramline::logging::LogFormat;
use tramline::Request;

const CONFIG: &str = r"
log:
  log_level: warn
  format: pretty
views:
  templates_dir: views
  mime_types:
    html: text/html; charset=utf-8
";

#[test]
fn test_config_drives_demo_views() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("views/todos")).unwrap();
    fs::write(
        dir.path().join("views/todos/show.html"),
        "<em>{{ title }}</em>",
    )
    .unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, CONFIG).unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.log.log_level, "warn");
    assert_eq!(config.log.format, LogFormat::Pretty);

    let state = std::sync::Arc::new(todo_app::AppState::seeded().unwrap());
    let views = todo_app::views(&config.views).unwrap();
    let router = todo_app::build_router(state, views);

    let req = Request::new("GET", "/todos/1")
        .unwrap()
        .with_header("accept", "text/html");
    let res = router.dispatch(req).unwrap();
    assert_eq!(res.get_header("content-type"), Some("text/html; charset=utf-8"));
    assert_eq!(res.body_string(), "<em>Buy milk</em>");
}

#[test]
fn test_missing_templates_dir_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "views:\n  templates_dir: nowhere\n").unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert!(todo_app::views(&config.views).is_err());
}

#[test]
fn test_bundled_views_without_templates_dir() {
    let config =
        AppConfig::from_yaml_str("views:\n  mime_types:\n    atom: application/atom+xml\n")
            .unwrap();
    let views = todo_app::views(&config.views).unwrap();
    assert_eq!(views.mime().resolve("atom"), "application/atom+xml");
    assert_eq!(views.mime().resolve("html"), "text/html");
}
