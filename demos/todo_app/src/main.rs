use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use todo_app::{build_router, views, AppState};
use tracing::error;
use tramline::config::AppConfig;
use tramline::logging::{init_logging, LogConfig};
use tramline::Response;

#[derive(Parser)]
#[command(name = "todo_app")]
#[command(about = "Dispatch one request through the to-do demo", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "GET")]
    method: String,

    /// Request target, with an optional query string
    #[arg(short, long)]
    path: String,

    /// Request body (JSON for POST/PUT/PATCH)
    #[arg(short, long)]
    body: Option<String>,

    /// Extra request header as `name: value`, repeatable
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// YAML config; logging falls back to TRAMLINE_LOG_* without one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with an empty store
    #[arg(long, default_value_t = false)]
    no_seed: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, log) = match &cli.config {
        Some(path) => {
            let config = AppConfig::load(path)?;
            let log = config.log.clone();
            (config, log)
        }
        None => (AppConfig::default(), LogConfig::from_env()),
    };
    let _guard = init_logging(&log)?;

    let state = if cli.no_seed {
        AppState::default()
    } else {
        AppState::seeded()?
    };
    let router = build_router(Arc::new(state), views(&config.views)?);

    let headers = cli
        .headers
        .iter()
        .map(|h| {
            h.split_once(':')
                .map(|(name, value)| (name.trim(), value.trim().to_string()))
                .with_context(|| format!("header must be `name: value`, got {h:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let body = cli.body.unwrap_or_default();

    let response = router
        .handle(&cli.method, &cli.path, headers, body.as_bytes())
        .unwrap_or_else(|err| {
            error!(error = %err, "Unhandled error");
            Response::text(500, format!("Internal Server Error: {err}"))
        });
    print_response(&response);
    Ok(())
}

fn print_response(response: &Response) {
    println!("HTTP/1.1 {} {}", response.status, response.reason());
    for (name, value) in &response.headers {
        println!("{name}: {value}");
    }
    println!();
    println!("{}", response.body_string());
}
