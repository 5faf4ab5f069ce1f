use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use pathrouter::dispatcher::Dispatcher;
use pathrouter::logging::{init_logging, LogConfig, LogFormat};
use pathrouter::middleware::{MetricsMiddleware, TracingMiddleware};
use pathrouter::runtime_config::RuntimeConfig;
use pathrouter::server::{status_reason, Request};
use pathrouter::{AppService, RouteTable};
use serde_json::json;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Json,
    Pretty,
}

/// Send one request through the demo task application and print the response
#[derive(Parser)]
#[command(name = "pathrouter", version)]
#[command(about = "Probe the pathrouter demo task application", long_about = None)]
struct Cli {
    /// Request method, e.g. GET
    method: String,

    /// Request URI, query string allowed
    uri: String,

    /// Request header as NAME:VALUE (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE")]
    headers: Vec<String>,

    /// Form body parameter as KEY=VALUE (repeatable)
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Log output format; defaults to PATHROUTER_LOG_FORMAT
    #[arg(long, value_enum)]
    log_format: Option<FormatArg>,

    /// Print the route table before dispatching
    #[arg(long, default_value_t = false)]
    routes: bool,
}

fn split_pair<'a>(raw: &'a str, sep: char, what: &str) -> Result<(&'a str, &'a str)> {
    match raw.split_once(sep) {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim(), v.trim())),
        _ => bail!("invalid {what} '{raw}', expected KEY{sep}VALUE"),
    }
}

/// The task list application: `GET /`, `GET /:task`, `POST /create`,
/// `DELETE /delete`, and a GET fallback for everything else.
fn build_task_app() -> Result<RouteTable> {
    let tasks: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let metrics = Arc::new(MetricsMiddleware::new());
    let mut table = RouteTable::new();

    let list = Arc::clone(&tasks);
    table.get("/", move |_req, res| {
        let tasks = list.lock().unwrap_or_else(PoisonError::into_inner);
        res.json(&json!({ "tasks": *tasks }));
    })?;

    table.get_with(
        "/:task",
        |req, res| {
            let task = req.value("task").unwrap_or_default().to_string();
            res.send(task);
        },
        Arc::new(TracingMiddleware),
    )?;

    let create = Arc::clone(&tasks);
    table.post_with(
        "/create",
        move |req, res| {
            if let Some(task) = req.param("task") {
                create
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(task.to_string());
            }
            res.json(&json!({ "message": "Create Task" }));
        },
        metrics,
    )?;

    let clear = Arc::clone(&tasks);
    table.delete("/delete", move |_req, res| {
        clear.lock().unwrap_or_else(PoisonError::into_inner).clear();
        res.json(&json!({ "message": "Delete all tasks" }));
    })?;

    table.register_default(
        "GET",
        |req, res| {
            let path = req.path().to_string();
            res.status(404).json(&json!({ "error": "no route", "path": path }));
        },
        None,
    )?;

    Ok(table)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if let Some(format) = cli.log_format {
        log_config.format = match format {
            FormatArg::Json => LogFormat::Json,
            FormatArg::Pretty => LogFormat::Pretty,
        };
    }
    init_logging(&log_config)?;

    let table = build_task_app().context("building task application routes")?;
    if cli.routes {
        table.dump_routes();
    }
    let app = AppService::new(Dispatcher::new(table).with_config(RuntimeConfig::from_env()));

    let mut headers = Vec::with_capacity(cli.headers.len());
    for raw in &cli.headers {
        headers.push(split_pair(raw, ':', "header")?);
    }
    let mut params = Vec::with_capacity(cli.params.len());
    for raw in &cli.params {
        params.push(split_pair(raw, '=', "param")?);
    }

    let res = app.handle_raw(&cli.method, &cli.uri, |req: Request| {
        let req = headers
            .iter()
            .fold(req, |req, (k, v)| req.with_header(k, *v));
        params
            .iter()
            .fold(req, |req, (k, v)| req.with_body_param(*k, *v))
    });

    println!(
        "HTTP/1.1 {} {}",
        res.status_code(),
        status_reason(res.status_code())
    );
    for (name, value) in res.headers() {
        println!("{name}: {value}");
    }
    println!();
    println!("{}", res.body_str());
    Ok(())
}
