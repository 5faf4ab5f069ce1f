use std::sync::Arc;
use std::time::Duration;

use pathrouter::dispatcher::{DispatchOutcome, Dispatcher};
use pathrouter::router::RouteTable;
use pathrouter::runtime_config::RuntimeConfig;
use pathrouter::server::{Request, Response};
use pathrouter::Middleware;
use tracing::Level;

mod common;
use common::log_capture;
use common::recorder::Recorder;

fn dispatch(dispatcher: &Dispatcher, method: &str, path: &str) -> (DispatchOutcome, Request, Response) {
    let mut req = Request::new(method, path);
    let mut res = Response::new();
    let outcome = dispatcher.dispatch(method, path, &mut req, &mut res);
    (outcome, req, res)
}

#[test]
fn test_bindings_are_injected() {
    let rec = Recorder::new();
    let mut table = RouteTable::new();
    table.get("/a/:b", rec.handler("a")).unwrap();
    let dispatcher = Dispatcher::new(table);

    let (outcome, req, res) = dispatch(&dispatcher, "GET", "/a/hello");
    assert_eq!(outcome, DispatchOutcome::Handled);
    assert_eq!(req.value("b"), Some("hello"));
    assert_eq!(res.body_str(), "a");

    let (outcome, _, res) = dispatch(&dispatcher, "GET", "/a/hello/extra");
    assert_eq!(outcome, DispatchOutcome::NotFound);
    assert!(!res.is_finished());
    assert_eq!(rec.calls(), vec!["a"]);
}

#[test]
fn test_first_match_wins_over_specificity() {
    let rec = Recorder::new();
    let mut table = RouteTable::new();
    table
        .get("/a/:b", rec.handler("variable"))
        .unwrap()
        .get("/a/fixed", rec.handler("literal"))
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    let (_, req, res) = dispatch(&dispatcher, "GET", "/a/fixed");
    assert_eq!(res.body_str(), "variable");
    assert_eq!(req.value("b"), Some("fixed"));
    assert_eq!(rec.calls(), vec!["variable"]);
}

#[test]
fn test_default_only_when_nothing_matches() {
    let rec = Recorder::new();
    let mut table = RouteTable::new();
    table
        .post("/create", rec.handler("create"))
        .unwrap()
        .register_default("POST", rec.handler("fallback"), None)
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    let (_, _, res) = dispatch(&dispatcher, "POST", "/create");
    assert_eq!(res.body_str(), "create");

    let (outcome, req, res) = dispatch(&dispatcher, "POST", "/unknown/path");
    assert_eq!(outcome, DispatchOutcome::Handled);
    assert_eq!(res.body_str(), "fallback");
    assert!(req.values().is_empty());

    // defaults do not leak across methods
    let (outcome, _, _) = dispatch(&dispatcher, "GET", "/unknown/path");
    assert_eq!(outcome, DispatchOutcome::NotFound);

    assert_eq!(rec.calls(), vec!["create", "fallback"]);
}

#[test]
fn test_unknown_and_lowercase_methods_are_not_found() {
    let rec = Recorder::new();
    let mut table = RouteTable::new();
    table
        .register_for_all_methods("/", rec.handler("root"), None)
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    for method in ["TRACE", "CONNECT", "get", ""] {
        let (outcome, _, _) = dispatch(&dispatcher, method, "/");
        assert_eq!(outcome, DispatchOutcome::NotFound, "{method:?}");
    }
    let (outcome, _, _) = dispatch(&dispatcher, "PROPFIND", "/");
    assert_eq!(outcome, DispatchOutcome::Handled);
    assert_eq!(rec.calls(), vec!["root"]);
}

#[test]
fn test_middleware_runs_after_bindings_and_before_handler() {
    let rec = Recorder::new();
    let seen = Arc::new(parking_lot::Mutex::new(None));
    let seen_in_mw = Arc::clone(&seen);
    let calls = rec.clone();

    let mut table = RouteTable::new();
    table
        .get_with(
            "/users/:id",
            rec.handler("handler"),
            pathrouter::middleware::from_fn(move |req, res| {
                *seen_in_mw.lock() = req.value("id").map(str::to_string);
                calls.middleware("mw").invoke(req, res);
            }),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    let (outcome, _, _) = dispatch(&dispatcher, "GET", "/users/42");
    assert_eq!(outcome, DispatchOutcome::Handled);
    assert_eq!(seen.lock().as_deref(), Some("42"));
    assert_eq!(rec.calls(), vec!["mw", "handler"]);
}

#[test]
fn test_middleware_short_circuit_discards_handler_output() {
    let rec = Recorder::new();
    let mut table = RouteTable::new();
    table
        .delete_with(
            "/delete",
            rec.handler("handler"),
            pathrouter::middleware::from_fn(|_req, res| res.status(403).send("denied")),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(table);

    let (outcome, _, res) = dispatch(&dispatcher, "DELETE", "/delete");
    assert_eq!(outcome, DispatchOutcome::Handled);
    assert_eq!(res.status_code(), 403);
    assert_eq!(res.body_str(), "denied");
    // the handler is still invoked; its writes are ignored
    assert_eq!(rec.calls(), vec!["handler"]);
}

#[test]
fn test_handle_uses_request_method_and_path() {
    let rec = Recorder::new();
    let mut table = RouteTable::new();
    table.patch("/items/:id", rec.handler("patch")).unwrap();
    let dispatcher = Dispatcher::new(table);

    let mut req = Request::new("PATCH", "/items/9?dry_run=1");
    let mut res = Response::new();
    assert_eq!(dispatcher.handle(&mut req, &mut res), DispatchOutcome::Handled);
    assert_eq!(req.value("id"), Some("9"));
    assert_eq!(req.param("dry_run"), Some("1"));
}

#[test]
#[should_panic(expected = "handler exploded")]
fn test_handler_panics_propagate() {
    let mut table = RouteTable::new();
    table
        .get("/boom", |_req, _res| panic!("handler exploded"))
        .unwrap();
    let dispatcher = Dispatcher::new(table);
    let _ = dispatch(&dispatcher, "GET", "/boom");
}

#[test]
fn test_concurrent_dispatch_never_cross_contaminates() {
    let mut table = RouteTable::new();
    table
        .get("/users/:user/posts/:post", |req, res| {
            let user = req.value("user").unwrap_or_default().to_string();
            let post = req.value("post").unwrap_or_default().to_string();
            res.send(format!("{user}:{post}"));
        })
        .unwrap()
        .get("/tags/:tag", |req, res| {
            let tag = req.value("tag").unwrap_or_default().to_string();
            res.send(tag);
        })
        .unwrap();
    let dispatcher = Arc::new(Dispatcher::new(table));

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let dispatcher = Arc::clone(&dispatcher);
            scope.spawn(move || {
                for i in 0..500 {
                    let (path, expected, bound) = if (worker + i) % 2 == 0 {
                        let user = format!("u{worker}");
                        let post = format!("p{i}");
                        (
                            format!("/users/{user}/posts/{post}"),
                            format!("{user}:{post}"),
                            vec![("user", user), ("post", post)],
                        )
                    } else {
                        let tag = format!("t{worker}-{i}");
                        (format!("/tags/{tag}"), tag.clone(), vec![("tag", tag)])
                    };

                    let (outcome, req, res) = dispatch(&dispatcher, "GET", &path);
                    assert_eq!(outcome, DispatchOutcome::Handled);
                    assert_eq!(res.body_str(), expected);
                    assert_eq!(req.values().len(), bound.len());
                    for (name, value) in &bound {
                        assert_eq!(req.value(name), Some(value.as_str()));
                    }
                }
            });
        }
    });
}

#[test]
fn test_match_and_not_found_are_logged() {
    let (events, _guard) = log_capture::capture();

    let rec = Recorder::new();
    let mut table = RouteTable::new();
    table.get("/a/:b", rec.handler("a")).unwrap();
    let dispatcher = Dispatcher::new(table).with_config(RuntimeConfig {
        slow_match_threshold: Duration::from_secs(60),
    });

    let _ = dispatch(&dispatcher, "GET", "/a/x");
    let _ = dispatch(&dispatcher, "GET", "/nowhere/at/all");

    let matched = events.with_message("Route matched");
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].level, Level::INFO);
    assert_eq!(matched[0].field("route_pattern"), Some("/a/:b"));

    let missing = events.with_message("No route matched");
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].level, Level::WARN);
    assert_eq!(missing[0].field("path"), Some("/nowhere/at/all"));
}

#[test]
fn test_slow_match_is_warned() {
    let (events, _guard) = log_capture::capture();

    let rec = Recorder::new();
    let mut table = RouteTable::new();
    table.get("/a/:b", rec.handler("a")).unwrap();
    let dispatcher = Dispatcher::new(table).with_config(RuntimeConfig {
        slow_match_threshold: Duration::ZERO,
    });

    let (outcome, _, _) = dispatch(&dispatcher, "GET", "/a/x");
    assert_eq!(outcome, DispatchOutcome::Handled);

    let slow = events.with_message("Slow route matching detected");
    assert_eq!(slow.len(), 1);
    assert_eq!(slow[0].level, Level::WARN);
    assert!(events.with_message("Route matched").is_empty());
}
