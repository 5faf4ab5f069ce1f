use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use pathrouter::dispatcher::Dispatcher;
use pathrouter::router::{match_path, PathPattern, RouteTable};
use pathrouter::runtime_config::RuntimeConfig;
use pathrouter::server::{Request, Response};

const TEMPLATES: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET", "/zoo/animals"),
    ("POST", "/zoo/animals"),
    ("GET", "/zoo/animals/:id"),
    ("PUT", "/zoo/animals/:id"),
    ("PATCH", "/zoo/animals/:id"),
    ("DELETE", "/zoo/animals/:id"),
    ("GET", "/zoo/animals/:id/toys/:toy_id"),
    ("GET", "/zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id"),
    ("POST", "/inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id"),
    ("GET", "/complex/:a/:b/:c/:d/:e/:f/:g/:h/:i"),
    ("HEAD", "/zoo/health"),
    ("OPTIONS", "/zoo/health"),
];

const PATHS: &[(&str, &str)] = &[
    ("GET", "/zoo/animals/123"),
    ("GET", "/zoo/animals/123/toys/456"),
    ("GET", "/zoo/cats/animals/123/habitats/88/sections/5"),
    ("POST", "/inventory/1/feeds/2/items/3/batches/4"),
    ("GET", "/complex/1/2/3/4/5/6/7/8/9"),
];

fn build_table() -> RouteTable {
    let mut table = RouteTable::new();
    for (method, template) in TEMPLATES {
        table
            .register(method, template, |_req, res| res.end(), None)
            .unwrap_or_else(|e| panic!("bad bench route {template}: {e}"));
    }
    table
}

fn bench_match_path(c: &mut Criterion) {
    let pattern = PathPattern::compile("/zoo/:category/animals/:id/habitats/:habitat_id")
        .unwrap_or_else(|e| panic!("{e}"));
    c.bench_function("match_path", |b| {
        b.iter(|| black_box(match_path(&pattern, black_box("/zoo/cats/animals/1/habitats/2"))))
    });
}

fn bench_dispatch_throughput(c: &mut Criterion) {
    // keep every match on the info path
    let config = RuntimeConfig {
        slow_match_threshold: std::time::Duration::from_secs(1),
    };
    let dispatcher = Dispatcher::new(build_table()).with_config(config);
    c.bench_function("dispatch", |b| {
        b.iter(|| {
            for (method, path) in PATHS {
                let mut req = Request::new(*method, *path);
                let mut res = Response::new();
                black_box(dispatcher.dispatch(method, path, &mut req, &mut res));
            }
        })
    });
}

criterion_group!(benches, bench_match_path, bench_dispatch_throughput);
criterion_main!(benches);
