#![allow(dead_code)]

pub mod recorder {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use pathrouter::router::MiddlewareRef;
    use pathrouter::server::{Request, Response};

    /// Records which middleware and handlers ran, in order
    #[derive(Clone, Default)]
    pub struct Recorder {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        pub fn new() -> Self {
            Self::default()
        }

        /// A handler that records `tag` and echoes it into the response body
        pub fn handler(
            &self,
            tag: &'static str,
        ) -> impl Fn(&mut Request, &mut Response) + Send + Sync + 'static {
            let calls = Arc::clone(&self.calls);
            move |_req, res| {
                calls.lock().push(tag.to_string());
                res.send(tag);
            }
        }

        /// A middleware that only records `tag`
        pub fn middleware(&self, tag: &'static str) -> MiddlewareRef {
            let calls = Arc::clone(&self.calls);
            pathrouter::middleware::from_fn(move |_req, _res| {
                calls.lock().push(tag.to_string());
            })
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }
}

pub mod log_capture {
    use std::fmt;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tracing::field::{Field, Visit};
    use tracing::subscriber::DefaultGuard;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    #[derive(Debug, Clone)]
    pub struct CapturedEvent {
        pub level: Level,
        pub message: String,
        pub fields: Vec<(String, String)>,
    }

    impl CapturedEvent {
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        }
    }

    #[derive(Clone, Default)]
    pub struct CapturedEvents {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    impl CapturedEvents {
        pub fn events(&self) -> Vec<CapturedEvent> {
            self.events.lock().clone()
        }

        pub fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
            self.events()
                .into_iter()
                .filter(|e| e.message == message)
                .collect()
        }
    }

    struct EventVisitor<'a>(&'a mut CapturedEvent);

    impl Visit for EventVisitor<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "message" {
                self.0.message = value.to_string();
            } else {
                self.0
                    .fields
                    .push((field.name().to_string(), value.to_string()));
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.record_str(field, &format!("{value:?}"));
        }
    }

    impl<S: Subscriber> Layer<S> for CapturedEvents {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut captured = CapturedEvent {
                level: *event.metadata().level(),
                message: String::new(),
                fields: Vec::new(),
            };
            event.record(&mut EventVisitor(&mut captured));
            self.events.lock().push(captured);
        }
    }

    /// Capture every event emitted on the current thread until the guard drops
    pub fn capture() -> (CapturedEvents, DefaultGuard) {
        let events = CapturedEvents::default();
        let subscriber = Registry::default().with(events.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (events, guard)
    }
}
