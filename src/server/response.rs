use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

/// Canonical reason phrase for `status`, or `""` when it has none
#[must_use]
pub fn status_reason(status: u16) -> &'static str {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("")
}

/// Buffered response handed to middleware and handlers
///
/// Terminal writes ([`send`](Self::send), [`json`](Self::json),
/// [`redirect`](Self::redirect), [`send_status`](Self::send_status),
/// [`end`](Self::end)) finish the response. A finished response ignores every
/// later write, which is how a middleware short-circuits the handler that runs
/// after it.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    /// Insertion-ordered; names compared case-insensitively
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    finished: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
            finished: false,
        }
    }

    fn writable(&self, op: &'static str) -> bool {
        if self.finished {
            debug!(op, status = self.status, "Write to finished response ignored");
        }
        !self.finished
    }

    /// Set the status code
    pub fn status(&mut self, code: u16) -> &mut Self {
        if self.writable("status") {
            self.status = code;
        }
        self
    }

    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Add or replace a header
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        if self.writable("set_header") {
            self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            self.headers.push((name.to_string(), value.into()));
        }
        self
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn clear_headers(&mut self) -> &mut Self {
        if self.writable("clear_headers") {
            self.headers.clear();
        }
        self
    }

    pub fn set_content_type(&mut self, content_type: &str) -> &mut Self {
        self.set_header("Content-Type", content_type)
    }

    /// Write a text body and finish
    pub fn send(&mut self, data: impl AsRef<str>) {
        if self.writable("send") {
            self.body.extend_from_slice(data.as_ref().as_bytes());
            self.finished = true;
        }
    }

    /// Serialize `data` as the JSON body and finish
    ///
    /// A value that fails to serialize produces an empty body.
    pub fn json<T: Serialize + ?Sized>(&mut self, data: &T) {
        if !self.writable("json") {
            return;
        }
        self.set_content_type("application/json");
        match serde_json::to_vec(data) {
            Ok(bytes) => self.body.extend_from_slice(&bytes),
            Err(e) => debug!(error = %e, "JSON body serialization failed"),
        }
        self.finished = true;
    }

    /// Set the status and finish with an empty body
    pub fn send_status(&mut self, code: u16) {
        self.status(code);
        self.end();
    }

    /// Redirect to `url` with 301 when `permanent`, else 302, and finish
    pub fn redirect(&mut self, url: &str, permanent: bool) {
        if !self.writable("redirect") {
            return;
        }
        self.status = if permanent { 301 } else { 302 };
        self.set_header("Location", url);
        self.finished = true;
    }

    /// Send the file at `path` as an attachment named `name` and finish
    ///
    /// A file that cannot be read produces the text body
    /// `File <path> no found` with the status left unchanged.
    pub fn download(&mut self, path: impl AsRef<Path>, name: &str) {
        if !self.writable("download") {
            return;
        }
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => {
                self.set_content_type("application/octet-stream")
                    .set_header("Content-Transfer-Encoding", "Binary")
                    .set_header("Content-Disposition", format!("attachment; filename={name}"));
                self.body.extend_from_slice(&bytes);
                self.finished = true;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Download source unreadable");
                self.send(format!("File {} no found", path.display()));
            }
        }
    }

    /// Finish without writing anything further
    pub fn end(&mut self) {
        self.finished = true;
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8, lossily
    #[must_use]
    pub fn body_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
