use std::collections::HashMap;

use crate::ids::{RequestId, REQUEST_ID_HEADER};

/// A `Set-Cookie` instruction recorded by [`Request::set_cookie`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieDirective {
    pub name: String,
    pub value: String,
    pub path: String,
    /// Lifetime in seconds; `0` expires the cookie immediately
    pub max_age: i64,
}

/// Default cookie lifetime: seven days
pub const DEFAULT_COOKIE_MAX_AGE: i64 = 7 * 24 * 60 * 60;

/// Request passed to middleware and handlers
///
/// Everything a request knows arrives through the constructor and the
/// `with_*` builders; nothing is read from process state. The dispatcher only
/// uses [`method`](Self::method), [`path`](Self::path) and the value store
/// ([`set_value`](Self::set_value) / [`value`](Self::value)).
#[derive(Debug, Clone)]
pub struct Request {
    request_id: RequestId,
    method: String,
    original_url: String,
    path: String,
    host: Option<String>,
    remote_addr: Option<String>,
    /// Path bindings written by the dispatcher
    values: HashMap<String, String>,
    /// Query and form body params; body params win on conflict
    params: HashMap<String, String>,
    body: HashMap<String, String>,
    /// Header names are stored lowercase
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
    outgoing_cookies: Vec<CookieDirective>,
}

impl Request {
    /// Create a request for `method` and the raw request URL
    ///
    /// The path is the URL up to the first `?`; the remainder is parsed as
    /// query params.
    ///
    /// ```
    /// use pathrouter::server::Request;
    ///
    /// let req = Request::new("GET", "/tasks/7?verbose=1");
    /// assert_eq!(req.path(), "/tasks/7");
    /// assert_eq!(req.param("verbose"), Some("1"));
    /// ```
    #[must_use]
    pub fn new(method: impl Into<String>, original_url: impl Into<String>) -> Self {
        let original_url = original_url.into();
        let (path, query) = match original_url.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query)),
            None => (original_url.clone(), None),
        };
        let params = query.map(parse_query_params).unwrap_or_default();

        Self {
            request_id: RequestId::new(),
            method: method.into(),
            path,
            original_url,
            host: None,
            remote_addr: None,
            values: HashMap::new(),
            params,
            body: HashMap::new(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            outgoing_cookies: Vec::new(),
        }
    }

    /// Add a header
    ///
    /// A `Cookie` header is also parsed into the cookie jar. An
    /// `X-Request-Id` header holding a valid ULID becomes the request's id.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if name.eq_ignore_ascii_case("cookie") {
            self.cookies.extend(parse_cookies(&value));
        } else if name.eq_ignore_ascii_case(REQUEST_ID_HEADER) {
            self.request_id = RequestId::from_header_or_new(Some(&value));
        }
        self.set_header(name, value);
        self
    }

    #[must_use]
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Add a form body param; it is also visible through [`param`](Self::param)
    #[must_use]
    pub fn with_body_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        self.params.insert(name.clone(), value.clone());
        self.body.insert(name, value);
        self
    }

    /// Add every pair of an `application/x-www-form-urlencoded` body
    #[must_use]
    pub fn with_form_body(mut self, body: &str) -> Self {
        for (k, v) in parse_query_params(body) {
            self = self.with_body_param(k, v);
        }
        self
    }

    #[must_use]
    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path without the query string
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The URL as received, query string included
    #[must_use]
    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    /// Directory part of the path: `/a/b/c` → `/a/b`, `/a` → `/`
    #[must_use]
    pub fn base_url(&self) -> &str {
        match self.path.rfind('/') {
            Some(0) | None => "/",
            Some(i) => &self.path[..i],
        }
    }

    /// `Host` header, falling back to the host given to [`with_host`](Self::with_host)
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.header("host").or(self.host.as_deref())
    }

    // --- path values -------------------------------------------------------

    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn values(&self) -> &HashMap<String, String> {
        &self.values
    }

    // --- params ------------------------------------------------------------

    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Form body params only
    #[must_use]
    pub fn body(&self) -> &HashMap<String, String> {
        &self.body
    }

    // --- headers -----------------------------------------------------------

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    #[must_use]
    pub fn is_xhr(&self) -> bool {
        self.header("x-requested-with")
            .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
    }

    /// Client address: `Client-IP`, else the first `X-Forwarded-For` hop,
    /// else the transport's remote address
    #[must_use]
    pub fn client_ip(&self) -> Option<&str> {
        if let Some(ip) = self.header("client-ip").filter(|v| !v.is_empty()) {
            return Some(ip);
        }
        if let Some(fwd) = self.header("x-forwarded-for").filter(|v| !v.is_empty()) {
            return fwd.split(',').next().map(str::trim);
        }
        self.remote_addr.as_deref()
    }

    // --- cookies -----------------------------------------------------------

    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    /// Record a cookie to be sent back to the client
    ///
    /// `max_age` defaults to [`DEFAULT_COOKIE_MAX_AGE`].
    pub fn set_cookie(&mut self, name: &str, value: &str, path: &str, max_age: Option<i64>) {
        self.cookies.insert(name.to_string(), value.to_string());
        self.outgoing_cookies.push(CookieDirective {
            name: name.to_string(),
            value: value.to_string(),
            path: path.to_string(),
            max_age: max_age.unwrap_or(DEFAULT_COOKIE_MAX_AGE),
        });
    }

    /// Expire every cookie the request arrived with
    pub fn clear_cookies(&mut self) {
        let mut names: Vec<String> = self.cookies.keys().cloned().collect();
        names.sort();
        for name in names {
            self.set_cookie(&name, "", "/", Some(0));
        }
        self.cookies.clear();
    }

    #[must_use]
    pub fn outgoing_cookies(&self) -> &[CookieDirective] {
        &self.outgoing_cookies
    }
}

/// Parse a `Cookie` header value into name/value pairs
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            let value = parts.next().unwrap_or("").trim().to_string();
            Some((name.to_string(), value))
        })
        .collect()
}

/// Parse a query string (without the leading `?`)
pub fn parse_query_params(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_split_from_path() {
        let req = Request::new("GET", "/search?q=rust+router&page=2");
        assert_eq!(req.path(), "/search");
        assert_eq!(req.original_url(), "/search?q=rust+router&page=2");
        assert_eq!(req.param("q"), Some("rust router"));
        assert_eq!(req.param("page"), Some("2"));
    }

    #[test]
    fn test_body_params_override_query() {
        let req = Request::new("POST", "/create?task=query")
            .with_form_body("task=body&extra=1");
        assert_eq!(req.param("task"), Some("body"));
        assert_eq!(req.body().get("extra").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let req = Request::new("GET", "/")
            .with_header("Content-Type", "application/json")
            .with_header("X-Requested-With", "XMLHttpRequest");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.content_type(), Some("application/json"));
        assert!(req.is_xhr());
    }

    #[test]
    fn test_request_id_header_is_adopted() {
        let req = Request::new("GET", "/").with_header("x-request-id", "01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert_eq!(req.request_id().to_string(), "01ARZ3NDEKTSV4RRFFQ69G5FAV");

        let req = Request::new("GET", "/").with_header("X-Request-Id", "garbage");
        assert_ne!(req.request_id().to_string(), "garbage");
    }

    #[test]
    fn test_cookie_header_is_parsed() {
        let req = Request::new("GET", "/").with_header("Cookie", "sid=abc; theme=dark");
        assert_eq!(req.cookie("sid"), Some("abc"));
        assert_eq!(req.cookie("theme"), Some("dark"));
    }

    #[test]
    fn test_clear_cookies_expires_each() {
        let mut req = Request::new("GET", "/")
            .with_cookie("a", "1")
            .with_cookie("b", "2");
        req.clear_cookies();
        assert!(req.cookies().is_empty());
        let expired: Vec<_> = req
            .outgoing_cookies()
            .iter()
            .map(|c| (c.name.as_str(), c.max_age))
            .collect();
        assert_eq!(expired, vec![("a", 0), ("b", 0)]);
    }

    #[test]
    fn test_client_ip_precedence() {
        let base = Request::new("GET", "/").with_remote_addr("10.0.0.1");
        assert_eq!(base.client_ip(), Some("10.0.0.1"));

        let fwd = base
            .clone()
            .with_header("X-Forwarded-For", "203.0.113.9, 10.0.0.2");
        assert_eq!(fwd.client_ip(), Some("203.0.113.9"));

        let client = fwd.with_header("Client-IP", "198.51.100.4");
        assert_eq!(client.client_ip(), Some("198.51.100.4"));
    }

    #[test]
    fn test_base_url() {
        assert_eq!(Request::new("GET", "/a/b/c").base_url(), "/a/b");
        assert_eq!(Request::new("GET", "/a").base_url(), "/");
        assert_eq!(Request::new("GET", "/").base_url(), "/");
    }

    #[test]
    fn test_value_store() {
        let mut req = Request::new("GET", "/a/hello");
        assert_eq!(req.value("b"), None);
        req.set_value("b", "hello");
        assert_eq!(req.value("b"), Some("hello"));
        assert_eq!(req.values().len(), 1);
    }
}
