//! Cross-Origin Resource Sharing (CORS) gas.
//!
//! See: <https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS>
//!
//! The gas never blocks a request. For a simple (non-`OPTIONS`) request it
//! decorates the handler's response with the `Access-Control-*` headers the
//! browser needs to expose that response to scripts. For a preflight
//! (`OPTIONS`) request with an allowed origin it answers `204 No Content`
//! itself — the route handler is never invoked. A request whose origin is
//! absent or not allowed passes through untouched apart from `Vary`; the
//! browser enforces the policy, not the server.

use std::sync::Arc;

use http::StatusCode;
use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
    ACCESS_CONTROL_REQUEST_HEADERS, HeaderValue, ORIGIN, VARY,
};

use crate::gas::Gas;
use crate::handler::{self, BoxedHandler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;

/// Predicate deciding whether the gas should ignore a request entirely.
pub type SkipFn = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Configuration for the CORS gas.
///
/// Construct with struct-update syntax over [`CorsConfig::default()`]:
///
/// ```rust
/// use breeze::gases::cors::{CorsConfig, cors_with_config};
///
/// let gas = cors_with_config(CorsConfig {
///     allow_origins: vec!["https://app.example".into()],
///     allow_credentials: true,
///     max_age: 600,
///     ..CorsConfig::default()
/// });
/// ```
///
/// The configuration is captured immutably at construction and shared
/// read-only across concurrent requests.
pub struct CorsConfig {
    /// Skip the gas for matching requests. `None` means never skip.
    pub skip: Option<SkipFn>,

    /// Origins that may access the resource. `"*"` matches any origin.
    /// An empty list falls back to the default `["*"]`.
    ///
    /// A non-wildcard entry is reflected back verbatim in
    /// `Access-Control-Allow-Origin` when it matches — exact-origin
    /// reflection, as required for credentialed requests. Combining `"*"`
    /// with `allow_credentials` is rejected by browsers, not by this gas;
    /// validating that combination is the caller's responsibility.
    pub allow_origins: Vec<String>,

    /// Methods announced in `Access-Control-Allow-Methods` on preflight.
    /// An empty list falls back to `[GET, POST, PUT, DELETE]`.
    pub allow_methods: Vec<Method>,

    /// Request headers permitted in the actual request. When empty, a
    /// preflight echoes whatever `Access-Control-Request-Headers` the
    /// browser asked for.
    pub allow_headers: Vec<String>,

    /// Emit `Access-Control-Allow-Credentials: true` on allowed requests.
    pub allow_credentials: bool,

    /// Response headers exposed to the requesting page's script.
    pub expose_headers: Vec<String>,

    /// Preflight cache duration in seconds. 0 means no `Access-Control-Max-Age`.
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            skip: None,
            allow_origins: vec!["*".to_owned()],
            allow_methods: vec![Method::Get, Method::Post, Method::Put, Method::Delete],
            allow_headers: Vec::new(),
            allow_credentials: false,
            expose_headers: Vec::new(),
            max_age: 0,
        }
    }
}

/// Returns a CORS gas with the default configuration (any origin,
/// `GET`/`POST`/`PUT`/`DELETE`).
pub fn cors() -> impl Gas {
    cors_with_config(CorsConfig::default())
}

/// Returns a CORS gas from `config`. See [`cors()`].
///
/// # Panics
///
/// Panics if a configured origin, header name, or joined list is not a
/// valid HTTP header value. Configuration values are almost always
/// literals; a bad one is a programming error, caught at startup.
pub fn cors_with_config(mut config: CorsConfig) -> impl Gas {
    let defaults = CorsConfig::default();
    if config.allow_origins.is_empty() {
        config.allow_origins = defaults.allow_origins;
    }
    if config.allow_methods.is_empty() {
        config.allow_methods = defaults.allow_methods;
    }

    let policy = Arc::new(Policy::compile(config));

    move |next: BoxedHandler| -> BoxedHandler {
        let policy = Arc::clone(&policy);
        handler::from_fn(move |req| {
            let policy = Arc::clone(&policy);
            let next = Arc::clone(&next);
            Box::pin(async move { policy.evaluate(req, next).await })
        })
    }
}

// ── Compiled policy ───────────────────────────────────────────────────────────

/// Joined header values are computed once here, not per request.
struct Policy {
    skip: Option<SkipFn>,
    /// Configured origin strings paired with their reflected header values.
    origins: Vec<(String, HeaderValue)>,
    allow_methods: HeaderValue,
    allow_headers: Option<HeaderValue>,
    allow_credentials: bool,
    expose_headers: Option<HeaderValue>,
    max_age: Option<HeaderValue>,
}

impl Policy {
    fn compile(config: CorsConfig) -> Self {
        let origins = config
            .allow_origins
            .into_iter()
            .map(|o| {
                let value = header_value(&o);
                (o, value)
            })
            .collect();

        let methods: Vec<&str> = config.allow_methods.iter().map(|m| m.as_str()).collect();

        Self {
            skip: config.skip,
            origins,
            allow_methods: header_value(&methods.join(",")),
            allow_headers: joined(&config.allow_headers),
            allow_credentials: config.allow_credentials,
            expose_headers: joined(&config.expose_headers),
            max_age: (config.max_age > 0).then(|| header_value(&config.max_age.to_string())),
        }
    }

    async fn evaluate(&self, req: Request, next: BoxedHandler) -> Response {
        if let Some(skip) = &self.skip {
            if skip(&req) {
                return next.call(req).await;
            }
        }

        // "Origin absent" and "Origin present but empty" are different
        // cases: a wildcard entry still matches the latter.
        let matched = if req.contains_header(&ORIGIN) {
            self.match_origin(req.header(&ORIGIN).unwrap_or_default())
        } else {
            None
        };

        if req.method() == Method::Options {
            self.preflight(req, next, matched).await
        } else {
            self.simple(req, next, matched).await
        }
    }

    /// First configured entry equal to `"*"` or byte-equal to the request
    /// origin wins; the *configured* string is what gets reflected back.
    fn match_origin(&self, origin: &str) -> Option<HeaderValue> {
        self.origins
            .iter()
            .find(|(configured, _)| configured == "*" || configured == origin)
            .map(|(_, value)| value.clone())
    }

    /// Actual (non-`OPTIONS`) request: run the handler, then decorate its
    /// response. An unmatched origin gains only `Vary: Origin`.
    async fn simple(
        &self,
        req: Request,
        next: BoxedHandler,
        matched: Option<HeaderValue>,
    ) -> Response {
        let mut res = next.call(req).await;
        res.append_header(VARY, HeaderValue::from_static("Origin"));

        if let Some(allowed) = matched {
            res.set_header(ACCESS_CONTROL_ALLOW_ORIGIN, allowed);
            if self.allow_credentials {
                res.set_header(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
            }
            if let Some(exposed) = &self.expose_headers {
                res.set_header(ACCESS_CONTROL_EXPOSE_HEADERS, exposed.clone());
            }
        }
        res
    }

    /// Preflight (`OPTIONS`) request. A matched origin is answered here
    /// with `204 No Content` — the chain terminates and the route handler
    /// never runs. An unmatched origin passes through to the handler
    /// (which may well serve a plain `OPTIONS` route).
    async fn preflight(
        &self,
        req: Request,
        next: BoxedHandler,
        matched: Option<HeaderValue>,
    ) -> Response {
        let Some(allowed) = matched else {
            let mut res = next.call(req).await;
            add_preflight_vary(&mut res);
            return res;
        };

        // Captured before the request is consumed below.
        let requested_headers = req
            .header(&ACCESS_CONTROL_REQUEST_HEADERS)
            .filter(|h| !h.is_empty())
            .map(str::to_owned);

        let mut res = Response::status(StatusCode::NO_CONTENT);
        add_preflight_vary(&mut res);
        res.set_header(ACCESS_CONTROL_ALLOW_ORIGIN, allowed);
        res.set_header(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        if self.allow_credentials {
            res.set_header(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"));
        }
        match (&self.allow_headers, requested_headers) {
            (Some(configured), _) => {
                res.set_header(ACCESS_CONTROL_ALLOW_HEADERS, configured.clone());
            }
            // Nothing configured: reflect what the browser asked for.
            (None, Some(requested)) => {
                if let Ok(value) = HeaderValue::from_str(&requested) {
                    res.set_header(ACCESS_CONTROL_ALLOW_HEADERS, value);
                }
            }
            (None, None) => {}
        }
        if let Some(age) = &self.max_age {
            res.set_header(ACCESS_CONTROL_MAX_AGE, age.clone());
        }
        res
    }
}

/// Caches must key a preflight answer on everything it was derived from.
fn add_preflight_vary(res: &mut Response) {
    res.append_header(VARY, HeaderValue::from_static("Origin"));
    res.append_header(VARY, HeaderValue::from_static("Access-Control-Request-Method"));
    res.append_header(VARY, HeaderValue::from_static("Access-Control-Request-Headers"));
}

fn joined(values: &[String]) -> Option<HeaderValue> {
    (!values.is_empty()).then(|| header_value(&values.join(",")))
}

fn header_value(s: &str) -> HeaderValue {
    HeaderValue::from_str(s).unwrap_or_else(|e| panic!("invalid CORS header value `{s}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use bytes::Bytes;
    use http::header::HeaderMap;

    use crate::handler::Handler;

    fn request(method: Method, headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri("/things");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        Request::new(method, parts, Bytes::new(), HashMap::new())
    }

    fn terminal(called: Arc<AtomicBool>) -> BoxedHandler {
        let handler = move |_req: Request| {
            let called = Arc::clone(&called);
            async move {
                called.store(true, Ordering::SeqCst);
                Response::text("hit")
            }
        };
        handler.into_boxed_handler()
    }

    async fn run(gas: impl Gas, req: Request) -> (Response, bool) {
        let called = Arc::new(AtomicBool::new(false));
        let chain = gas.wrap(terminal(Arc::clone(&called)));
        let res = chain.call(req).await;
        (res, called.load(Ordering::SeqCst))
    }

    fn vary_values(headers: &HeaderMap) -> Vec<&str> {
        headers.get_all(VARY).iter().map(|v| v.to_str().unwrap()).collect()
    }

    #[tokio::test]
    async fn wildcard_reflects_star_not_the_origin() {
        let req = request(Method::Get, &[("origin", "https://a.example")]);
        let (res, called) = run(cors(), req).await;

        assert!(called);
        assert_eq!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }

    #[tokio::test]
    async fn exact_origin_is_reflected_verbatim() {
        let gas = cors_with_config(CorsConfig {
            allow_origins: vec!["https://a.example".into()],
            ..CorsConfig::default()
        });
        let req = request(Method::Get, &[("origin", "https://a.example")]);
        let (res, called) = run(gas, req).await;

        assert!(called);
        assert_eq!(
            res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://a.example"
        );
    }

    #[tokio::test]
    async fn unmatched_origin_passes_through_without_cors_headers() {
        let gas = cors_with_config(CorsConfig {
            allow_origins: vec!["https://a.example".into()],
            ..CorsConfig::default()
        });
        let req = request(Method::Get, &[("origin", "https://b.example")]);
        let (res, called) = run(gas, req).await;

        assert!(called);
        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
        // Vary is still announced so caches key on the origin.
        assert_eq!(vary_values(res.headers()), ["Origin"]);
    }

    #[tokio::test]
    async fn absent_origin_gains_only_vary() {
        let (res, called) = run(cors(), request(Method::Get, &[])).await;

        assert!(called);
        assert_eq!(vary_values(res.headers()), ["Origin"]);
        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn preflight_answers_204_and_skips_the_handler() {
        let gas = cors_with_config(CorsConfig {
            allow_origins: vec!["https://a.example".into()],
            ..CorsConfig::default()
        });
        let req = request(
            Method::Options,
            &[
                ("origin", "https://a.example"),
                ("access-control-request-method", "POST"),
                ("access-control-request-headers", "X-Foo"),
            ],
        );
        let (res, called) = run(gas, req).await;

        assert!(!called);
        assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
        assert!(res.body().is_empty());
        assert_eq!(
            res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://a.example"
        );
        assert_eq!(
            res.headers().get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "GET,POST,PUT,DELETE"
        );
        // No allow_headers configured: the browser's ask is echoed back.
        assert_eq!(res.headers().get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "X-Foo");
        assert_eq!(
            vary_values(res.headers()),
            ["Origin", "Access-Control-Request-Method", "Access-Control-Request-Headers"]
        );
    }

    #[tokio::test]
    async fn preflight_prefers_configured_allow_headers() {
        let gas = cors_with_config(CorsConfig {
            allow_headers: vec!["Content-Type".into(), "Authorization".into()],
            ..CorsConfig::default()
        });
        let req = request(
            Method::Options,
            &[("origin", "https://a.example"), ("access-control-request-headers", "X-Foo")],
        );
        let (res, _) = run(gas, req).await;

        assert_eq!(
            res.headers().get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "Content-Type,Authorization"
        );
    }

    #[tokio::test]
    async fn preflight_with_unmatched_origin_reaches_the_handler() {
        let gas = cors_with_config(CorsConfig {
            allow_origins: vec!["https://a.example".into()],
            ..CorsConfig::default()
        });
        let req = request(Method::Options, &[("origin", "https://b.example")]);
        let (res, called) = run(gas, req).await;

        assert!(called);
        assert_ne!(res.status_code(), StatusCode::NO_CONTENT);
        assert_eq!(
            vary_values(res.headers()),
            ["Origin", "Access-Control-Request-Method", "Access-Control-Request-Headers"]
        );
        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn max_age_is_emitted_only_when_positive() {
        let silent = cors_with_config(CorsConfig { max_age: 0, ..CorsConfig::default() });
        let req = request(Method::Options, &[("origin", "https://a.example")]);
        let (res, _) = run(silent, req).await;
        assert!(res.headers().get(ACCESS_CONTROL_MAX_AGE).is_none());

        let cached = cors_with_config(CorsConfig { max_age: 600, ..CorsConfig::default() });
        let req = request(Method::Options, &[("origin", "https://a.example")]);
        let (res, _) = run(cached, req).await;
        assert_eq!(res.headers().get(ACCESS_CONTROL_MAX_AGE).unwrap(), "600");
    }

    #[tokio::test]
    async fn credentials_header_is_all_or_nothing() {
        let with = cors_with_config(CorsConfig {
            allow_origins: vec!["https://a.example".into()],
            allow_credentials: true,
            ..CorsConfig::default()
        });
        let req = request(Method::Get, &[("origin", "https://a.example")]);
        let (res, _) = run(with, req).await;
        assert_eq!(res.headers().get(ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");

        let without = cors_with_config(CorsConfig {
            allow_origins: vec!["https://a.example".into()],
            ..CorsConfig::default()
        });
        let req = request(Method::Get, &[("origin", "https://a.example")]);
        let (res, _) = run(without, req).await;
        // Absent entirely, never `false`.
        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
    }

    #[tokio::test]
    async fn expose_headers_emitted_only_when_configured() {
        let gas = cors_with_config(CorsConfig {
            expose_headers: vec!["X-Request-Id".into(), "X-Trace".into()],
            ..CorsConfig::default()
        });
        let req = request(Method::Get, &[("origin", "https://a.example")]);
        let (res, _) = run(gas, req).await;
        assert_eq!(
            res.headers().get(ACCESS_CONTROL_EXPOSE_HEADERS).unwrap(),
            "X-Request-Id,X-Trace"
        );
    }

    #[tokio::test]
    async fn skip_leaves_both_request_kinds_untouched() {
        for method in [Method::Get, Method::Options] {
            let gas = cors_with_config(CorsConfig {
                skip: Some(Arc::new(|req: &Request| req.path().starts_with("/things"))),
                ..CorsConfig::default()
            });
            let req = request(method, &[("origin", "https://a.example")]);
            let (res, called) = run(gas, req).await;

            assert!(called);
            assert!(res.headers().get(VARY).is_none());
            assert!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        }
    }

    #[tokio::test]
    async fn empty_origin_header_still_matches_wildcard() {
        let req = request(Method::Get, &[("origin", "")]);
        let (res, called) = run(cors(), req).await;

        assert!(called);
        assert_eq!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
    }

    #[tokio::test]
    async fn empty_config_lists_fall_back_to_defaults() {
        let gas = cors_with_config(CorsConfig {
            allow_origins: Vec::new(),
            allow_methods: Vec::new(),
            ..CorsConfig::default()
        });
        let req = request(Method::Options, &[("origin", "https://a.example")]);
        let (res, _) = run(gas, req).await;

        assert_eq!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(
            res.headers().get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "GET,POST,PUT,DELETE"
        );
    }
}
