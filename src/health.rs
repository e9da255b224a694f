//! Built-in health-check handlers.
//!
//! Two probes, two questions: `liveness` ("is the process alive?" — a
//! failure restarts the pod) and `readiness` ("can it serve traffic?" — a
//! failure pulls it from the load-balancer). Register them like any other
//! handler:
//!
//! ```rust,no_run
//! use breeze::{Router, health};
//!
//! let app = Router::new()
//!     .get("/healthz", health::liveness)
//!     .get("/readyz", health::readiness);
//! ```
//!
//! `readiness` here is a stand-in: replace it with your own handler when
//! traffic must be gated on dependency health (database connections,
//! downstream services) or a warm-up period.

use crate::{Request, Response};

/// Liveness probe handler.
///
/// Always `200 OK`, body `"ok"`. If the process can respond to HTTP at
/// all, it is alive — this handler intentionally has no dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe handler (default implementation).
///
/// Always `200 OK`, body `"ready"`.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use bytes::Bytes;
    use http::StatusCode;

    use crate::Method;

    fn probe(path: &str) -> Request {
        let (parts, ()) = http::Request::builder().uri(path).body(()).unwrap().into_parts();
        Request::new(Method::Get, parts, Bytes::new(), HashMap::new())
    }

    #[tokio::test]
    async fn probes_answer_200_with_fixed_bodies() {
        let live = liveness(probe("/healthz")).await;
        assert_eq!(live.status_code(), StatusCode::OK);
        assert_eq!(live.body(), b"ok");

        let ready = readiness(probe("/readyz")).await;
        assert_eq!(ready.status_code(), StatusCode::OK);
        assert_eq!(ready.body(), b"ready");
    }
}
