use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::{Instrument, info_span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Debug)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn generate() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

pub async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| RequestId(s.to_string()))
        .unwrap_or_else(RequestId::generate);

    req.extensions_mut().insert(id.clone());

    // trace_id ties every upstream call of this invocation together
    let span = info_span!(
        "http_request",
        trace_id = %id.0,
        method = %req.method(),
        path = %req.uri().path()
    );

    let mut resp = next.run(req).instrument(span).await;

    if let Ok(val) = HeaderValue::from_str(&id.0) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    resp
}
