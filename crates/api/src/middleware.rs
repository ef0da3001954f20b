use axum::{
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

/// Mark every response as non-cacheable and log its outcome.
pub async fn no_cache_headers(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut res = next.run(req).await;

    let headers = res.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));

    tracing::debug!(%method, %path, status = res.status().as_u16(), "request handled");
    res
}
