#[allow(unused_imports)]
use crate::guardia::handlers::{
    authenticate, authenticate::__path_authenticate, health, health::__path_health,
};
use crate::guardia::{groups::GroupConfig, metrics::Metrics, token::TokenValidator};
use anyhow::Result;
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod groups;
pub mod handlers;
pub mod metrics;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[derive(OpenApi)]
#[openapi(
    paths(health, authenticate),
    components(
        schemas(
            health::Health,
            authenticate::TokenReview,
            authenticate::TokenReviewSpec,
            authenticate::TokenReviewStatus,
            authenticate::UserInfo,
        )
    ),
    tags(
        (name = "guardia", description = "Webhook token authentication API"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Assemble the webhook router.
///
/// Kept separate from [`new`] so tests can drive the exact production stack
/// without binding a socket.
#[must_use]
pub fn router(
    validator: Arc<dyn TokenValidator>,
    groups: GroupConfig,
    metrics: Arc<Metrics>,
) -> Router {
    Router::new()
        .route("/authenticate", post(handlers::authenticate))
        .route("/metrics", get(handlers::metrics))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(validator))
                .layer(Extension(groups))
                .layer(Extension(metrics)),
        )
        .route("/health", get(handlers::health).options(handlers::health))
}

/// Bind and serve the webhook.
///
/// # Errors
/// Returns an error if the server fails to start
pub async fn new(port: u16, validator: Arc<dyn TokenValidator>, groups: GroupConfig) -> Result<()> {
    let metrics = Arc::new(Metrics::new());

    let app = router(validator, groups, metrics);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, request_id)
}
