//! TokenReview webhook handler.
//!
//! The Kubernetes API server POSTs a `TokenReview` carrying the presented
//! bearer token; the reply carries the authenticated identity and its groups.
//! The contract is binary, so decode failures degrade to an unauthenticated
//! response instead of a distinct error status, and every request emits
//! exactly one response and one latency observation.

use crate::guardia::{groups::GroupConfig, metrics::Metrics, token::TokenValidator};
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// TokenReview envelope exchanged with the Kubernetes API server.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct TokenReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<TokenReviewSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TokenReviewStatus>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct TokenReviewSpec {
    #[serde(default)]
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct TokenReviewStatus {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserInfo {
    pub username: String,
    pub groups: Vec<String>,
}

// Review envelopes are tiny; anything larger is not a TokenReview.
const BODY_LIMIT: usize = 1024 * 1024;

// A bad body is not fatal: verification proceeds with an empty token, which
// fails downstream and surfaces as 401. The explicit variant keeps that
// continue-anyway path a deliberate branch.
enum DecodeOutcome {
    Decoded(TokenReview),
    Failed,
}

impl DecodeOutcome {
    fn token(self) -> String {
        match self {
            Self::Decoded(review) => review.spec.map(|spec| spec.token).unwrap_or_default(),
            Self::Failed => String::new(),
        }
    }
}

// Read failures are recorded and processing continues with an empty body,
// so even an aborted upload gets a well-formed unauthenticated response.
async fn read_body(body: Body) -> Bytes {
    match to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Failed to read request body: {err}");
            Bytes::new()
        }
    }
}

fn decode_review(body: &[u8]) -> DecodeOutcome {
    match serde_json::from_slice::<TokenReview>(body) {
        Ok(review) => DecodeOutcome::Decoded(review),
        Err(err) => {
            warn!("Failed to decode token review: {err}");
            DecodeOutcome::Failed
        }
    }
}

#[utoipa::path(
    post,
    path= "/authenticate",
    request_body = TokenReview,
    responses (
        (status = 200, description = "Token is valid, identity and groups are granted", body = TokenReview, content_type = "application/json"),
        (status = 401, description = "Token is invalid", body = TokenReview, content_type = "application/json"),
    ),
    tag = "authenticate",
)]
#[instrument(skip_all)]
pub async fn authenticate(
    Extension(validator): Extension<Arc<dyn TokenValidator>>,
    Extension(groups): Extension<GroupConfig>,
    Extension(metrics): Extension<Arc<Metrics>>,
    body: Body,
) -> Response {
    // Observed on drop, so every exit path below is metered.
    let mut timer = metrics.start_timer();

    let body = read_body(body).await;
    let token = decode_review(&body).token();

    match validator.verify(&token).await {
        Ok(identity) => {
            info!("Challenging token for user {}", identity.user);

            let review = TokenReview {
                spec: None,
                status: Some(TokenReviewStatus {
                    authenticated: true,
                    user: Some(UserInfo {
                        username: identity.user.clone(),
                        groups: groups.for_identity(&identity),
                    }),
                }),
            };

            timer.set_status(StatusCode::OK);
            respond(StatusCode::OK, &review)
        }
        Err(err) => {
            debug!("Token rejected: {err}");

            let review = TokenReview {
                spec: None,
                status: Some(TokenReviewStatus {
                    authenticated: false,
                    user: None,
                }),
            };

            timer.set_status(StatusCode::UNAUTHORIZED);
            respond(StatusCode::UNAUTHORIZED, &review)
        }
    }
}

// The status is already chosen when the body is encoded; an encode failure
// keeps the status and sends an empty body instead.
fn respond(code: StatusCode, review: &TokenReview) -> Response {
    match serde_json::to_vec(review) {
        Ok(body) => (
            code,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!("Failed to encode token review: {err}");
            (
                code,
                [(header::CONTENT_TYPE, "application/json")],
                Vec::new(),
            )
                .into_response()
        }
    }
}
