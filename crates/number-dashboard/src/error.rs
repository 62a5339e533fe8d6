//! Error types for the dashboard API.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use number_transfer::TransferError;
use serde::Serialize;
use thiserror::Error;
use twilio_client::TwilioError;

const AUTH_REALM: &str = "Basic realm=\"number-dashboard\"";

/// Dashboard error types.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("Provider error: {0}")]
    Provider(#[from] TwilioError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

fn provider_status(error: &TwilioError) -> (StatusCode, &'static str) {
    match error {
        TwilioError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        e if e.is_transport() => (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE"),
        _ => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
    }
}

impl DashboardError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            DashboardError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            DashboardError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            DashboardError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
            DashboardError::Transfer(e) => match e {
                TransferError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                TransferError::BundleProvisioningFailed { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "BUNDLE_PROVISIONING_FAILED")
                }
                TransferError::TransferFailed(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "TRANSFER_FAILED")
                }
                TransferError::UpstreamUnavailable(inner) if inner.is_transport() => {
                    (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
                }
                TransferError::UpstreamUnavailable(_) => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            },
            DashboardError::Provider(e) => provider_status(e),
            DashboardError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, AUTH_REALM)], Json(body)).into_response();
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twilio_client::BundleType;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DashboardError::Unauthorized, StatusCode::UNAUTHORIZED),
            (DashboardError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (DashboardError::RateLimitExceeded, StatusCode::TOO_MANY_REQUESTS),
            (
                DashboardError::Transfer(TransferError::NotFound("PN1".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                DashboardError::Transfer(TransferError::BundleProvisioningFailed {
                    account_sid: "AC2".into(),
                    number_type: BundleType::Mobile,
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DashboardError::Transfer(TransferError::TransferFailed(TwilioError::Api {
                    status: 400,
                    code: Some(21649),
                    message: "Bundle is not approved".into(),
                })),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DashboardError::Transfer(TransferError::UpstreamUnavailable(
                    TwilioError::Unauthorized,
                )),
                StatusCode::BAD_GATEWAY,
            ),
            (
                DashboardError::Provider(TwilioError::NotFound("AC9".into())),
                StatusCode::NOT_FOUND,
            ),
            (DashboardError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status().0, expected, "{}", error);
        }
    }

    #[test]
    fn test_unauthorized_sets_challenge() {
        let response = DashboardError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            AUTH_REALM
        );
    }

    #[test]
    fn test_internal_error_body() {
        let response =
            DashboardError::Internal("invalid stored password hash".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[test]
    fn test_transfer_failure_keeps_provider_message() {
        let error = DashboardError::from(TransferError::TransferFailed(TwilioError::Api {
            status: 400,
            code: None,
            message: "Bundle is not approved".into(),
        }));
        assert_eq!(
            error.to_string(),
            "Transfer failed: API error: 400 - Bundle is not approved"
        );
    }
}
