//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use booking_types::{
    AppError, BookingErrorBody, BookingRequest, BrandProfile, EventSelector, PaymentChannel,
    ValidationErrorBody,
};

use crate::BookingService;

/// Application state shared across handlers.
pub struct AppState<C: PaymentChannel, S: EventSelector> {
    pub service: BookingService<C, S>,
}

/// A fully rendered JSON error response.
pub struct ApiError {
    status: StatusCode,
    body: serde_json::Value,
}

impl ApiError {
    /// Renders an application error. Validation faults get their own body;
    /// everything else gets the failure body with support contacts.
    pub fn render(err: AppError, brand: &BrandProfile) -> Self {
        let validation = |error: String,
                          valid_durations: Option<Vec<String>>,
                          available_districts: Option<Vec<String>>| {
            serde_json::to_value(ValidationErrorBody {
                error,
                valid_durations,
                available_districts,
            })
        };

        let (status, body) = match err {
            AppError::InvalidDuration { ref valid } => (
                StatusCode::BAD_REQUEST,
                validation(err.to_string(), Some(valid.clone()), None),
            ),
            AppError::DistrictUnavailable { ref available } => (
                StatusCode::BAD_REQUEST,
                validation(err.to_string(), None, Some(available.clone())),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, validation(msg, None, None)),
            AppError::Configuration(_) | AppError::Upstream { .. } => {
                let status = match &err {
                    AppError::Upstream {
                        status: Some(code), ..
                    } => StatusCode::from_u16(*code)
                        .ok()
                        .filter(|s| s.is_client_error() || s.is_server_error())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    serde_json::to_value(BookingErrorBody {
                        error: brand.failure_message.clone(),
                        details: Some(err.details()),
                        support_contact: brand.support_email.clone(),
                        support_phone: brand.support_phone.clone(),
                    }),
                )
            }
        };

        Self {
            status,
            body: body.unwrap_or_else(|_| serde_json::json!({ "error": brand.failure_message })),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Submit a paid booking.
#[tracing::instrument(skip_all)]
pub async fn create_booking<C: PaymentChannel, S: EventSelector>(
    State(state): State<Arc<AppState<C, S>>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let brand = state.service.config().brand();

    let Json(req) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "rejected malformed booking body");
        ApiError::render(AppError::BadRequest(rejection.body_text()), brand)
    })?;

    tracing::info!(duration = %req.duration, district = %req.district, "booking requested");

    match state.service.book(req).await {
        Ok(confirmation) => {
            tracing::info!(
                confirmation = %confirmation.confirmation_number,
                payment_status = %confirmation.payment_status,
                "booking confirmed"
            );
            Ok((StatusCode::OK, Json(confirmation)))
        }
        Err(err) if err.is_client_error() => {
            tracing::warn!(error = %err, "booking rejected");
            Err(ApiError::render(err, brand))
        }
        Err(err) => {
            tracing::error!(error = %err, "{} booking error", brand.confirmation_prefix);
            Err(ApiError::render(err, brand))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_and_body(err: AppError) -> (StatusCode, serde_json::Value) {
        let api = ApiError::render(err, &BrandProfile::default());
        (api.status, api.body)
    }

    #[test]
    fn test_district_error_body() {
        let (status, body) = status_and_body(AppError::DistrictUnavailable {
            available: vec!["Midtown".into()],
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Service unavailable in this district");
        assert_eq!(body["availableDistricts"][0], "Midtown");
        assert!(body.get("validDurations").is_none());
    }

    #[test]
    fn test_upstream_status_mirrored() {
        let (status, body) = status_and_body(AppError::Upstream {
            status: Some(422),
            detail: "Invalid event type".into(),
        });
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Failed to process Atlanta booking");
        assert_eq!(body["details"], "Invalid event type");
        assert_eq!(body["supportContact"], "hi@atl5d.com");
        assert_eq!(body["supportPhone"], "(404) 889-5545");
    }

    #[test]
    fn test_non_error_upstream_status_defaults_to_500() {
        let (status, _) = status_and_body(AppError::Upstream {
            status: Some(302),
            detail: "redirect".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = status_and_body(AppError::Upstream {
            status: None,
            detail: "connection reset".into(),
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_configuration_fault() {
        let (status, body) =
            status_and_body(AppError::Configuration("signing credential is not configured".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["details"],
            "Server configuration error: signing credential is not configured"
        );
    }
}
