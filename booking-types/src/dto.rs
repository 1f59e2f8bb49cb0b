//! Data Transfer Objects (DTOs) for the inbound and outbound boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::domain::EventTypeId;

// ─────────────────────────────────────────────────────────────────────────────
// Inbound
// ─────────────────────────────────────────────────────────────────────────────

/// Booking submission from a client. Untrusted.
///
/// `duration` and `district` default to empty strings so that a missing field
/// fails validation like any other unknown value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Duration tier key
    #[schema(example = "30min")]
    #[serde(default)]
    pub duration: String,
    /// Service district
    #[schema(example = "Midtown")]
    #[serde(default)]
    pub district: String,
    /// Slot start, passed through to the provider as-is
    #[schema(example = "2025-03-01T15:00:00Z")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Slot end, passed through to the provider as-is
    #[schema(example = "2025-03-01T15:30:00Z")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[schema(example = "Jordan Doe")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_name: Option<String>,
    #[schema(example = "jordan@example.com")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_phone: Option<String>,
    /// Free-text meeting location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Outbound to the scheduling provider
// ─────────────────────────────────────────────────────────────────────────────

/// Body of the provider's booking-creation call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundBookingPayload {
    pub event_type_id: EventTypeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    pub time_zone: String,
    pub responses: AttendeeResponses,
    pub metadata: BookingMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendeeResponses {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub district: String,
    pub duration: String,
}

/// Fixed tags identifying where the booking came from and how it was paid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingMetadata {
    pub city: String,
    pub booking_type: String,
    pub payment_method: String,
}

/// Provider booking identifier, numeric or textual depending on the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum BookingId {
    Number(u64),
    Text(String),
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingId::Number(n) => write!(f, "{}", n),
            BookingId::Text(s) => f.write_str(s),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outbound to the client
// ─────────────────────────────────────────────────────────────────────────────

/// Successful booking response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub success: bool,
    #[schema(example = 12345)]
    pub booking_id: BookingId,
    #[schema(example = "30min")]
    pub duration: String,
    /// Base price in major units
    #[schema(example = 45.0)]
    pub amount: f64,
    #[schema(example = 3.6)]
    pub tax: f64,
    #[schema(example = 48.6)]
    pub total: f64,
    #[schema(example = "settled")]
    pub payment_status: String,
    #[schema(example = "ATL5D-12345")]
    pub confirmation_number: String,
    pub next_steps: String,
}

/// Failure body for configuration and upstream faults.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingErrorBody {
    #[schema(example = "Failed to process Atlanta booking")]
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[schema(example = "hi@atl5d.com")]
    pub support_contact: String,
    #[schema(example = "(404) 889-5545")]
    pub support_phone: String,
}

/// Failure body for rejected input.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_durations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_districts: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_request_tolerates_missing_fields() {
        let req: BookingRequest = serde_json::from_str(r#"{"district":"Midtown"}"#).unwrap();
        assert_eq!(req.duration, "");
        assert_eq!(req.district, "Midtown");
        assert!(req.start_time.is_none());
    }

    #[test]
    fn test_booking_request_camel_case() {
        let req: BookingRequest = serde_json::from_str(
            r#"{"duration":"30min","district":"Midtown","startTime":"s","endTime":"e","attendeeName":"A","attendeeEmail":"a@b.c"}"#,
        )
        .unwrap();
        assert_eq!(req.start_time.as_deref(), Some("s"));
        assert_eq!(req.attendee_email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_booking_id_accepts_number_or_string() {
        let n: BookingId = serde_json::from_str("42").unwrap();
        let s: BookingId = serde_json::from_str(r#""uid-7""#).unwrap();
        assert_eq!(n.to_string(), "42");
        assert_eq!(s.to_string(), "uid-7");
    }

    #[test]
    fn test_outbound_payload_shape() {
        let payload = OutboundBookingPayload {
            event_type_id: EventTypeId::new("101").unwrap(),
            start: Some("s".into()),
            end: None,
            time_zone: "America/New_York".into(),
            responses: AttendeeResponses {
                name: Some("A".into()),
                email: None,
                phone: None,
                location: None,
                district: "Midtown".into(),
                duration: "30min".into(),
            },
            metadata: BookingMetadata {
                city: "Atlanta".into(),
                booking_type: "ATL5D_Public".into(),
                payment_method: "x402".into(),
            },
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["eventTypeId"], 101);
        assert_eq!(json["timeZone"], "America/New_York");
        assert!(json.get("end").is_none());
        assert_eq!(json["responses"]["district"], "Midtown");
        assert_eq!(json["metadata"]["bookingType"], "ATL5D_Public");
        assert_eq!(json["metadata"]["paymentMethod"], "x402");
    }
}
