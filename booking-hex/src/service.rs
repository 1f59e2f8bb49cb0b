//! Booking Application Service
//!
//! Validates a booking submission against the static configuration, prices
//! it, hands it to the payment channel and translates the result.
//! Contains NO infrastructure logic - the channel and the random source are
//! injected.

use std::sync::Arc;

use booking_types::{
    AppError, AttendeeResponses, BookingConfiguration, BookingConfirmation, BookingMetadata,
    BookingRequest, EventIdentifierSource, EventSelector, EventTypeId, OutboundBookingPayload,
    PaymentAugmentedResult, PaymentChannel, PaymentTerms, PricingTier,
};

/// Application service for booking submissions.
///
/// Holds no mutable state: concurrent calls share the configuration,
/// channel and selector read-only.
pub struct BookingService<C: PaymentChannel, S: EventSelector> {
    config: Arc<BookingConfiguration>,
    channel: C,
    selector: S,
}

impl<C: PaymentChannel, S: EventSelector> BookingService<C, S> {
    /// Creates a new booking service.
    pub fn new(config: Arc<BookingConfiguration>, channel: C, selector: S) -> Self {
        Self {
            config,
            channel,
            selector,
        }
    }

    pub fn config(&self) -> &BookingConfiguration {
        &self.config
    }

    /// Returns a reference to the underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Validates, pays for and creates one booking.
    pub async fn book(&self, req: BookingRequest) -> Result<BookingConfirmation, AppError> {
        let credential = self.config.signing_credential().ok_or_else(|| {
            AppError::Configuration("signing credential is not configured".into())
        })?;

        let tier = self.resolve_tier(&req.duration)?;

        if !self.config.is_district_allowed(&req.district) {
            return Err(AppError::DistrictUnavailable {
                available: self.config.allowed_districts().to_vec(),
            });
        }

        let event_type_id = self.select_event_type(tier)?;
        let payload = self.build_payload(&req, event_type_id);

        let brand = self.config.brand();
        let terms = PaymentTerms {
            amount: tier.price(),
            tax_rate: tier.tax_rate(),
            description: format!("{} {} Booking", brand.confirmation_prefix, req.duration),
        };

        tracing::debug!(
            event_type_id = %payload.event_type_id,
            amount = %terms.amount,
            "submitting paid booking"
        );

        let result = self
            .channel
            .create_booking(&payload, &terms, credential)
            .await?;

        Ok(self.confirm(req.duration, tier, result))
    }

    /// Strict mode only accepts configured durations; permissive mode prices
    /// unknown durations with the fallback tier.
    fn resolve_tier(&self, duration: &str) -> Result<&PricingTier, AppError> {
        if let Some(tier) = self.config.tier(duration) {
            return Ok(tier);
        }

        let policy = self.config.policy();
        if policy.strict_duration_validation {
            return Err(AppError::InvalidDuration {
                valid: self.config.duration_keys(),
            });
        }

        self.config.tier(&policy.fallback_duration).ok_or_else(|| {
            AppError::Configuration(format!(
                "fallback duration '{}' has no pricing tier",
                policy.fallback_duration
            ))
        })
    }

    fn select_event_type(&self, tier: &PricingTier) -> Result<EventTypeId, AppError> {
        match &self.config.policy().event_identifier_source {
            EventIdentifierSource::Fixed(id) => Ok(id.clone()),
            EventIdentifierSource::PerTier => self
                .selector
                .choose(tier.event_type_ids())
                .cloned()
                .ok_or_else(|| {
                    AppError::Configuration(format!(
                        "no event types configured for the {} tier",
                        tier.duration()
                    ))
                }),
        }
    }

    fn build_payload(
        &self,
        req: &BookingRequest,
        event_type_id: EventTypeId,
    ) -> OutboundBookingPayload {
        let brand = self.config.brand();
        OutboundBookingPayload {
            event_type_id,
            start: req.start_time.clone(),
            end: req.end_time.clone(),
            time_zone: self.config.timezone().to_string(),
            responses: AttendeeResponses {
                name: req.attendee_name.clone(),
                email: req.attendee_email.clone(),
                phone: req.attendee_phone.clone(),
                location: req.location.clone(),
                district: req.district.clone(),
                duration: req.duration.clone(),
            },
            metadata: BookingMetadata {
                city: brand.city.clone(),
                booking_type: brand.booking_type.clone(),
                payment_method: brand.payment_method.clone(),
            },
        }
    }

    fn confirm(
        &self,
        duration: String,
        tier: &PricingTier,
        result: PaymentAugmentedResult,
    ) -> BookingConfirmation {
        let brand = self.config.brand();
        BookingConfirmation {
            success: true,
            confirmation_number: format!("{}-{}", brand.confirmation_prefix, result.booking_id),
            booking_id: result.booking_id,
            duration,
            amount: tier.price().as_major(),
            tax: tier.tax().as_major(),
            total: tier.total().as_major(),
            payment_status: result.receipt.status.as_str().to_string(),
            next_steps: brand.next_steps.clone(),
        }
    }
}
