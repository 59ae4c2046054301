use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::{AppError, ValidationError};
use crate::models::{Booking, BookingRequest, BookingStatus, Service};
use crate::services::availability;
use crate::services::catalog::CatalogProvider;
use crate::services::classifier::{classify, ClassifiedBookings};
use crate::services::clock::Clock;
use crate::services::pricing::{PriceCalculator, PriceOptions};
use crate::services::scheduling::{
    date_field, time_field, validate_booking, validate_request, ValidatedRequest,
};
use crate::services::store::BookingStore;

/// Booking workflows over an injected catalog, store and clock.
pub struct BookingService {
    catalog: Arc<dyn CatalogProvider>,
    store: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
    pricing: PriceCalculator,
}

impl BookingService {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        store: Arc<dyn BookingStore>,
        clock: Arc<dyn Clock>,
        pricing: PriceCalculator,
    ) -> Self {
        Self {
            catalog,
            store,
            clock,
            pricing,
        }
    }

    pub fn catalog(&self) -> &dyn CatalogProvider {
        self.catalog.as_ref()
    }

    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, AppError> {
        let validated = validate_request(request)?;
        let service = self.require_service(&validated.service_id).await?;
        let existing = self.occupancy(&service.id, validated.date).await?;

        let booking = validate_booking(validated, &service, &existing, self.clock.now())?;
        let booking = self.store.save(booking).await.map_err(AppError::Storage)?;

        tracing::info!(
            booking_id = %booking.id,
            service_id = %booking.service_id,
            date = %booking.date,
            time = %booking.time_label(),
            status = booking.status.as_str(),
            "booking created"
        );
        Ok(booking)
    }

    pub async fn get_booking(&self, id: &str) -> Result<Booking, AppError> {
        self.store
            .get(id)
            .await
            .map_err(AppError::Storage)?
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
    }

    pub async fn user_bookings(&self) -> Result<ClassifiedBookings, AppError> {
        let bookings = self.store.list_all().await.map_err(AppError::Storage)?;
        Ok(classify(bookings, self.clock.now()))
    }

    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, AppError> {
        self.transition(id, BookingStatus::Cancelled).await
    }

    pub async fn complete_booking(&self, id: &str) -> Result<Booking, AppError> {
        self.transition(id, BookingStatus::Completed).await
    }

    /// Moves an active booking to a new free slot of the same service.
    pub async fn reschedule_booking(
        &self,
        id: &str,
        date: &str,
        time: &str,
    ) -> Result<Booking, AppError> {
        let new_date = date_field(date)?;
        let new_time = time_field(time)?;

        let mut booking = self.get_booking(id).await?;
        if !booking.is_active() {
            return Err(AppError::InvalidTransition {
                from: booking.status.as_str(),
                to: BookingStatus::Confirmed.as_str(),
            });
        }

        let service = self.require_service(&booking.service_id).await?;
        let mut existing = self.occupancy(&service.id, new_date).await?;
        existing.retain(|b| b.id != booking.id);

        let now = self.clock.now();
        let request = ValidatedRequest {
            service_id: booking.service_id.clone(),
            option_id: booking.option_id.clone(),
            date: new_date,
            time: new_time,
            contact: booking.contact.clone(),
            payment_method: booking.payment_method,
        };
        validate_booking(request, &service, &existing, now)?;

        booking.date = new_date;
        booking.time = new_time;
        booking.status = BookingStatus::Confirmed;
        booking.updated_at = now;
        self.persist_update(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            date = %booking.date,
            time = %booking.time_label(),
            "booking rescheduled"
        );
        Ok(booking)
    }

    pub async fn available_slots(
        &self,
        service_id: &str,
        date: &str,
    ) -> Result<Vec<String>, AppError> {
        let date = date_field(date)?;
        let service = self.require_service(service_id).await?;
        let existing = self.occupancy(&service.id, date).await?;
        Ok(availability::available_slots(
            &service,
            date,
            self.clock.today(),
            &existing,
        ))
    }

    pub async fn quote(
        &self,
        service_id: &str,
        option_id: &str,
        options: &PriceOptions,
    ) -> Result<Decimal, AppError> {
        let service = self.require_service(service_id).await?;
        let option = service
            .option(option_id)
            .ok_or_else(|| ValidationError::UnknownOption(option_id.to_string()))?;
        Ok(self.pricing.total(option.price, options)?)
    }

    async fn require_service(&self, id: &str) -> Result<Service, AppError> {
        self.catalog
            .get_service_by_id(id)
            .await
            .map_err(AppError::Upstream)?
            .ok_or_else(|| ValidationError::UnknownService(id.to_string()).into())
    }

    /// Bookings already on the service that day. A store failure means the
    /// slot cannot be verified, never that it is free.
    async fn occupancy(
        &self,
        service_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<Booking>, ValidationError> {
        self.store.list_bookings(service_id, date).await.map_err(|e| {
            tracing::warn!(service_id, %date, error = %e, "failed to load existing bookings");
            ValidationError::AvailabilityUnknown(format!("{e:#}"))
        })
    }

    async fn transition(&self, id: &str, to: BookingStatus) -> Result<Booking, AppError> {
        let mut booking = self.get_booking(id).await?;
        if !booking.is_active() {
            return Err(AppError::InvalidTransition {
                from: booking.status.as_str(),
                to: to.as_str(),
            });
        }

        booking.status = to;
        booking.updated_at = self.clock.now();
        self.persist_update(&booking).await?;

        tracing::info!(booking_id = %booking.id, status = to.as_str(), "booking status changed");
        Ok(booking)
    }

    async fn persist_update(&self, booking: &Booking) -> Result<(), AppError> {
        let updated = self.store.update(booking).await.map_err(AppError::Storage)?;
        if !updated {
            return Err(AppError::NotFound(format!("booking {}", booking.id)));
        }
        Ok(())
    }
}
