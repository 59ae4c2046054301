use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::ValidationError;
use crate::models::booking::hhmm;
use crate::models::{Booking, BookingRequest, ContactInfo, PaymentDetails, PaymentMethod, Service};
use crate::services::availability::available_slots;
use crate::services::validation::{
    is_valid_credit_card, is_valid_email, is_valid_name, is_valid_phone, parse_date, parse_time,
};

/// A request whose fields are present and well formed. It has not yet been
/// checked against the catalog or existing bookings.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub service_id: String,
    pub option_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub contact: ContactInfo,
    pub payment_method: PaymentMethod,
}

pub fn validate_request(request: &BookingRequest) -> Result<ValidatedRequest, ValidationError> {
    let service_id = required(request.service_id.as_deref(), "service_id")?;
    let option_id = required(request.option_id.as_deref(), "option_id")?;
    let date_str = required(request.date.as_deref(), "date")?;
    let time_str = required(request.time.as_deref(), "time")?;
    let name = required(request.contact.name.as_deref(), "contact.name")?;
    let email = required(request.contact.email.as_deref(), "contact.email")?;

    let date = date_field(date_str)?;
    let time = time_field(time_str)?;

    if !is_valid_email(email) {
        return Err(ValidationError::InvalidContact { field: "email" });
    }
    if !is_valid_name(name) {
        return Err(ValidationError::InvalidContact { field: "name" });
    }
    let phone = present(request.contact.phone.as_deref());
    if let Some(phone) = phone {
        if !is_valid_phone(phone) {
            return Err(ValidationError::InvalidContact { field: "phone" });
        }
    }

    let payment = request
        .payment
        .as_ref()
        .ok_or(ValidationError::MissingField { field: "payment" })?;
    let payment_method = validate_payment(payment)?;

    Ok(ValidatedRequest {
        service_id: service_id.to_string(),
        option_id: option_id.to_string(),
        date,
        time,
        contact: ContactInfo {
            name: name.trim().to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            notes: present(request.contact.notes.as_deref()).map(str::to_string),
        },
        payment_method,
    })
}

pub fn date_field(s: &str) -> Result<NaiveDate, ValidationError> {
    parse_date(s).ok_or_else(|| {
        ValidationError::InvalidDate(format!("{s:?} is not a YYYY-MM-DD calendar date"))
    })
}

pub fn time_field(s: &str) -> Result<NaiveTime, ValidationError> {
    parse_time(s).ok_or_else(|| ValidationError::InvalidTime(s.to_string()))
}

/// Checks the payment details and returns the chosen method.
pub fn validate_payment(payment: &PaymentDetails) -> Result<PaymentMethod, ValidationError> {
    let method = payment.method.ok_or(ValidationError::MissingField {
        field: "payment.method",
    })?;
    if method != PaymentMethod::Card {
        return Ok(method);
    }

    let (Some(card_number), Some(_), Some(_)) = (
        present(payment.card_number.as_deref()),
        present(payment.expiry_date.as_deref()),
        present(payment.cvv.as_deref()),
    ) else {
        return Err(ValidationError::InvalidPayment("incomplete card details"));
    };

    if !is_valid_credit_card(card_number) {
        return Err(ValidationError::InvalidPayment("invalid card number"));
    }
    Ok(method)
}

/// Checks a well-formed request against its service and the bookings that
/// already occupy it, and builds the booking. Nothing is persisted.
pub fn validate_booking(
    request: ValidatedRequest,
    service: &Service,
    existing: &[Booking],
    now: NaiveDateTime,
) -> Result<Booking, ValidationError> {
    if service.id != request.service_id {
        return Err(ValidationError::UnknownService(request.service_id));
    }
    if service.option(&request.option_id).is_none() {
        return Err(ValidationError::UnknownOption(request.option_id));
    }

    let today = now.date();
    if request.date < today {
        return Err(ValidationError::InvalidDate(format!(
            "{} is in the past",
            request.date
        )));
    }

    let time = request.time.format(hhmm::FORMAT).to_string();
    if !available_slots(service, request.date, today, existing).contains(&time) {
        return Err(ValidationError::SlotUnavailable {
            date: request.date,
            time,
        });
    }

    Ok(Booking {
        id: uuid::Uuid::new_v4().to_string(),
        service_id: request.service_id,
        option_id: request.option_id,
        date: request.date,
        time: request.time,
        status: request.payment_method.initial_status(),
        contact: request.contact,
        payment_method: request.payment_method,
        created_at: now,
        updated_at: now,
    })
}

/// Runs both phases. For callers that already hold the service and the
/// bookings on that date.
pub fn validate(
    request: &BookingRequest,
    service: &Service,
    existing: &[Booking],
    now: NaiveDateTime,
) -> Result<Booking, ValidationError> {
    let validated = validate_request(request)?;
    validate_booking(validated, service, existing, now)
}

pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ValidationError> {
    present(value).ok_or(ValidationError::MissingField { field })
}
