use std::sync::Arc;

use crate::errors::{AppError, ValidationError};
use crate::models::user::card_brand;
use crate::models::{PaymentDetails, PaymentMethod, ProfileUpdate, SavedPaymentMethod, UserProfile};
use crate::services::clock::Clock;
use crate::services::scheduling::{present, required, validate_payment};
use crate::services::store::UserStore;
use crate::services::validation::{card_digits, is_valid_email, is_valid_name, is_valid_phone};

/// Fields that are present must be well formed. A blank phone clears it.
pub fn validate_profile_update(update: &ProfileUpdate) -> Result<(), ValidationError> {
    if let Some(email) = present(update.email.as_deref()) {
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidContact { field: "email" });
        }
    }
    if let Some(phone) = present(update.phone.as_deref()) {
        if !is_valid_phone(phone) {
            return Err(ValidationError::InvalidContact { field: "phone" });
        }
    }
    if let Some(name) = present(update.name.as_deref()) {
        if !is_valid_name(name) {
            return Err(ValidationError::InvalidContact { field: "name" });
        }
    }
    Ok(())
}

pub struct ProfileService {
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn UserStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn get_profile(&self) -> Result<UserProfile, AppError> {
        self.store
            .get_profile()
            .await
            .map_err(AppError::Storage)?
            .ok_or_else(|| AppError::NotFound("profile".to_string()))
    }

    /// Merges the update into the stored profile. The first update creates
    /// the profile and needs both a name and an email.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, AppError> {
        validate_profile_update(update)?;

        let name = present(update.name.as_deref()).map(|n| n.trim().to_string());
        let email = present(update.email.as_deref()).map(str::to_string);
        let current = self.store.get_profile().await.map_err(AppError::Storage)?;

        let mut profile = match current {
            Some(mut profile) => {
                if let Some(name) = name {
                    profile.name = name;
                }
                if let Some(email) = email {
                    profile.email = email;
                }
                profile
            }
            None => UserProfile {
                name: required(name.as_deref(), "name")?.to_string(),
                email: required(email.as_deref(), "email")?.to_string(),
                phone: None,
                updated_at: self.clock.now(),
            },
        };
        if let Some(phone) = update.phone.as_deref() {
            profile.phone = present(Some(phone)).map(str::to_string);
        }
        profile.updated_at = self.clock.now();

        self.store
            .save_profile(&profile)
            .await
            .map_err(AppError::Storage)?;
        tracing::info!("profile updated");
        Ok(profile)
    }

    pub async fn payment_methods(&self) -> Result<Vec<SavedPaymentMethod>, AppError> {
        self.store
            .list_payment_methods()
            .await
            .map_err(AppError::Storage)
    }

    /// Validates the details and keeps only what is safe to store. The first
    /// method added becomes the default.
    pub async fn add_payment_method(
        &self,
        details: &PaymentDetails,
    ) -> Result<SavedPaymentMethod, AppError> {
        let method = validate_payment(details)?;

        let (brand, last4) = match (method, details.card_number.as_deref()) {
            (PaymentMethod::Card, Some(number)) => {
                let digits = card_digits(number);
                let last4 = digits[digits.len().saturating_sub(4)..].to_string();
                (card_brand(&digits).map(str::to_string), Some(last4))
            }
            _ => (None, None),
        };
        let is_default = self.payment_methods().await?.is_empty();

        let saved = SavedPaymentMethod {
            id: uuid::Uuid::new_v4().to_string(),
            method,
            brand,
            last4,
            is_default,
            created_at: self.clock.now(),
        };
        self.store
            .add_payment_method(&saved)
            .await
            .map_err(AppError::Storage)?;

        tracing::info!(
            payment_method_id = %saved.id,
            method = saved.method.as_str(),
            "payment method added"
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    use crate::services::clock::FixedClock;
    use crate::services::store::memory::InMemoryUserStore;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-06-10 08:00", "%Y-%m-%d %H:%M").unwrap()
    }

    fn service() -> ProfileService {
        ProfileService::new(Arc::new(InMemoryUserStore::new()), Arc::new(FixedClock(now())))
    }

    fn update(name: Option<&str>, email: Option<&str>, phone: Option<&str>) -> ProfileUpdate {
        ProfileUpdate {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_profile_update() {
        assert!(validate_profile_update(&ProfileUpdate::default()).is_ok());
        assert_eq!(
            validate_profile_update(&update(None, Some("ana@nowhere"), None)).unwrap_err(),
            ValidationError::InvalidContact { field: "email" }
        );
        assert_eq!(
            validate_profile_update(&update(None, None, Some("123"))).unwrap_err(),
            ValidationError::InvalidContact { field: "phone" }
        );
        assert_eq!(
            validate_profile_update(&update(Some("A"), None, None)).unwrap_err(),
            ValidationError::InvalidContact { field: "name" }
        );
        // blank phone clears the number
        assert!(validate_profile_update(&update(None, None, Some(""))).is_ok());
    }

    #[tokio::test]
    async fn test_first_update_creates_profile() {
        let svc = service();
        assert!(matches!(svc.get_profile().await.unwrap_err(), AppError::NotFound(_)));

        let err = svc
            .update_profile(&update(Some("Ana Torres"), None, None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::MissingField { field: "email" })
        ));

        let profile = svc
            .update_profile(&update(Some(" Ana Torres "), Some("ana@example.com"), None))
            .await
            .unwrap();
        assert_eq!(profile.name, "Ana Torres");
        assert_eq!(profile.updated_at, now());
        assert_eq!(svc.get_profile().await.unwrap(), profile);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let svc = service();
        svc.update_profile(&update(
            Some("Ana Torres"),
            Some("ana@example.com"),
            Some("+525512345678"),
        ))
        .await
        .unwrap();

        let profile = svc
            .update_profile(&update(None, Some("ana@torres.mx"), None))
            .await
            .unwrap();
        assert_eq!(profile.name, "Ana Torres");
        assert_eq!(profile.email, "ana@torres.mx");
        assert_eq!(profile.phone.as_deref(), Some("+525512345678"));

        let profile = svc.update_profile(&update(None, None, Some(""))).await.unwrap();
        assert_eq!(profile.phone, None);
    }

    #[tokio::test]
    async fn test_add_card_keeps_only_last_digits() {
        let svc = service();
        let saved = svc
            .add_payment_method(&PaymentDetails::card("4532 0151 1283 0366", "12/27", "123"))
            .await
            .unwrap();
        assert_eq!(saved.method, PaymentMethod::Card);
        assert_eq!(saved.brand.as_deref(), Some("Visa"));
        assert_eq!(saved.last4.as_deref(), Some("0366"));
        assert!(saved.is_default);

        let cash = svc.add_payment_method(&PaymentDetails::cash()).await.unwrap();
        assert!(!cash.is_default);
        assert_eq!(cash.last4, None);

        let methods = svc.payment_methods().await.unwrap();
        assert_eq!(methods, vec![saved, cash]);
    }

    #[tokio::test]
    async fn test_add_invalid_card_rejected() {
        let svc = service();
        let err = svc
            .add_payment_method(&PaymentDetails::card("4532015112830367", "12/27", "123"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidPayment(_))
        ));

        let err = svc
            .add_payment_method(&PaymentDetails::card("4532015112830366", "", "123"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::InvalidPayment("incomplete card details"))
        ));
        assert!(svc.payment_methods().await.unwrap().is_empty());
    }
}
