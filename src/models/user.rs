use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::PaymentMethod;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Partial profile update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A payment method kept on file. Only the brand and the last four digits of
/// a card are stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedPaymentMethod {
    pub id: String,
    pub method: PaymentMethod,
    pub brand: Option<String>,
    pub last4: Option<String>,
    pub is_default: bool,
    pub created_at: NaiveDateTime,
}

/// Card network guessed from the leading digits.
pub fn card_brand(digits: &str) -> Option<&'static str> {
    let prefix2: u32 = digits.get(..2)?.parse().ok()?;
    match prefix2 {
        40..=49 => Some("Visa"),
        51..=55 | 22..=27 => Some("Mastercard"),
        34 | 37 => Some("American Express"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_brand() {
        assert_eq!(card_brand("4532015112830366"), Some("Visa"));
        assert_eq!(card_brand("5555555555554444"), Some("Mastercard"));
        assert_eq!(card_brand("378282246310005"), Some("American Express"));
        assert_eq!(card_brand("6011111111111117"), None);
        assert_eq!(card_brand("4"), None);
    }

    #[test]
    fn test_saved_method_never_serializes_card_number() {
        let method = SavedPaymentMethod {
            id: "pm-1".to_string(),
            method: PaymentMethod::Card,
            brand: Some("Visa".to_string()),
            last4: Some("0366".to_string()),
            is_default: true,
            created_at: NaiveDateTime::default(),
        };
        let json = serde_json::to_value(&method).unwrap();
        assert_eq!(json["last4"], "0366");
        assert!(json.get("card_number").is_none());
    }
}
