//! Wire types for the lottery backend
//!
//! Field names mirror the backend's JSON (camelCase).

use crate::encoder::ImagePayload;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entry stake per round, in euros
pub const ENTRY_STAKE_EUR: f64 = 10.0;

/// Operator fee withheld from the prize pool
pub const OPERATOR_FEE: f64 = 0.20;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub logged_in: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    pub verified: bool,
}

/// Transient upload body; exists only for the duration of one submission
/// call and is never persisted client-side. The backend expects both fields
/// present for a successful verification, but absent inputs are sent as
/// null and left for the backend to reject.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSubmission {
    pub id_front_image: Option<ImagePayload>,
    pub person_image: Option<ImagePayload>,
}

impl VerificationSubmission {
    pub fn new(id_front: Option<&[u8]>, person: Option<&[u8]>) -> Self {
        Self {
            id_front_image: crate::encoder::encode_optional(id_front),
            person_image: crate::encoder::encode_optional(person),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.id_front_image.is_some() && self.person_image.is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanStatus {
    pub banned: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub paid: bool,
}

/// Payment methods offered for the entry stake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "PayPal")]
    PayPal,
    #[serde(rename = "Google Pay")]
    GooglePay,
    #[serde(rename = "Apple Pay")]
    ApplePay,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CreditCard,
        PaymentMethod::PayPal,
        PaymentMethod::GooglePay,
        PaymentMethod::ApplePay,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::GooglePay => "Google Pay",
            PaymentMethod::ApplePay => "Apple Pay",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], " ").as_str() {
            "credit card" | "creditcard" | "card" => Ok(PaymentMethod::CreditCard),
            "paypal" => Ok(PaymentMethod::PayPal),
            "google pay" | "googlepay" => Ok(PaymentMethod::GooglePay),
            "apple pay" | "applepay" => Ok(PaymentMethod::ApplePay),
            other => Err(format!("Unknown payment method: {}", other)),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentReceipt {
    pub message: String,
}

/// Current round of the lottery: its prize pool and end time.
/// Read-only display data, fetched independently of the eligibility gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundInfo {
    pub prize_pool: f64,
    /// Epoch milliseconds, as the backend sends it
    #[serde(rename = "endDate")]
    pub ends_at: i64,
}

impl RoundInfo {
    /// Advertised jackpot: the pool minus the 20% operator fee
    pub fn jackpot(&self) -> f64 {
        self.prize_pool * (1.0 - OPERATOR_FEE)
    }

    /// "1 in N" winning odds, assuming every entry paid the fixed stake
    pub fn odds(&self) -> u64 {
        (self.prize_pool / ENTRY_STAKE_EUR).round() as u64
    }

    pub fn ends_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.ends_at).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let status: AuthStatus = serde_json::from_str(r#"{"loggedIn":true}"#).unwrap();
        assert!(status.logged_in);

        let login: LoginResponse = serde_json::from_str(r#"{"sessionId":"s-1"}"#).unwrap();
        assert_eq!(login.session_id, "s-1");

        let info: RoundInfo =
            serde_json::from_str(r#"{"prizePool":2500.0,"endDate":1735689600000}"#).unwrap();
        assert_eq!(info.prize_pool, 2500.0);
    }

    #[test]
    fn test_payment_method_wire_names() {
        let body = serde_json::to_string(&PaymentRequest {
            payment_method: PaymentMethod::GooglePay,
        })
        .unwrap();
        assert_eq!(body, r#"{"paymentMethod":"Google Pay"}"#);
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!(
            "credit-card".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::CreditCard
        );
        assert_eq!(
            "PayPal".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::PayPal
        );
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_round_info_derived_figures() {
        let info = RoundInfo {
            prize_pool: 2500.0,
            ends_at: 1735689600000,
        };

        assert_eq!(info.jackpot(), 2000.0);
        assert_eq!(info.odds(), 250);
        assert!(info.ends_at_utc().is_some());
    }

    #[test]
    fn test_verification_submission_wire_shape() {
        let submission = VerificationSubmission::new(Some(b"front".as_slice()), None);
        let json = serde_json::to_string(&submission).unwrap();

        assert!(json.contains("\"idFrontImage\":\"ZnJvbnQ=\""));
        assert!(json.contains("\"personImage\":null"));
        assert!(!submission.is_complete());
    }
}
