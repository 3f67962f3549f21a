//! Voucher Model

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Days before expiry at which an unused voucher is shown as expiring
pub const EXPIRING_THRESHOLD_DAYS: i64 = 3;
/// Default number of paid extensions an order-reward voucher allows
pub const DEFAULT_MAX_EXTENSIONS: u32 = 1;
/// Default number of days one extension adds
pub const DEFAULT_EXTENSION_DAYS: u32 = 90;

/// How the discount value is interpreted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the order value
    Percent,
    /// `discount_value` is a fixed currency amount
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percent => "percent",
            Self::Fixed => "fixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "percent" => Some(Self::Percent),
            "fixed" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Process that issued the voucher
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VoucherSource {
    Package,
    OrderReward,
    Campaign,
    Manual,
    Other,
}

impl VoucherSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::OrderReward => "order_reward",
            Self::Campaign => "campaign",
            Self::Manual => "manual",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "package" => Some(Self::Package),
            "order_reward" => Some(Self::OrderReward),
            "campaign" => Some(Self::Campaign),
            "manual" => Some(Self::Manual),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Temporal status of a voucher (derived, never stored)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VoucherStatus {
    Available,
    Expiring,
    Used,
    Expired,
}

impl VoucherStatus {
    /// Display rank inside a voucher group
    pub fn rank(&self) -> u8 {
        match self {
            Self::Available => 0,
            Self::Expiring => 1,
            Self::Expired => 2,
            Self::Used => 3,
        }
    }
}

/// Membership filter for voucher listings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VoucherFilter {
    #[default]
    All,
    /// Available and expiring vouchers
    Available,
    Used,
    Expired,
}

impl VoucherFilter {
    pub fn admits(&self, status: VoucherStatus) -> bool {
        match self {
            Self::All => true,
            Self::Available => matches!(status, VoucherStatus::Available | VoucherStatus::Expiring),
            Self::Used => status == VoucherStatus::Used,
            Self::Expired => status == VoucherStatus::Expired,
        }
    }
}

fn default_max_extensions() -> u32 {
    DEFAULT_MAX_EXTENSIONS
}

fn default_extension_days() -> u32 {
    DEFAULT_EXTENSION_DAYS
}

/// Voucher entity
///
/// Timestamps are Unix millis. Amounts are whole currency units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Voucher {
    pub id: i64,
    /// Unique, compared case-insensitively
    pub code: String,
    /// Customer the voucher was issued to
    pub owner_id: Option<i64>,
    pub discount_type: DiscountType,
    /// Percentage (percent type) or amount (fixed type)
    pub discount_value: f64,
    /// Cap on the computed discount, percent type only
    pub max_discount: Option<i64>,
    pub min_order_value: i64,
    pub expires_at: i64,
    pub is_used: bool,
    pub used_at: Option<i64>,
    pub source: VoucherSource,
    #[serde(default)]
    pub extension_count: u32,
    #[serde(default = "default_max_extensions")]
    pub max_extensions: u32,
    #[serde(default)]
    pub extension_fee: i64,
    #[serde(default = "default_extension_days")]
    pub extension_days: u32,
    /// Running total of extension fees charged
    #[serde(default)]
    pub extension_fees_paid: i64,
    /// Payment reference of the latest extension
    #[serde(default)]
    pub last_extension_ref: Option<String>,
    pub created_at: i64,
}

/// Create voucher payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherCreate {
    pub code: String,
    pub owner_id: Option<i64>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub max_discount: Option<i64>,
    #[serde(default)]
    pub min_order_value: i64,
    pub expires_at: i64,
    pub source: VoucherSource,
    #[serde(default = "default_max_extensions")]
    pub max_extensions: u32,
    #[serde(default)]
    pub extension_fee: i64,
    #[serde(default = "default_extension_days")]
    pub extension_days: u32,
}

impl VoucherCreate {
    /// Build the stored record for a freshly issued voucher
    pub fn into_voucher(self, id: i64, created_at: i64) -> Voucher {
        Voucher {
            id,
            code: self.code.trim().to_string(),
            owner_id: self.owner_id,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            max_discount: self.max_discount,
            min_order_value: self.min_order_value,
            expires_at: self.expires_at,
            is_used: false,
            used_at: None,
            source: self.source,
            extension_count: 0,
            max_extensions: self.max_extensions,
            extension_fee: self.extension_fee,
            extension_days: self.extension_days,
            extension_fees_paid: 0,
            last_extension_ref: None,
            created_at,
        }
    }
}

/// Why a voucher cannot be applied to an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VoucherRejection {
    NotFound,
    AlreadyUsed,
    Expired,
    MinOrderNotMet,
}

impl VoucherRejection {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotFound => ErrorCode::VoucherNotFound,
            Self::AlreadyUsed => ErrorCode::VoucherAlreadyUsed,
            Self::Expired => ErrorCode::VoucherExpired,
            Self::MinOrderNotMet => ErrorCode::VoucherMinOrderNotMet,
        }
    }
}

/// Result of pricing a voucher against an order (preview, no side effects)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoucherQuote {
    pub valid: bool,
    pub discount_amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<VoucherRejection>,
}

impl VoucherQuote {
    pub fn accepted(discount_amount: i64) -> Self {
        Self {
            valid: true,
            discount_amount,
            reason: None,
        }
    }

    pub fn rejected(reason: VoucherRejection) -> Self {
        Self {
            valid: false,
            discount_amount: 0,
            reason: Some(reason),
        }
    }
}

/// Result of redeeming a voucher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedeemOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_at: Option<i64>,
}

/// Result of extending a voucher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtendOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorCode>,
}

/// Voucher as shown in a customer listing (code masked)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherView {
    pub id: i64,
    pub masked_code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub max_discount: Option<i64>,
    pub min_order_value: i64,
    pub expires_at: i64,
    pub status: VoucherStatus,
    pub days_remaining: i64,
    pub can_extend: bool,
    pub extension_fee: i64,
}

/// One source group of a customer listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherGroupView {
    pub source: VoucherSource,
    pub vouchers: Vec<VoucherView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rank_order() {
        assert!(VoucherStatus::Available.rank() < VoucherStatus::Expiring.rank());
        assert!(VoucherStatus::Expiring.rank() < VoucherStatus::Expired.rank());
        assert!(VoucherStatus::Expired.rank() < VoucherStatus::Used.rank());
    }

    #[test]
    fn test_available_filter_includes_expiring() {
        assert!(VoucherFilter::Available.admits(VoucherStatus::Expiring));
        assert!(!VoucherFilter::Available.admits(VoucherStatus::Expired));
        assert!(VoucherFilter::All.admits(VoucherStatus::Used));
    }

    #[test]
    fn test_extension_defaults_applied_on_deserialize() {
        let json = r#"{
            "id": 1, "code": "ABC", "owner_id": null, "discount_type": "percent",
            "discount_value": 10.0, "max_discount": null, "min_order_value": 0,
            "expires_at": 0, "is_used": false, "used_at": null,
            "source": "order_reward", "created_at": 0
        }"#;
        let v: Voucher = serde_json::from_str(json).unwrap();
        assert_eq!(v.max_extensions, DEFAULT_MAX_EXTENSIONS);
        assert_eq!(v.extension_days, DEFAULT_EXTENSION_DAYS);
        assert_eq!(v.extension_count, 0);
    }

    #[test]
    fn test_source_string_mapping() {
        for s in [
            VoucherSource::Package,
            VoucherSource::OrderReward,
            VoucherSource::Campaign,
            VoucherSource::Manual,
            VoucherSource::Other,
        ] {
            assert_eq!(VoucherSource::parse(s.as_str()), Some(s));
        }
        assert_eq!(VoucherSource::parse("ORDER_REWARD"), None);
    }
}
