//! Commission Transaction Model

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Kind of commission accrued
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CommissionType {
    DirectSale,
    TeamSaleL1,
    TeamSaleL2,
    Bonus,
    KpiBonus,
    MonthlyBonus,
}

impl CommissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectSale => "direct_sale",
            Self::TeamSaleL1 => "team_sale_l1",
            Self::TeamSaleL2 => "team_sale_l2",
            Self::Bonus => "bonus",
            Self::KpiBonus => "kpi_bonus",
            Self::MonthlyBonus => "monthly_bonus",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct_sale" => Some(Self::DirectSale),
            "team_sale_l1" => Some(Self::TeamSaleL1),
            "team_sale_l2" => Some(Self::TeamSaleL2),
            "bonus" => Some(Self::Bonus),
            "kpi_bonus" => Some(Self::KpiBonus),
            "monthly_bonus" => Some(Self::MonthlyBonus),
            _ => None,
        }
    }
}

/// Workflow status of a commission transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Paid,
    Cancelled,
    Rejected,
}

impl TransactionStatus {
    /// Paid, rejected and cancelled admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled | Self::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "paid" => Some(Self::Paid),
            "cancelled" => Some(Self::Cancelled),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commission transaction entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommissionTransaction {
    pub id: i64,
    pub user_id: i64,
    pub commission_type: CommissionType,
    pub commission_rate: f64,
    pub commission_amount: f64,
    pub order_id: Option<i64>,
    pub status: TransactionStatus,
    pub period_year: i32,
    pub period_month: u32,
    pub approved_by_name: Option<String>,
    pub approved_at: Option<i64>,
    pub paid_at: Option<i64>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Record commission accrual payload; new records start `pending`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommissionTransactionCreate {
    pub user_id: i64,
    pub commission_type: CommissionType,
    #[serde(default)]
    pub commission_rate: f64,
    pub commission_amount: f64,
    #[serde(default)]
    pub order_id: Option<i64>,
    pub period_year: i32,
    pub period_month: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CommissionTransactionCreate {
    pub fn into_transaction(self, id: i64, now: i64) -> CommissionTransaction {
        CommissionTransaction {
            id,
            user_id: self.user_id,
            commission_type: self.commission_type,
            commission_rate: self.commission_rate,
            commission_amount: self.commission_amount,
            order_id: self.order_id,
            status: TransactionStatus::Pending,
            period_year: self.period_year,
            period_month: self.period_month,
            approved_by_name: None,
            approved_at: None,
            paid_at: None,
            payment_method: None,
            payment_reference: None,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Listing filter, all fields optional
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionFilter {
    pub user_id: Option<i64>,
    pub period_year: Option<i32>,
    pub period_month: Option<u32>,
    pub status: Option<TransactionStatus>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &CommissionTransaction) -> bool {
        self.user_id.is_none_or(|u| u == tx.user_id)
            && self.period_year.is_none_or(|y| y == tx.period_year)
            && self.period_month.is_none_or(|m| m == tx.period_month)
            && self.status.is_none_or(|s| s == tx.status)
    }
}

/// Admin action driving a transition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransitionAction {
    Approve,
    Reject,
    Pay,
    Cancel,
}

impl TransitionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Pay => "pay",
            Self::Cancel => "cancel",
        }
    }
}

/// Audit data carried by a transition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TransitionPayload {
    /// Approver display name (approve)
    pub approved_by_name: Option<String>,
    /// Payment method (pay)
    pub payment_method: Option<String>,
    /// Payment reference (pay, required)
    pub payment_reference: Option<String>,
    /// Reason (reject, cancel)
    pub reason: Option<String>,
}

/// Per-id failure in a bulk transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkFailure {
    pub id: i64,
    pub reason: ErrorCode,
    pub message: String,
}

/// Amounts moved into each outcome by one bulk call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BulkTotals {
    pub approved_amount: f64,
    pub paid_amount: f64,
    pub rejected_amount: f64,
    pub cancelled_amount: f64,
}

/// Result of a bulk transition
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BulkTransitionResult {
    pub succeeded: Vec<i64>,
    pub failed: Vec<BulkFailure>,
    pub totals: BulkTotals,
}

/// Sum and count of transactions in one status bucket
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct StatBucket {
    pub total: f64,
    pub count: u64,
}

/// Aggregate statistics by status; `cancelled` also counts rejected
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CommissionStats {
    pub pending: StatBucket,
    pub approved: StatBucket,
    pub paid: StatBucket,
    pub cancelled: StatBucket,
}
