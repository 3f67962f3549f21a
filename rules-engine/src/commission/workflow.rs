//! Commission transaction state machine
//!
//! ```text
//! pending  --approve-->          approved
//! pending  --reject(reason)-->   rejected*
//! approved --pay(payment)-->     paid*
//! pending|approved --cancel(reason)--> cancelled*
//! ```
//!
//! Terminal states (*) admit no transition. [`apply_transition`] plans the
//! post-state; the service persists it with a conditional update keyed on
//! the pre-status.

use std::collections::HashSet;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    BulkFailure, BulkTotals, BulkTransitionResult, CommissionTransaction, TransactionStatus,
    TransitionAction, TransitionPayload,
};
use thiserror::Error;

use crate::money::sum_amounts;

/// Transition errors
#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("transaction {0} not found")]
    NotFound(i64),

    #[error("transaction {id} is already {status}")]
    AlreadyTerminal { id: i64, status: TransactionStatus },

    #[error("cannot {} transaction {id} from {from}", .action.as_str())]
    InvalidTransition {
        id: i64,
        from: TransactionStatus,
        action: TransitionAction,
    },

    #[error("pay requires a non-empty payment reference")]
    MissingPaymentReference,

    #[error("bulk request has no transaction ids")]
    EmptyBatch,

    #[error("transaction {0} appears more than once in the batch")]
    DuplicateInBatch(i64),

    #[error("store failure: {0}")]
    Store(String),
}

impl TransitionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::TransactionNotFound,
            Self::AlreadyTerminal { .. } => ErrorCode::TransactionAlreadyTerminal,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::MissingPaymentReference => ErrorCode::RequiredField,
            Self::EmptyBatch => ErrorCode::BulkPreconditionFailed,
            Self::DuplicateInBatch(_) => ErrorCode::InvalidRequest,
            Self::Store(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        let app = AppError::with_message(err.code(), err.to_string());
        match err {
            TransitionError::NotFound(id) | TransitionError::DuplicateInBatch(id) => {
                app.with_detail("transaction_id", id)
            }
            TransitionError::AlreadyTerminal { id, status } => app
                .with_detail("transaction_id", id)
                .with_detail("status", status.as_str()),
            TransitionError::InvalidTransition { id, from, action } => app
                .with_detail("transaction_id", id)
                .with_detail("from", from.as_str())
                .with_detail("action", action.as_str()),
            _ => app,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Payment reference from a payload, if present and non-blank
pub fn payment_reference(payload: &TransitionPayload) -> Option<String> {
    non_empty(payload.payment_reference.as_deref())
}

/// Status an action moves to from `from`, if the edge exists
pub fn next_status(from: TransactionStatus, action: TransitionAction) -> Option<TransactionStatus> {
    use TransactionStatus::*;
    use TransitionAction::*;
    match (from, action) {
        (Pending, Approve) => Some(Approved),
        (Pending, Reject) => Some(Rejected),
        (Approved, Pay) => Some(Paid),
        (Pending | Approved, Cancel) => Some(Cancelled),
        _ => None,
    }
}

/// Plan one transition at `now`, recording its audit fields
pub fn apply_transition(
    tx: &CommissionTransaction,
    action: TransitionAction,
    payload: &TransitionPayload,
    now: i64,
) -> Result<CommissionTransaction, TransitionError> {
    if tx.status.is_terminal() {
        return Err(TransitionError::AlreadyTerminal {
            id: tx.id,
            status: tx.status,
        });
    }
    let to = next_status(tx.status, action).ok_or(TransitionError::InvalidTransition {
        id: tx.id,
        from: tx.status,
        action,
    })?;

    let mut next = tx.clone();
    match action {
        TransitionAction::Approve => {
            next.approved_by_name = non_empty(payload.approved_by_name.as_deref());
            next.approved_at = Some(now);
        }
        TransitionAction::Pay => {
            let reference = payment_reference(payload).ok_or(TransitionError::MissingPaymentReference)?;
            next.paid_at = Some(now);
            next.payment_method = non_empty(payload.payment_method.as_deref());
            next.payment_reference = Some(reference);
        }
        TransitionAction::Reject | TransitionAction::Cancel => {
            next.notes = Some(payload.reason.as_deref().unwrap_or_default().trim().to_string());
        }
    }
    next.status = to;
    next.updated_at = now;
    Ok(next)
}

/// Batch-level checks run before any record is touched
pub fn check_bulk_preconditions(
    ids: &[i64],
    action: TransitionAction,
    payload: &TransitionPayload,
) -> Result<(), AppError> {
    if ids.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::BulkPreconditionFailed,
            TransitionError::EmptyBatch.to_string(),
        ));
    }
    if action == TransitionAction::Pay && payment_reference(payload).is_none() {
        return Err(AppError::with_message(
            ErrorCode::BulkPreconditionFailed,
            TransitionError::MissingPaymentReference.to_string(),
        ));
    }
    Ok(())
}

/// Accumulates per-id outcomes of one bulk transition
#[derive(Debug, Default)]
pub struct BulkOutcome {
    seen: HashSet<i64>,
    succeeded: Vec<i64>,
    failed: Vec<BulkFailure>,
    approved: Vec<f64>,
    paid: Vec<f64>,
    rejected: Vec<f64>,
    cancelled: Vec<f64>,
}

impl BulkOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim an id for processing; a repeated id is recorded as failed
    pub fn claim(&mut self, id: i64) -> bool {
        if self.seen.insert(id) {
            return true;
        }
        self.fail(id, TransitionError::DuplicateInBatch(id));
        false
    }

    pub fn succeed(&mut self, tx: &CommissionTransaction) {
        self.succeeded.push(tx.id);
        let bucket = match tx.status {
            TransactionStatus::Approved => &mut self.approved,
            TransactionStatus::Paid => &mut self.paid,
            TransactionStatus::Rejected => &mut self.rejected,
            TransactionStatus::Cancelled => &mut self.cancelled,
            TransactionStatus::Pending => return,
        };
        bucket.push(tx.commission_amount);
    }

    pub fn fail(&mut self, id: i64, err: TransitionError) {
        self.failed.push(BulkFailure {
            id,
            reason: err.code(),
            message: err.to_string(),
        });
    }

    pub fn finish(self) -> BulkTransitionResult {
        BulkTransitionResult {
            succeeded: self.succeeded,
            failed: self.failed,
            totals: BulkTotals {
                approved_amount: sum_amounts(self.approved),
                paid_amount: sum_amounts(self.paid),
                rejected_amount: sum_amounts(self.rejected),
                cancelled_amount: sum_amounts(self.cancelled),
            },
        }
    }
}
