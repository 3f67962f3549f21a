//! Commission tier catalog
//!
//! A [`TierCatalog`] is always valid: it holds exactly one default tier, the
//! default is active, and ids are unique. Edits build a candidate catalog and
//! validate it, so a rejected edit never leaves a half-applied state.

use std::collections::HashSet;
use std::path::Path;

use shared::error::{AppError, ErrorCode};
use shared::models::{CommissionTier, CommissionTierUpdate};
use thiserror::Error;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog has no default tier")]
    NoDefault,

    #[error("catalog has more than one default tier: {0:?}")]
    MultipleDefaults(Vec<String>),

    #[error("default tier '{0}' must be active")]
    DefaultInactive(String),

    #[error("tier id '{0}' already exists")]
    DuplicateId(String),

    #[error("tier id must not be empty")]
    EmptyId,

    #[error("tier '{0}' not found")]
    NotFound(String),

    #[error("tier '{0}' is the default tier; assign another default first")]
    DefaultRequired(String),

    #[error("failed to read tier catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tier catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let code = match &err {
            CatalogError::NotFound(_) => ErrorCode::TierNotFound,
            CatalogError::DuplicateId(_) => ErrorCode::TierIdExists,
            CatalogError::DefaultRequired(_) => ErrorCode::DefaultTierRequired,
            CatalogError::EmptyId => ErrorCode::ValidationFailed,
            _ => ErrorCode::TierCatalogInvalid,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Validated, ordered set of commission tiers
#[derive(Debug, Clone)]
pub struct TierCatalog {
    tiers: Vec<CommissionTier>,
    default_index: usize,
}

impl TierCatalog {
    /// Validate tiers and build a catalog
    pub fn load(tiers: Vec<CommissionTier>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for tier in &tiers {
            if tier.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(tier.id.as_str()) {
                return Err(CatalogError::DuplicateId(tier.id.clone()));
            }
        }

        let defaults: Vec<usize> = tiers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_default)
            .map(|(i, _)| i)
            .collect();
        let default_index = match defaults.as_slice() {
            [] => return Err(CatalogError::NoDefault),
            [only] => *only,
            many => {
                return Err(CatalogError::MultipleDefaults(
                    many.iter().map(|&i| tiers[i].id.clone()).collect(),
                ));
            }
        };
        if !tiers[default_index].is_active {
            return Err(CatalogError::DefaultInactive(tiers[default_index].id.clone()));
        }

        Ok(Self {
            tiers,
            default_index,
        })
    }

    /// Read a JSON tier list from disk and validate it
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let tiers: Vec<CommissionTier> = serde_json::from_str(&raw)?;
        Self::load(tiers)
    }

    /// Single default tier with no requirements
    pub fn builtin() -> Self {
        Self {
            tiers: vec![CommissionTier {
                id: "standard".to_string(),
                name: "Standard".to_string(),
                order: 0,
                requirements: Default::default(),
                commission_rates: Default::default(),
                benefits: Default::default(),
                is_active: true,
                is_default: true,
            }],
            default_index: 0,
        }
    }

    pub fn tiers(&self) -> &[CommissionTier] {
        &self.tiers
    }

    pub fn default_tier(&self) -> &CommissionTier {
        &self.tiers[self.default_index]
    }

    pub fn get(&self, id: &str) -> Option<&CommissionTier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    /// Active tiers, highest `order` first
    pub fn active_descending(&self) -> Vec<&CommissionTier> {
        let mut active: Vec<&CommissionTier> = self.tiers.iter().filter(|t| t.is_active).collect();
        active.sort_by(|a, b| b.order.cmp(&a.order));
        active
    }

    fn position(&self, id: &str) -> Result<usize, CatalogError> {
        self.tiers
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Candidate catalog with `tier` added
    ///
    /// A new default takes the flag from the current one.
    pub fn with_created(&self, tier: CommissionTier) -> Result<Self, CatalogError> {
        if self.get(&tier.id).is_some() {
            return Err(CatalogError::DuplicateId(tier.id));
        }
        let mut tiers = self.tiers.clone();
        if tier.is_default {
            tiers.iter_mut().for_each(|t| t.is_default = false);
        }
        tiers.push(tier);
        Self::load(tiers)
    }

    /// Candidate catalog with one tier updated
    ///
    /// The current default cannot be deactivated or un-defaulted; setting
    /// `is_default` on another tier moves the flag.
    pub fn with_updated(&self, id: &str, update: CommissionTierUpdate) -> Result<Self, CatalogError> {
        let index = self.position(id)?;
        let current = &self.tiers[index];
        if current.is_default
            && (update.is_default == Some(false) || update.is_active == Some(false))
        {
            return Err(CatalogError::DefaultRequired(id.to_string()));
        }

        let mut tiers = self.tiers.clone();
        if update.is_default == Some(true) {
            tiers.iter_mut().for_each(|t| t.is_default = false);
        }
        update.apply_to(&mut tiers[index]);
        Self::load(tiers)
    }

    /// Candidate catalog without tier `id`
    pub fn with_deleted(&self, id: &str) -> Result<Self, CatalogError> {
        let index = self.position(id)?;
        if self.tiers[index].is_default {
            return Err(CatalogError::DefaultRequired(id.to_string()));
        }
        let mut tiers = self.tiers.clone();
        tiers.remove(index);
        Self::load(tiers)
    }
}
