//! License redemption transaction
//!
//! `UNUSED --redeem(code)--> USED`. The only concurrency safeguard is the
//! store's conditional write: two racing redemptions of one code can both
//! pass the status check, but only one of them wins the write.

use chrono::{DateTime, Months, Utc};
use thiserror::Error;

use crate::record::LicenseStatus;
use crate::store::LicenseStore;

/// How long a redeemed license stays valid
const LICENSE_TERM: Months = Months::new(12);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedemptionError {
    /// Unknown code, or the lookup itself failed
    #[error("Invalid activation code")]
    NotFound,

    #[error("This activation code has already been used")]
    Conflict,

    #[error("Failed to process activation request: {0}")]
    Internal(String),
}

/// A successful redemption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redemption {
    pub activated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Same month and day next year. Feb 29 clamps to Feb 28.
pub fn one_year_after(now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    now.checked_add_months(LICENSE_TERM)
}

/// Redeem `code` (already trimmed by the caller) at time `now`
pub async fn redeem<S: LicenseStore>(
    store: &S,
    code: &str,
    now: DateTime<Utc>,
) -> Result<Redemption, RedemptionError> {
    let record = match store.find_by_code(code).await {
        Ok(Some(record)) => record,
        Ok(None) => return Err(RedemptionError::NotFound),
        Err(e) => {
            tracing::warn!("license lookup failed: {}", e);
            return Err(RedemptionError::NotFound);
        }
    };

    if record.status == LicenseStatus::Used {
        return Err(RedemptionError::Conflict);
    }

    let expires_at = one_year_after(now)
        .ok_or_else(|| RedemptionError::Internal("expiry date out of range".into()))?;

    match store.mark_used_if_unused(record.id, now, expires_at).await {
        Ok(true) => {
            tracing::info!("license {} redeemed, expires {}", record.id, expires_at);
            Ok(Redemption {
                activated_at: now,
                expires_at,
            })
        }
        Ok(false) => {
            tracing::info!("license {} lost a concurrent redemption", record.id);
            Err(RedemptionError::Conflict)
        }
        Err(e) => Err(RedemptionError::Internal(e.to_string())),
    }
}
