//! Server-side license records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Redemption state of a license code. `Used` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseStatus {
    Unused,
    Used,
}

impl LicenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseStatus::Unused => "UNUSED",
            LicenseStatus::Used => "USED",
        }
    }
}

impl std::fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LicenseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNUSED" => Ok(LicenseStatus::Unused),
            "USED" => Ok(LicenseStatus::Used),
            other => Err(format!("unknown license status: {}", other)),
        }
    }
}

/// A pre-provisioned license code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub id: i64,
    pub code: String,
    pub status: LicenseStatus,
    pub activated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl LicenseRecord {
    /// A fresh, never-redeemed record
    pub fn unused(id: i64, code: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            status: LicenseStatus::Unused,
            activated_at: None,
            expires_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [LicenseStatus::Unused, LicenseStatus::Used] {
            assert_eq!(status.as_str().parse::<LicenseStatus>().unwrap(), status);
        }
        assert!("used".parse::<LicenseStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&LicenseStatus::Unused).unwrap(),
            "\"UNUSED\""
        );
    }
}
