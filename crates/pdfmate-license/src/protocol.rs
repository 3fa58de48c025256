//! Wire format of the redemption endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Path the redemption endpoint is mounted on
pub const REDEEM_PATH: &str = "/api/redeem";

pub const SUCCESS_MESSAGE: &str = "Activation successful!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemRequest {
    pub code: String,
}

/// 200 response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub success: bool,
    pub expires_at: DateTime<Utc>,
    pub message: String,
}

impl RedeemResponse {
    pub fn activated(expires_at: DateTime<Utc>) -> Self {
        Self {
            success: true,
            expires_at,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Body of every non-200 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
