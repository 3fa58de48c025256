//! License gating for PDFMate
//!
//! - `redeem`: the guarded `UNUSED -> USED` transaction over a `LicenseStore`
//! - `local`: the device-side license and usage counter
//! - `client`: talks to the redemption endpoint
//! - `codes`: generates activation codes for provisioning

pub mod client;
pub mod codes;
pub mod local;
pub mod protocol;
pub mod record;
pub mod redeem;
pub mod store;

pub use client::{ClientError, RedemptionClient};
pub use local::{
    FileKeyValueStore, KeyValueStore, LicenseData, LicenseStorage, MemoryKeyValueStore,
    StorageError,
};
pub use protocol::{ErrorBody, RedeemRequest, RedeemResponse};
pub use record::{LicenseRecord, LicenseStatus};
pub use redeem::{one_year_after, redeem, Redemption, RedemptionError};
pub use store::{LicenseStore, MemoryLicenseStore, StoreError};
