use serde::{Deserialize, Serialize};

/// Limit value meaning "no ceiling".
pub const UNLIMITED: i64 = -1;

/// A named pair of download/upload rate ceilings.
///
/// Limits are bytes per second. [`UNLIMITED`] (`-1`) disables a ceiling; any
/// other negative value is invalid. Entries refer to profiles by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedProfile {
    pub name: String,
    #[serde(rename = "download", default = "default_limit")]
    pub download_limit: i64,
    #[serde(rename = "upload", default = "default_limit")]
    pub upload_limit: i64,
}

fn default_limit() -> i64 {
    UNLIMITED
}

impl SpeedProfile {
    pub fn new(name: impl Into<String>, download_limit: i64, upload_limit: i64) -> Self {
        Self {
            name: name.into(),
            download_limit,
            upload_limit,
        }
    }

    /// Profile with both directions unlimited.
    pub fn unlimited(name: impl Into<String>) -> Self {
        Self::new(name, UNLIMITED, UNLIMITED)
    }

    /// Build from KiB/s values as entered by a user.
    ///
    /// `None` means unlimited. The name is trimmed.
    pub fn from_kib(name: &str, download_kib: Option<u32>, upload_kib: Option<u32>) -> Self {
        let to_bytes = |kib: Option<u32>| kib.map(|k| i64::from(k) * 1024).unwrap_or(UNLIMITED);
        Self::new(name.trim(), to_bytes(download_kib), to_bytes(upload_kib))
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.download_limit >= UNLIMITED && self.upload_limit >= UNLIMITED
    }

    pub fn is_download_unlimited(&self) -> bool {
        self.download_limit == UNLIMITED
    }

    pub fn is_upload_unlimited(&self) -> bool {
        self.upload_limit == UNLIMITED
    }
}
