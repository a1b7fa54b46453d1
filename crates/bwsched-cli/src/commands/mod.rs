pub mod config;
pub mod entry;
pub mod profile;
pub mod resolve;
pub mod watch;

use std::fmt;
use std::str::FromStr;

use bwsched_core::UNLIMITED;

/// A rate limit as typed on the command line: KiB/s or `unlimited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KibLimit(pub Option<u32>);

impl KibLimit {
    /// Bytes per second, `-1` for unlimited.
    pub fn to_bytes(self) -> i64 {
        self.0.map(|kib| i64::from(kib) * 1024).unwrap_or(UNLIMITED)
    }
}

impl FromStr for KibLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unlimited" | "none" | "-1" => Ok(KibLimit(None)),
            other => other
                .parse::<u32>()
                .map(|kib| KibLimit(Some(kib)))
                .map_err(|_| format!("expected KiB/s or 'unlimited', got '{s}'")),
        }
    }
}

/// Human readable bytes/s limit.
pub struct DisplayLimit(pub i64);

impl fmt::Display for DisplayLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == UNLIMITED {
            f.write_str("unlimited")
        } else {
            write!(f, "{} KiB/s", self.0 / 1024)
        }
    }
}
