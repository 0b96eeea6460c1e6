//! Cloud environment model
//!
//! The tenant directory describes Microsoft clouds by long environment
//! names ("Global", "microsoftonline.us", ...); the redirect table and
//! URLs use short codes ("ww", "gcc", ...). This module is the closed
//! mapping between the two.

use serde::{Deserialize, Serialize};

/// A Microsoft cloud environment.
///
/// The set is closed: a redirect table entry keyed by anything else is
/// rejected at load time, and unknown directory names fall back to
/// [`CloudEnvironment::Ww`] at the lookup site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudEnvironment {
    /// Global / commercial cloud ("ww"). The default everywhere.
    Ww,
    /// US Government Community Cloud ("gcc").
    Gcc,
    /// US Department of Defense cloud ("dod").
    Dod,
    /// 21Vianet-operated China cloud ("cn").
    Cn,
}

impl CloudEnvironment {
    /// All known environments, in table-validation order.
    pub const ALL: [CloudEnvironment; 4] = [
        CloudEnvironment::Ww,
        CloudEnvironment::Gcc,
        CloudEnvironment::Dod,
        CloudEnvironment::Cn,
    ];

    /// The short code used in URLs and redirect table keys.
    pub fn code(self) -> &'static str {
        match self {
            CloudEnvironment::Ww => "ww",
            CloudEnvironment::Gcc => "gcc",
            CloudEnvironment::Dod => "dod",
            CloudEnvironment::Cn => "cn",
        }
    }

    /// Parse a short code ("ww", "gcc", "dod", "cn"), case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "ww" => Some(CloudEnvironment::Ww),
            "gcc" => Some(CloudEnvironment::Gcc),
            "dod" => Some(CloudEnvironment::Dod),
            "cn" => Some(CloudEnvironment::Cn),
            _ => None,
        }
    }

    /// Map an environment name as reported by the tenant directory.
    ///
    /// Returns `None` for unrecognized names; callers decide whether to
    /// warn and fall back to [`CloudEnvironment::default`].
    pub fn from_directory_name(name: &str) -> Option<Self> {
        match name {
            "Global" => Some(CloudEnvironment::Ww),
            "microsoftonline.us" => Some(CloudEnvironment::Gcc),
            "microsoftonline.mil" => Some(CloudEnvironment::Dod),
            "partner.microsoftonline.cn" => Some(CloudEnvironment::Cn),
            _ => None,
        }
    }
}

impl Default for CloudEnvironment {
    fn default() -> Self {
        CloudEnvironment::Ww
    }
}

impl std::fmt::Display for CloudEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
