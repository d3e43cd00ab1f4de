use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseAccessError {
    #[error("unknown access tier: {0}")]
    UnknownTier(String),

    #[error("unknown access level: {0}")]
    UnknownLevel(String),
}

//
// ─── ACCESS TIER ──────────────────────────────────────────────────────────────
//

/// Tier declared by a lesson or resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    /// Open to everyone, signed in or not.
    Free,
    /// Part of the paid assessment package.
    Included,
    /// Premium-only material.
    Premium,
}

impl AccessTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AccessTier::Free => "free",
            AccessTier::Included => "included",
            AccessTier::Premium => "premium",
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessTier {
    type Err = ParseAccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "included" => Ok(Self::Included),
            "premium" => Ok(Self::Premium),
            other => Err(ParseAccessError::UnknownTier(other.to_owned())),
        }
    }
}

//
// ─── ACCESS LEVEL ─────────────────────────────────────────────────────────────
//

/// Subscription level of the signed-in organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Quick self-check package. Only free training is unlocked.
    Pulse,
    /// Full assessment package. Unlocks every training tier.
    DeepDive,
}

impl AccessLevel {
    /// The level that unlocks `included` and `premium` content.
    pub const FULL_ACCESS: AccessLevel = AccessLevel::DeepDive;

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Pulse => "pulse",
            AccessLevel::DeepDive => "deep_dive",
        }
    }

    #[must_use]
    pub fn is_full_access(self) -> bool {
        self == Self::FULL_ACCESS
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = ParseAccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pulse" => Ok(Self::Pulse),
            "deep_dive" => Ok(Self::DeepDive),
            other => Err(ParseAccessError::UnknownLevel(other.to_owned())),
        }
    }
}

//
// ─── POLICY ───────────────────────────────────────────────────────────────────
//

/// Decides whether a user at `level` may open content declared at `tier`.
///
/// Free content is always open. Everything else needs the full-access level;
/// an anonymous user (`None`) only gets free content. Preview overrides are
/// not considered here.
#[must_use]
pub fn can_access_training(tier: AccessTier, level: Option<AccessLevel>) -> bool {
    match tier {
        AccessTier::Free => true,
        AccessTier::Included | AccessTier::Premium => level.is_some_and(AccessLevel::is_full_access),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
