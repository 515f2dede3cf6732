//! Persisted progress record shared by both realms.
//!
//! The record is stored as a single JSON object under [STORAGE_KEY]. Field
//! names are camelCase so records written by earlier browser builds load
//! without migration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key for the persisted [ProgressState].
pub const STORAGE_KEY: &str = "casino-church-progress";

/// Lower bound of both progress meters.
pub const METER_MIN: f64 = 0.0;

/// Upper bound of both progress meters.
pub const METER_MAX: f64 = 100.0;

/// Starting LUCK meter.
pub const DEFAULT_LUCK: f64 = 50.0;

/// Starting FAITH meter.
pub const DEFAULT_FAITH: f64 = 50.0;

/// Starting casino balance.
pub const DEFAULT_CASINO_BALANCE: f64 = 1_000.0;

/// Starting church balance.
pub const DEFAULT_CHURCH_BALANCE: f64 = 100.0;

/// The two mutually exclusive activity contexts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Realm {
    Casino,
    Church,
}

impl Realm {
    /// The realm whose meter decays while the player is in `self`.
    pub fn other(self) -> Self {
        match self {
            Realm::Casino => Realm::Church,
            Realm::Church => Realm::Casino,
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Realm::Casino => write!(f, "casino"),
            Realm::Church => write!(f, "church"),
        }
    }
}

impl std::str::FromStr for Realm {
    type Err = UnknownRealm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "casino" => Ok(Realm::Casino),
            "church" => Ok(Realm::Church),
            other => Err(UnknownRealm(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown realm: {0}")]
pub struct UnknownRealm(pub String);

/// Meters, balances and realm timestamps for one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    /// Gambling fortune, in [0, 100].
    pub luck_progress: f64,
    /// Devotional standing, in [0, 100].
    pub faith_progress: f64,
    /// Spendable currency for casino games and church costs.
    pub casino_balance: f64,
    /// Secondary currency rewarded by church activities.
    pub church_balance: f64,
    /// Milliseconds since the epoch of the last casino entry.
    pub last_casino_time: u64,
    /// Milliseconds since the epoch of the last church entry.
    pub last_church_time: u64,
}

impl ProgressState {
    /// Default record with both realm timestamps set to `now`.
    pub fn new(now: u64) -> Self {
        Self {
            luck_progress: DEFAULT_LUCK,
            faith_progress: DEFAULT_FAITH,
            casino_balance: DEFAULT_CASINO_BALANCE,
            church_balance: DEFAULT_CHURCH_BALANCE,
            last_casino_time: now,
            last_church_time: now,
        }
    }

    /// Force the record back inside its invariants.
    ///
    /// Non-finite values (which JSON cannot carry but a corrupted record
    /// can still decode into through other paths) are replaced by defaults.
    pub fn sanitized(self) -> Self {
        Self {
            luck_progress: clamp_meter_or(self.luck_progress, DEFAULT_LUCK),
            faith_progress: clamp_meter_or(self.faith_progress, DEFAULT_FAITH),
            casino_balance: floor_balance_or(self.casino_balance, DEFAULT_CASINO_BALANCE),
            church_balance: floor_balance_or(self.church_balance, DEFAULT_CHURCH_BALANCE),
            ..self
        }
    }

    /// Timestamp of the last entry into `realm`.
    pub fn last_time(&self, realm: Realm) -> u64 {
        match realm {
            Realm::Casino => self.last_casino_time,
            Realm::Church => self.last_church_time,
        }
    }

    /// Encode as the persisted JSON layout.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from the persisted JSON layout.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Clamp a meter value to [METER_MIN, METER_MAX].
pub fn clamp_meter(value: f64) -> f64 {
    value.clamp(METER_MIN, METER_MAX)
}

/// Floor a balance at zero.
pub fn floor_balance(value: f64) -> f64 {
    value.max(0.0)
}

fn clamp_meter_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        clamp_meter(value)
    } else {
        fallback
    }
}

fn floor_balance_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        floor_balance(value)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = ProgressState::new(42);
        assert_eq!(state.luck_progress, 50.0);
        assert_eq!(state.faith_progress, 50.0);
        assert_eq!(state.casino_balance, 1_000.0);
        assert_eq!(state.church_balance, 100.0);
        assert_eq!(state.last_casino_time, 42);
        assert_eq!(state.last_church_time, 42);
    }

    #[test]
    fn test_json_layout() {
        let state = ProgressState::new(1_700_000_000_000);
        let value: serde_json::Value =
            serde_json::from_str(&state.to_json().unwrap()).unwrap();
        let object = value.as_object().unwrap();
        for field in [
            "luckProgress",
            "faithProgress",
            "casinoBalance",
            "churchBalance",
            "lastCasinoTime",
            "lastChurchTime",
        ] {
            assert!(object.contains_key(field), "missing {field}");
        }
        assert_eq!(object.len(), 6);
    }

    #[test]
    fn test_reads_browser_record() {
        let raw = r#"{"luckProgress":51.5,"faithProgress":49.9,"casinoBalance":900,"churchBalance":100,"lastCasinoTime":1700000000000,"lastChurchTime":1699999990000}"#;
        let state = ProgressState::from_json(raw).unwrap();
        assert_eq!(state.luck_progress, 51.5);
        assert_eq!(state.casino_balance, 900.0);
        assert_eq!(state.last_church_time, 1_699_999_990_000);
    }

    #[test]
    fn test_sanitized_clamps() {
        let state = ProgressState {
            luck_progress: 140.0,
            faith_progress: -3.0,
            casino_balance: -10.0,
            church_balance: f64::NAN,
            last_casino_time: 1,
            last_church_time: 2,
        }
        .sanitized();
        assert_eq!(state.luck_progress, 100.0);
        assert_eq!(state.faith_progress, 0.0);
        assert_eq!(state.casino_balance, 0.0);
        assert_eq!(state.church_balance, DEFAULT_CHURCH_BALANCE);
        assert_eq!(state.last_church_time, 2);
    }

    #[test]
    fn test_realm_parse() {
        assert_eq!("casino".parse::<Realm>(), Ok(Realm::Casino));
        assert_eq!("church".parse::<Realm>(), Ok(Realm::Church));
        assert!("temple".parse::<Realm>().is_err());
        assert_eq!(Realm::Casino.other(), Realm::Church);
    }
}
