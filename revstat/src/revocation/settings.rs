//! Structures and functions related to configuring revocation status determination

use flagset::FlagSet;
use serde::{Deserialize, Serialize};

use crate::revocation::method::MethodFlags;

use std::time::{SystemTime, UNIX_EPOCH};

/// `RevocationSettings` governs how an application drives revocation status determination.
///
/// Values are optional; getters return documented defaults for absent values so that a
/// deserialized settings object need only carry what an application wants to override.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RevocationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    require_info_on_missing_source: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fail_on_missing_fresh_info: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_of_interest: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ocsp_timeout_secs: Option<u64>,
}

impl RevocationSettings {
    /// Creates a new empty [`RevocationSettings`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a certificate lacking a discoverable responder URI should be treated
    /// as revoked rather than yielding no information. Defaults to false.
    pub fn get_require_info_on_missing_source(&self) -> bool {
        self.require_info_on_missing_source.unwrap_or(false)
    }

    /// Sets whether a certificate lacking a discoverable responder URI is treated as revoked.
    pub fn set_require_info_on_missing_source(&mut self, v: bool) {
        self.require_info_on_missing_source = Some(v);
    }

    /// Returns true if a no-information outcome should escalate to revoked when a responder
    /// URI was found but the round trip produced no fresh information. Defaults to false.
    pub fn get_fail_on_missing_fresh_info(&self) -> bool {
        self.fail_on_missing_fresh_info.unwrap_or(false)
    }

    /// Sets whether a no-information outcome escalates to revoked when a responder URI was
    /// found.
    pub fn set_fail_on_missing_fresh_info(&mut self, v: bool) {
        self.fail_on_missing_fresh_info = Some(v);
    }

    /// Returns the time of interest as seconds since Unix epoch. Defaults to the current time
    /// (zero, i.e., checks disabled, if the clock is unavailable).
    pub fn get_time_of_interest(&self) -> u64 {
        match self.time_of_interest {
            Some(toi) => toi,
            None => match SystemTime::now().duration_since(UNIX_EPOCH) {
                Ok(n) => n.as_secs(),
                Err(_) => 0,
            },
        }
    }

    /// Sets the time of interest as seconds since Unix epoch. Zero disables time checks.
    pub fn set_time_of_interest(&mut self, v: u64) {
        self.time_of_interest = Some(v);
    }

    /// Returns the timeout in seconds applied to OCSP exchanges by the HTTP transport.
    /// Defaults to 10.
    pub fn get_ocsp_timeout_secs(&self) -> u64 {
        self.ocsp_timeout_secs.unwrap_or(10)
    }

    /// Sets the timeout in seconds applied to OCSP exchanges by the HTTP transport.
    pub fn set_ocsp_timeout_secs(&mut self, v: u64) {
        self.ocsp_timeout_secs = Some(v);
    }

    /// Converts the policy-relevant settings into the per-check method flag set.
    pub fn method_flags(&self) -> FlagSet<MethodFlags> {
        let mut flags = FlagSet::default();
        if self.get_require_info_on_missing_source() {
            flags |= MethodFlags::RequireInfoOnMissingSource;
        }
        if self.get_fail_on_missing_fresh_info() {
            flags |= MethodFlags::FailOnMissingFreshInfo;
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let cps = RevocationSettings::new();
        assert!(!cps.get_require_info_on_missing_source());
        assert!(!cps.get_fail_on_missing_fresh_info());
        assert_eq!(10, cps.get_ocsp_timeout_secs());
        assert!(cps.method_flags().is_empty());
    }

    #[test]
    fn settings_gets_and_sets() {
        let mut cps = RevocationSettings::new();
        cps.set_require_info_on_missing_source(true);
        cps.set_fail_on_missing_fresh_info(true);
        cps.set_time_of_interest(1);
        cps.set_ocsp_timeout_secs(30);
        assert!(cps.get_require_info_on_missing_source());
        assert!(cps.get_fail_on_missing_fresh_info());
        assert_eq!(1, cps.get_time_of_interest());
        assert_eq!(30, cps.get_ocsp_timeout_secs());
        assert!(cps.method_flags().contains(MethodFlags::RequireInfoOnMissingSource));
        assert!(cps.method_flags().contains(MethodFlags::FailOnMissingFreshInfo));
    }

    #[test]
    fn settings_serde_round_trip() {
        let mut cps = RevocationSettings::new();
        cps.set_fail_on_missing_fresh_info(true);
        cps.set_time_of_interest(1646482828);
        let json = serde_json::to_string(&cps).unwrap();
        let cps2: RevocationSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(cps, cps2);
        assert!(cps2.get_fail_on_missing_fresh_info());
        assert_eq!(1646482828, cps2.get_time_of_interest());
    }
}
