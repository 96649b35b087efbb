//! Requester profile as seen by the reply subsystem.

use serde::{Deserialize, Serialize};

/// Opaque reference to the requesting crew member.
///
/// Owned by the surrounding application's user-profile service; this
/// subsystem only reads it. The `premium` and `admin` fields are raw signals
/// consumed by the tier policy engine; full tier resolution (allowlist,
/// billing oracle) happens there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeafarerProfile {
    /// Stable identity key for the requester.
    pub key: String,
    /// Rank label, e.g. "Chief Engineer" or "Deck Cadet".
    pub rank: String,
    /// Vessel context label, e.g. "Oil Tanker".
    pub vessel: String,
    /// Explicit premium flag carried by the profile service.
    #[serde(default)]
    pub premium: bool,
    /// Administrator flag.
    #[serde(default)]
    pub admin: bool,
}

impl SeafarerProfile {
    /// Create a profile with no premium or admin signal.
    pub fn new(
        key: impl Into<String>,
        rank: impl Into<String>,
        vessel: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            rank: rank.into(),
            vessel: vessel.into(),
            premium: false,
            admin: false,
        }
    }

    /// Raw privileged signal used by adapters for their token ceilings.
    ///
    /// This is intentionally cheaper than full tier resolution: no oracle
    /// call happens inside a provider adapter.
    pub fn is_privileged(&self) -> bool {
        self.admin || self.premium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_is_unprivileged() {
        let profile = SeafarerProfile::new("usr-1", "Bosun", "Bulk Carrier");
        assert!(!profile.is_privileged());
    }

    #[test]
    fn test_privileged_signals() {
        let mut profile = SeafarerProfile::new("usr-1", "Master", "Container Ship");
        profile.premium = true;
        assert!(profile.is_privileged());

        let mut profile = SeafarerProfile::new("usr-2", "Master", "Container Ship");
        profile.admin = true;
        assert!(profile.is_privileged());
    }

    #[test]
    fn test_deserialize_defaults_flags() {
        let profile: SeafarerProfile = serde_json::from_str(
            r#"{"key": "usr-9", "rank": "Second Officer", "vessel": "Ro-Ro"}"#,
        )
        .unwrap();
        assert!(!profile.premium);
        assert!(!profile.admin);
    }
}
