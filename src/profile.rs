//! The three operating-system profiles fed into every analysis.

use crate::knowledge::{DEFAULT_HEXAGRAM, HexagramId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileRole {
    Engine,
    Interface,
    SafeMode,
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProfileRole::Engine => "Engine",
            ProfileRole::Interface => "Interface",
            ProfileRole::SafeMode => "Safe Mode",
        })
    }
}

/// One anchored profile. Produced upstream and read-only here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsProfile {
    pub role: ProfileRole,
    pub hexagram_id: HexagramId,
    #[serde(default = "default_strength")]
    pub strength: f64,
}

fn default_strength() -> f64 {
    0.5
}

impl OsProfile {
    pub fn new(role: ProfileRole, hexagram_id: HexagramId, strength: f64) -> Self {
        Self {
            role,
            hexagram_id,
            strength,
        }
    }

    pub fn engine(hexagram_id: HexagramId) -> Self {
        Self::new(ProfileRole::Engine, hexagram_id, default_strength())
    }

    pub fn interface(hexagram_id: HexagramId) -> Self {
        Self::new(ProfileRole::Interface, hexagram_id, default_strength())
    }

    pub fn safe_mode(hexagram_id: HexagramId) -> Self {
        Self::new(ProfileRole::SafeMode, hexagram_id, default_strength())
    }

    /// Strength clamped to [0,1] (NaN → 0), out-of-range ids replaced by 1.
    pub fn sanitized(&self) -> Self {
        let hexagram_id = if (1..=64).contains(&self.hexagram_id) {
            self.hexagram_id
        } else {
            tracing::warn!(
                "{} profile has hexagram id {}, substituting {}",
                self.role,
                self.hexagram_id,
                DEFAULT_HEXAGRAM
            );
            DEFAULT_HEXAGRAM
        };
        let strength = if self.strength.is_nan() {
            0.0
        } else {
            self.strength.clamp(0.0, 1.0)
        };
        Self {
            role: self.role,
            hexagram_id,
            strength,
        }
    }
}

/// The triple every analyzer reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSet {
    pub engine: OsProfile,
    pub interface: OsProfile,
    pub safe_mode: OsProfile,
}

impl ProfileSet {
    pub fn new(engine: OsProfile, interface: OsProfile, safe_mode: OsProfile) -> Self {
        Self {
            engine,
            interface,
            safe_mode,
        }
    }

    /// Shorthand for three default-strength profiles.
    pub fn from_ids(engine: HexagramId, interface: HexagramId, safe_mode: HexagramId) -> Self {
        Self::new(
            OsProfile::engine(engine),
            OsProfile::interface(interface),
            OsProfile::safe_mode(safe_mode),
        )
    }

    pub fn sanitized(&self) -> Self {
        Self {
            engine: self.engine.sanitized(),
            interface: self.interface.sanitized(),
            safe_mode: self.safe_mode.sanitized(),
        }
    }

    pub fn ids(&self) -> [HexagramId; 3] {
        [
            self.engine.hexagram_id,
            self.interface.hexagram_id,
            self.safe_mode.hexagram_id,
        ]
    }

    pub fn iter(&self) -> impl Iterator<Item = &OsProfile> {
        [&self.engine, &self.interface, &self.safe_mode].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_clamps_strength_and_replaces_bad_ids() {
        let p = OsProfile::new(ProfileRole::Engine, 99, f64::NAN).sanitized();
        assert_eq!(p.hexagram_id, 1);
        assert_eq!(p.strength, 0.0);

        let p = OsProfile::new(ProfileRole::SafeMode, 64, 3.5).sanitized();
        assert_eq!(p.hexagram_id, 64);
        assert_eq!(p.strength, 1.0);

        let p = OsProfile::new(ProfileRole::Interface, 0, -0.2).sanitized();
        assert_eq!(p.hexagram_id, 1);
        assert_eq!(p.strength, 0.0);
    }

    #[test]
    fn deserializes_with_default_strength() {
        let p: OsProfile =
            serde_json::from_str(r#"{"role":"safeMode","hexagramId":29}"#).unwrap();
        assert_eq!(p.role, ProfileRole::SafeMode);
        assert_eq!(p.strength, 0.5);
    }

    #[test]
    fn set_ids_keep_role_order() {
        let set = ProfileSet::from_ids(1, 2, 11);
        assert_eq!(set.ids(), [1, 2, 11]);
        assert_eq!(set.iter().count(), 3);
    }
}
