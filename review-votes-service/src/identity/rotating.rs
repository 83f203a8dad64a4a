use chrono::{DateTime, Utc};
use review_votes_shared::types::{CallerIdentity, DisplayIdentity};
use uuid::Uuid;
use crate::identity::DisplayIdentityGenerator;

/// Namespace for display token derivation.
const DISPLAY_IDENTITY_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2b7e_93a4_4d0b_8e5f_1a2c_3d4e_5f60);

/// Default rotation window: one day.
pub const DEFAULT_ROTATION_SECS: i64 = 86_400;

/// Derives display tokens from the caller identity and the current rotation window.
///
/// The same caller gets the same token within a window and a new, unlinkable
/// one when the window rolls over. No state is kept between calls.
#[derive(Debug, Clone)]
pub struct RotatingDisplayIdentity {
    rotation_secs: i64,
}

impl RotatingDisplayIdentity {
    /// Creates a generator rotating every `rotation_secs` seconds (minimum 1).
    pub fn new(rotation_secs: i64) -> Self {
        Self {
            rotation_secs: rotation_secs.max(1),
        }
    }

    /// Token the caller holds at instant `at`.
    pub fn display_identity_at(&self, caller_identity: &CallerIdentity, at: DateTime<Utc>) -> DisplayIdentity {
        let window = at.timestamp().div_euclid(self.rotation_secs);
        let seed = format!("{}:{}", caller_identity.as_str(), window);
        let digest = Uuid::new_v5(&DISPLAY_IDENTITY_NAMESPACE, seed.as_bytes()).simple().to_string();
        DisplayIdentity::new(format!("anon-{}", &digest[..8]))
    }
}

impl Default for RotatingDisplayIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_SECS)
    }
}

impl DisplayIdentityGenerator for RotatingDisplayIdentity {
    fn next_display_identity(&self, caller_identity: &CallerIdentity) -> DisplayIdentity {
        self.display_identity_at(caller_identity, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn caller(name: &str) -> CallerIdentity {
        CallerIdentity::parse(name).unwrap()
    }

    #[test]
    fn test_token_is_stable_within_window() {
        let generator = RotatingDisplayIdentity::new(3600);
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 1, 1, 10, 59, 59).unwrap();

        assert_eq!(
            generator.display_identity_at(&caller("u1"), start),
            generator.display_identity_at(&caller("u1"), later)
        );
    }

    #[test]
    fn test_token_rotates_between_windows() {
        let generator = RotatingDisplayIdentity::new(3600);
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let next = Utc.with_ymd_and_hms(2025, 1, 1, 11, 0, 0).unwrap();

        assert_ne!(
            generator.display_identity_at(&caller("u1"), start),
            generator.display_identity_at(&caller("u1"), next)
        );
    }

    #[test]
    fn test_token_shape_and_caller_separation() {
        let generator = RotatingDisplayIdentity::default();
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let token = generator.display_identity_at(&caller("u1"), at);

        assert!(token.as_str().starts_with("anon-"));
        assert_eq!(token.as_str().len(), "anon-".len() + 8);
        assert!(!token.as_str().contains("u1"));
        assert_ne!(token, generator.display_identity_at(&caller("u2"), at));
    }
}
