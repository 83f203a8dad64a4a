use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Represents the judgment a caller attaches to a review.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// The review was useful to the voter.
    Helpful,
    /// The review was not useful to the voter.
    Unhelpful,
}

/// Returned when a string does not name a `VoteDirection`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid vote direction: {0}")]
pub struct InvalidVoteDirection(pub String);

/// A single step of the per-(review, caller) vote state machine.
///
/// Both the server-side service and the client-side controller resolve a
/// requested direction into one of these before touching any state, so the
/// two machines always agree on what a request means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteTransition {
    /// No vote was held; a new one is cast.
    Create(VoteDirection),
    /// The held vote flips to the opposite direction.
    Switch {
        from: VoteDirection,
        to: VoteDirection,
    },
    /// The held direction was requested again, which toggles the vote off.
    Remove(VoteDirection),
}

impl VoteDirection {
    /// Returns the wire name of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteDirection::Helpful => "helpful",
            VoteDirection::Unhelpful => "unhelpful",
        }
    }

    /// Resolves a requested direction against the currently held one.
    ///
    /// # Arguments
    ///
    /// * `current` - The direction currently held, `None` when no vote exists
    /// * `requested` - The direction the caller asked for
    ///
    /// # Returns
    ///
    /// The `VoteTransition` the request maps to. Requesting the held direction
    /// is a toggle, never a no-op.
    pub fn transition(current: Option<VoteDirection>, requested: VoteDirection) -> VoteTransition {
        match current {
            None => VoteTransition::Create(requested),
            Some(held) if held == requested => VoteTransition::Remove(held),
            Some(held) => VoteTransition::Switch {
                from: held,
                to: requested,
            },
        }
    }
}

impl VoteTransition {
    /// Direction held before the transition.
    pub fn previous(&self) -> Option<VoteDirection> {
        match self {
            VoteTransition::Create(_) => None,
            VoteTransition::Switch { from, .. } => Some(*from),
            VoteTransition::Remove(held) => Some(*held),
        }
    }

    /// Direction held after the transition.
    pub fn resulting(&self) -> Option<VoteDirection> {
        match self {
            VoteTransition::Create(direction) => Some(*direction),
            VoteTransition::Switch { to, .. } => Some(*to),
            VoteTransition::Remove(_) => None,
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = InvalidVoteDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "helpful" => Ok(VoteDirection::Helpful),
            "unhelpful" => Ok(VoteDirection::Unhelpful),
            other => Err(InvalidVoteDirection(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_from_no_vote_creates() {
        let transition = VoteDirection::transition(None, VoteDirection::Helpful);
        assert_eq!(transition, VoteTransition::Create(VoteDirection::Helpful));
        assert_eq!(transition.previous(), None);
        assert_eq!(transition.resulting(), Some(VoteDirection::Helpful));
    }

    #[test]
    fn test_transition_same_direction_toggles_off() {
        for direction in [VoteDirection::Helpful, VoteDirection::Unhelpful] {
            let transition = VoteDirection::transition(Some(direction), direction);
            assert_eq!(transition, VoteTransition::Remove(direction));
            assert_eq!(transition.resulting(), None);
        }
    }

    #[test]
    fn test_transition_opposite_direction_switches() {
        let transition =
            VoteDirection::transition(Some(VoteDirection::Helpful), VoteDirection::Unhelpful);
        assert_eq!(
            transition,
            VoteTransition::Switch {
                from: VoteDirection::Helpful,
                to: VoteDirection::Unhelpful,
            }
        );
        assert_eq!(transition.previous(), Some(VoteDirection::Helpful));
        assert_eq!(transition.resulting(), Some(VoteDirection::Unhelpful));
    }

    #[test]
    fn test_parse_rejects_unknown_direction() {
        assert_eq!("helpful".parse::<VoteDirection>(), Ok(VoteDirection::Helpful));
        assert_eq!("unhelpful".parse::<VoteDirection>(), Ok(VoteDirection::Unhelpful));
        assert_eq!(
            "maybe".parse::<VoteDirection>(),
            Err(InvalidVoteDirection("maybe".to_string()))
        );
        assert!("Helpful".parse::<VoteDirection>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&VoteDirection::Unhelpful).unwrap();
        assert_eq!(json, "\"unhelpful\"");
        let parsed: VoteDirection = serde_json::from_str("\"helpful\"").unwrap();
        assert_eq!(parsed, VoteDirection::Helpful);
    }
}
