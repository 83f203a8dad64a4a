use serde::{Deserialize, Serialize};
use crate::types::{VoteDirection, VoteTransition};

/// Represents the helpful and unhelpful tallies of a single review.
///
/// The tally is a read-side projection of the votes table. It is never the
/// source of truth for who voted what.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteTally {
    pub helpful: i64,
    pub unhelpful: i64,
}

impl VoteTally {
    pub fn new(helpful: i64, unhelpful: i64) -> Self {
        Self { helpful, unhelpful }
    }

    /// Net score of the review.
    pub fn net(&self) -> i64 {
        self.helpful - self.unhelpful
    }

    /// Moves the tally from one held direction to another.
    ///
    /// The previous direction's contribution is withdrawn first, then the new
    /// direction's contribution is added. Switching sides therefore produces a
    /// two-unit swing of the net score in a single step.
    ///
    /// # Arguments
    ///
    /// * `previous` - Direction held before the change, if any
    /// * `next` - Direction held after the change, if any
    ///
    /// # Returns
    ///
    /// The updated tally; the receiver is left untouched.
    pub fn apply(self, previous: Option<VoteDirection>, next: Option<VoteDirection>) -> Self {
        let mut tally = self;
        if let Some(direction) = previous {
            *tally.slot(direction) -= 1;
        }
        if let Some(direction) = next {
            *tally.slot(direction) += 1;
        }
        tally
    }

    /// Applies a resolved `VoteTransition`.
    pub fn apply_transition(self, transition: VoteTransition) -> Self {
        self.apply(transition.previous(), transition.resulting())
    }

    fn slot(&mut self, direction: VoteDirection) -> &mut i64 {
        match direction {
            VoteDirection::Helpful => &mut self.helpful,
            VoteDirection::Unhelpful => &mut self.unhelpful,
        }
    }
}
