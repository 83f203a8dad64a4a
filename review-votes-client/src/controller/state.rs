use review_votes_shared::types::{VoteDirection, VoteTally};

/// What a UI surface shows for one review: the caller's direction and the tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewVoteState {
    pub direction: Option<VoteDirection>,
    pub tally: VoteTally,
}

impl ReviewVoteState {
    /// Moves to `next`, applying the tally change as one transition.
    pub fn moved_to(self, next: Option<VoteDirection>) -> Self {
        Self {
            direction: next,
            tally: self.tally.apply(self.direction, next),
        }
    }
}

/// Per-review bookkeeping owned by a controller.
///
/// `snapshot` is only `Some` while `pending` is set; it is the exact state to
/// restore if the in-flight request fails. `generation` counts started
/// mutations so a refresh can tell whether the entry moved while it was
/// fetching.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReviewEntry {
    pub state: ReviewVoteState,
    pub pending: bool,
    pub snapshot: Option<ReviewVoteState>,
    pub generation: u64,
}

impl ReviewEntry {
    /// Starts a mutation towards `next`. Returns `false` when one is already in flight.
    pub fn begin(&mut self, next: Option<VoteDirection>) -> bool {
        if self.pending {
            return false;
        }
        self.snapshot = Some(self.state);
        self.state = self.state.moved_to(next);
        self.pending = true;
        self.generation += 1;
        true
    }

    /// Settles a successful mutation on the server-declared direction.
    ///
    /// Tallies keep the optimistic projection; only `refresh_votes` resyncs them.
    pub fn confirm(&mut self, server_direction: Option<VoteDirection>) {
        self.state.direction = server_direction;
        self.snapshot = None;
        self.pending = false;
    }

    /// Restores the pre-mutation snapshot.
    pub fn roll_back(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.state = snapshot;
        }
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_rejects_overlapping_mutation() {
        let mut entry = ReviewEntry::default();
        assert!(entry.begin(Some(VoteDirection::Helpful)));
        assert!(!entry.begin(Some(VoteDirection::Unhelpful)));
        assert_eq!(entry.state.direction, Some(VoteDirection::Helpful));
        assert_eq!(entry.state.tally, VoteTally::new(1, 0));
        assert_eq!(entry.generation, 1);
    }

    #[test]
    fn test_generation_counts_started_mutations_only() {
        let mut entry = ReviewEntry::default();
        entry.begin(Some(VoteDirection::Helpful));
        entry.confirm(Some(VoteDirection::Helpful));
        entry.begin(None);
        entry.roll_back();

        assert_eq!(entry.generation, 2);
    }

    #[test]
    fn test_roll_back_restores_snapshot_exactly() {
        let mut entry = ReviewEntry {
            state: ReviewVoteState {
                direction: Some(VoteDirection::Helpful),
                tally: VoteTally::new(7, 3),
            },
            ..ReviewEntry::default()
        };
        let before = entry.state;

        entry.begin(Some(VoteDirection::Unhelpful));
        assert_eq!(entry.state.tally, VoteTally::new(6, 4));

        entry.roll_back();
        assert_eq!(entry.state, before);
        assert!(!entry.pending);
        assert!(entry.snapshot.is_none());
    }

    #[test]
    fn test_confirm_clears_snapshot_and_keeps_tally() {
        let mut entry = ReviewEntry::default();
        entry.begin(Some(VoteDirection::Helpful));
        entry.confirm(Some(VoteDirection::Helpful));

        assert!(!entry.pending);
        assert!(entry.snapshot.is_none());
        assert_eq!(entry.state.tally, VoteTally::new(1, 0));
    }
}
