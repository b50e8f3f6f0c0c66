use serde::{Deserialize, Serialize};

use super::ReactionKind;

/// The denormalized like/dislike totals stored on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counters {
    pub likes: i64,
    pub dislikes: i64,
}

impl Counters {
    pub const fn new(likes: i64, dislikes: i64) -> Self {
        Self { likes, dislikes }
    }

    /// Applies `delta`, or returns `None` if either total would drop below zero.
    pub fn checked_apply(self, delta: CounterDelta) -> Option<Self> {
        let likes = self.likes.checked_add(delta.likes)?;
        let dislikes = self.dislikes.checked_add(delta.dislikes)?;
        (likes >= 0 && dislikes >= 0).then_some(Self { likes, dislikes })
    }
}

/// Signed change applied to [`Counters`] by a single transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDelta {
    pub likes: i64,
    pub dislikes: i64,
}

impl CounterDelta {
    pub const fn new(likes: i64, dislikes: i64) -> Self {
        Self { likes, dislikes }
    }

    pub const fn increment(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Like => Self::new(1, 0),
            ReactionKind::Dislike => Self::new(0, 1),
        }
    }

    pub const fn decrement(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Like => Self::new(-1, 0),
            ReactionKind::Dislike => Self::new(0, -1),
        }
    }

    pub const fn is_zero(self) -> bool {
        self.likes == 0 && self.dislikes == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_apply_guards_underflow() {
        let counters = Counters::new(0, 1);
        assert_eq!(
            counters.checked_apply(CounterDelta::decrement(ReactionKind::Dislike)),
            Some(Counters::new(0, 0))
        );
        assert_eq!(
            counters.checked_apply(CounterDelta::decrement(ReactionKind::Like)),
            None
        );
    }

    #[test]
    fn test_increment_and_decrement_cancel() {
        for kind in [ReactionKind::Like, ReactionKind::Dislike] {
            let up = CounterDelta::increment(kind);
            let down = CounterDelta::decrement(kind);
            assert!(CounterDelta::new(up.likes + down.likes, up.dislikes + down.dislikes).is_zero());
        }
    }
}
