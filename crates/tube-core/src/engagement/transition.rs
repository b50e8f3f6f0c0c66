use super::{CounterDelta, ReactionKind, ReactionStatus, TargetKind};

/// One row of the reaction state machine.
///
/// | held    | requested | transition            |
/// |---------|-----------|-----------------------|
/// | none    | k         | `Added(k)`            |
/// | k       | k         | `Removed(k)`          |
/// | k       | !k        | `Switched { k -> !k }`|
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Added(ReactionKind),
    Removed(ReactionKind),
    Switched {
        from: ReactionKind,
        to: ReactionKind,
    },
}

impl Transition {
    /// Decide what a request does given the reaction currently held.
    pub fn plan(held: Option<ReactionKind>, requested: ReactionKind) -> Self {
        match held {
            None => Self::Added(requested),
            Some(kind) if kind == requested => Self::Removed(kind),
            Some(from) => Self::Switched {
                from,
                to: requested,
            },
        }
    }

    pub fn delta(self) -> CounterDelta {
        match self {
            Self::Added(kind) => CounterDelta::increment(kind),
            Self::Removed(kind) => CounterDelta::decrement(kind),
            Self::Switched { from, to } => {
                let down = CounterDelta::decrement(from);
                let up = CounterDelta::increment(to);
                CounterDelta::new(down.likes + up.likes, down.dislikes + up.dislikes)
            }
        }
    }

    /// Status the actor holds once the transition is applied.
    pub fn status(self) -> ReactionStatus {
        match self {
            Self::Added(kind) | Self::Switched { to: kind, .. } => Some(kind).into(),
            Self::Removed(_) => ReactionStatus::None,
        }
    }

    pub fn message(self, target: TargetKind) -> String {
        match self {
            Self::Added(ReactionKind::Like) => format!("{} liked", target.label()),
            Self::Added(ReactionKind::Dislike) => format!("{} disliked", target.label()),
            Self::Removed(ReactionKind::Like) => "Like removed".to_string(),
            Self::Removed(ReactionKind::Dislike) => "Dislike removed".to_string(),
            Self::Switched { from, to } => format!("Changed {from} to {to}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engagement::Counters;

    const LIKE: ReactionKind = ReactionKind::Like;
    const DISLIKE: ReactionKind = ReactionKind::Dislike;

    #[test]
    fn test_full_transition_table() {
        let table = [
            (None, LIKE, Transition::Added(LIKE), (1, 0), ReactionStatus::Like),
            (None, DISLIKE, Transition::Added(DISLIKE), (0, 1), ReactionStatus::Dislike),
            (Some(LIKE), LIKE, Transition::Removed(LIKE), (-1, 0), ReactionStatus::None),
            (Some(DISLIKE), DISLIKE, Transition::Removed(DISLIKE), (0, -1), ReactionStatus::None),
            (
                Some(LIKE),
                DISLIKE,
                Transition::Switched { from: LIKE, to: DISLIKE },
                (-1, 1),
                ReactionStatus::Dislike,
            ),
            (
                Some(DISLIKE),
                LIKE,
                Transition::Switched { from: DISLIKE, to: LIKE },
                (1, -1),
                ReactionStatus::Like,
            ),
        ];

        for (held, requested, expected, (likes, dislikes), status) in table {
            let transition = Transition::plan(held, requested);
            assert_eq!(transition, expected);
            assert_eq!(transition.delta(), CounterDelta::new(likes, dislikes));
            assert_eq!(transition.status(), status);
        }
    }

    #[test]
    fn test_messages_for_each_row() {
        let video = TargetKind::Video;
        let comment = TargetKind::Comment;

        assert_eq!(Transition::plan(None, LIKE).message(video), "Video liked");
        assert_eq!(Transition::plan(None, DISLIKE).message(video), "Video disliked");
        assert_eq!(Transition::plan(None, LIKE).message(comment), "Comment liked");
        assert_eq!(Transition::plan(None, DISLIKE).message(comment), "Comment disliked");
        assert_eq!(Transition::plan(Some(LIKE), LIKE).message(video), "Like removed");
        assert_eq!(Transition::plan(Some(DISLIKE), DISLIKE).message(comment), "Dislike removed");
        assert_eq!(
            Transition::plan(Some(DISLIKE), LIKE).message(video),
            "Changed dislike to like"
        );
        assert_eq!(
            Transition::plan(Some(LIKE), DISLIKE).message(comment),
            "Changed like to dislike"
        );
    }

    #[test]
    fn test_delta_keeps_projection_consistent() {
        // Replaying any request sequence through plan/delta must match a recount.
        let requests = [LIKE, LIKE, DISLIKE, LIKE, DISLIKE, DISLIKE, LIKE];
        let mut held: Option<ReactionKind> = None;
        let mut counters = Counters::default();

        for requested in requests {
            let transition = Transition::plan(held, requested);
            counters = counters.checked_apply(transition.delta()).unwrap();
            held = transition.status().kind();

            let expected = match held {
                None => Counters::new(0, 0),
                Some(ReactionKind::Like) => Counters::new(1, 0),
                Some(ReactionKind::Dislike) => Counters::new(0, 1),
            };
            assert_eq!(counters, expected);
        }
    }
}
