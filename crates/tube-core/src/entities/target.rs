//! A resolved reaction target

use crate::engagement::{Counters, TargetKind, TargetRef};

use super::{Comment, Video};

/// The live entity behind a [`TargetRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Video(Video),
    Comment(Comment),
}

impl Target {
    pub fn target_ref(&self) -> TargetRef {
        match self {
            Self::Video(v) => TargetRef::video(v.id),
            Self::Comment(c) => TargetRef::comment(c.id),
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Video(_) => TargetKind::Video,
            Self::Comment(_) => TargetKind::Comment,
        }
    }

    pub fn counters(&self) -> Counters {
        match self {
            Self::Video(v) => v.counters(),
            Self::Comment(c) => c.counters(),
        }
    }

    /// Same entity carrying freshly adjusted counters.
    pub fn with_counters(self, counters: Counters) -> Self {
        match self {
            Self::Video(mut v) => {
                v.likes = counters.likes;
                v.dislikes = counters.dislikes;
                Self::Video(v)
            }
            Self::Comment(mut c) => {
                c.likes = counters.likes;
                c.dislikes = counters.dislikes;
                Self::Comment(c)
            }
        }
    }
}
