use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Video,
    Comment,
}

impl TargetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Comment => "comment",
        }
    }

    /// Capitalized noun used in user-facing messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Comment => "Comment",
        }
    }
}

/// Identifies exactly one reactable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: Snowflake,
}

impl TargetRef {
    pub const fn video(id: Snowflake) -> Self {
        Self {
            kind: TargetKind::Video,
            id,
        }
    }

    pub const fn comment(id: Snowflake) -> Self {
        Self {
            kind: TargetKind::Comment,
            id,
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.id)
    }
}
