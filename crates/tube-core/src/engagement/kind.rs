use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The stance a user can hold toward a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(DomainError::InvalidReactionKind(other.to_string())),
        }
    }
}

/// What a user currently holds toward a target, including nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionStatus {
    #[default]
    None,
    Like,
    Dislike,
}

impl ReactionStatus {
    pub const fn kind(self) -> Option<ReactionKind> {
        match self {
            Self::None => None,
            Self::Like => Some(ReactionKind::Like),
            Self::Dislike => Some(ReactionKind::Dislike),
        }
    }

    pub const fn liked(self) -> bool {
        matches!(self, Self::Like)
    }

    pub const fn disliked(self) -> bool {
        matches!(self, Self::Dislike)
    }
}

impl From<Option<ReactionKind>> for ReactionStatus {
    fn from(kind: Option<ReactionKind>) -> Self {
        match kind {
            None => Self::None,
            Some(ReactionKind::Like) => Self::Like,
            Some(ReactionKind::Dislike) => Self::Dislike,
        }
    }
}
