//! Reaction entity - one user's like or dislike on one target

use chrono::{DateTime, Utc};

use crate::engagement::{ReactionKind, TargetRef};
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: Snowflake,
    pub actor_id: Snowflake,
    pub target: TargetRef,
    pub kind: ReactionKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(id: Snowflake, actor_id: Snowflake, target: TargetRef, kind: ReactionKind) -> Self {
        let now = Utc::now();
        Self {
            id,
            actor_id,
            target,
            kind,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flip to `kind`; the actor and target never change.
    pub fn set_kind(&mut self, kind: ReactionKind) {
        self.kind = kind;
        self.updated_at = Utc::now();
    }
}
