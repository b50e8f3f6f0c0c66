//! Reaction row <-> entity mapping
//!
//! Rows are checked on the way in: a row with no target, two targets or an
//! unknown kind is reported as a database error rather than silently coerced.

use tube_core::engagement::{Counters, ReactionKind, TargetRef};
use tube_core::entities::Reaction;
use tube_core::error::DomainError;
use tube_core::value_objects::Snowflake;

use crate::models::{CountersModel, ReactionModel};

impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        let target = match (model.video_id, model.comment_id) {
            (Some(id), None) => TargetRef::video(Snowflake::new(id)),
            (None, Some(id)) => TargetRef::comment(Snowflake::new(id)),
            _ => {
                return Err(DomainError::DatabaseError(format!(
                    "reaction {} does not reference exactly one target",
                    model.id
                )))
            }
        };

        let kind = model
            .kind
            .parse::<ReactionKind>()
            .map_err(|_| DomainError::DatabaseError(format!("reaction {} has kind {:?}", model.id, model.kind)))?;

        Ok(Reaction {
            id: Snowflake::new(model.id),
            actor_id: Snowflake::new(model.actor_id),
            target,
            kind,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<CountersModel> for Counters {
    fn from(model: CountersModel) -> Self {
        Counters::new(model.likes, model.dislikes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tube_core::engagement::TargetKind;

    fn model(video_id: Option<i64>, comment_id: Option<i64>, kind: &str) -> ReactionModel {
        ReactionModel {
            id: 1,
            actor_id: 2,
            video_id,
            comment_id,
            kind: kind.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_maps_single_target() {
        let reaction = Reaction::try_from(model(None, Some(9), "dislike")).unwrap();
        assert_eq!(reaction.target.kind, TargetKind::Comment);
        assert_eq!(reaction.target.id, Snowflake::new(9));
        assert_eq!(reaction.kind, ReactionKind::Dislike);
    }

    #[test]
    fn test_rejects_malformed_rows() {
        assert!(Reaction::try_from(model(Some(1), Some(2), "like")).is_err());
        assert!(Reaction::try_from(model(None, None, "like")).is_err());
        assert!(Reaction::try_from(model(Some(1), None, "love")).is_err());
    }
}
