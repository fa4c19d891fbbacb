//! Like/unlike toggling for user reports.
//!
//! The liking users are kept as a set on the report itself; the stored
//! `likes` counter is always written from that set's size.

use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::user_reports;
use crate::error::{AppError, AppResult};

/// Users who currently like a report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct LikedBy(BTreeSet<Uuid>);

impl LikedBy {
    #[must_use]
    pub fn contains(&self, user_id: Uuid) -> bool {
        self.0.contains(&user_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flip `user_id`'s membership.
    pub fn toggle(&mut self, user_id: Uuid) -> LikeOutcome {
        let liked = if self.0.remove(&user_id) {
            false
        } else {
            self.0.insert(user_id);
            true
        };

        LikeOutcome {
            likes: self.count(),
            liked,
        }
    }

    /// Set size as stored in the `likes` column.
    #[must_use]
    pub fn count(&self) -> i32 {
        i32::try_from(self.0.len()).unwrap_or(i32::MAX)
    }
}

impl FromIterator<Uuid> for LikedBy {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of a toggle: the new count and whether the caller now likes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct LikeOutcome {
    pub likes: i32,
    pub liked: bool,
}

/// Toggle `user_id`'s like on the report `report_id`.
///
/// Read-modify-write against the current row. Concurrent toggles by the same
/// user are last-writer-wins, but `likes` is always written together with
/// the set it was counted from.
///
/// # Errors
///
/// `NotFound` if the report does not exist.
pub async fn toggle_like<C: ConnectionTrait>(
    db: &C,
    report_id: Uuid,
    user_id: Uuid,
) -> AppResult<LikeOutcome> {
    let report = user_reports::Entity::find_by_id(report_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User report '{report_id}' not found")))?;

    let mut liked_by = report.liked_by.clone();
    let outcome = liked_by.toggle(user_id);

    let mut active: user_reports::ActiveModel = report.into();
    active.liked_by = Set(liked_by);
    active.likes = Set(outcome.likes);
    active.update(db).await?;

    tracing::info!(
        report_id = %report_id,
        user_id = %user_id,
        likes = outcome.likes,
        liked = outcome.liked,
        "Like toggled"
    );

    Ok(outcome)
}
