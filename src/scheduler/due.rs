//! Selection of the review queue.

use crate::models::ReviewableCard;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Returns the cards due at `now`, most overdue first.
///
/// Cards that were never scheduled sort ahead of everything else; ties fall
/// back to the last review time (never reviewed first) and then to the id, so
/// the same input always yields the same queue.
pub fn select_due(
    cards: &[ReviewableCard],
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> Vec<ReviewableCard> {
    let mut due: Vec<&ReviewableCard> = cards.iter().filter(|card| card.is_due(now)).collect();
    due.sort_by(|a, b| queue_order(a, b));

    let take = limit.unwrap_or(due.len());
    due.into_iter().take(take).cloned().collect()
}

/// `Option` orders `None` before `Some`, which is exactly "nulls first".
fn queue_order(a: &ReviewableCard, b: &ReviewableCard) -> Ordering {
    a.next_review_at
        .cmp(&b.next_review_at)
        .then_with(|| a.last_reviewed_at.cmp(&b.last_reviewed_at))
        .then_with(|| a.id.cmp(&b.id))
}
