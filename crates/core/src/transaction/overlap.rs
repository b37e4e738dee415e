//! Loan date collision rule.

use super::types::{DateRange, Transaction};

/// Returns true if `candidate` may not be stored next to `existing`.
///
/// A candidate collides when its start or its end falls strictly inside the
/// existing range, or when both start on the same day.
///
/// This is not a full interval overlap test. A candidate that strictly
/// contains an existing range, or one that shares only its end date with it,
/// is accepted. Stored data depends on this exact rule, so it must not be
/// widened here.
#[must_use]
pub fn conflicts(candidate: DateRange, existing: DateRange) -> bool {
    existing.strictly_contains(candidate.start)
        || existing.strictly_contains(candidate.end)
        || candidate.start == existing.start
}

/// Returns the first stored transaction that `candidate` collides with.
pub fn find_conflict<'a, I>(candidate: DateRange, existing: I) -> Option<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    existing
        .into_iter()
        .find(|tx| conflicts(candidate, tx.range()))
}
