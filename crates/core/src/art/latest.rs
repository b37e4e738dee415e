//! Newest test per employee.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use kaizen_shared::types::EmployeeId;

use super::types::ArtRecord;

/// Picks, for every employee, the test with the greatest test date.
///
/// Tests taken after `as_of` are ignored. Ties on the date go to the highest
/// id. The result is ordered by employee.
#[must_use]
pub fn latest_per_employee(records: &[ArtRecord], as_of: Option<NaiveDate>) -> Vec<ArtRecord> {
    let mut latest: BTreeMap<&EmployeeId, &ArtRecord> = BTreeMap::new();

    for record in records {
        if as_of.is_some_and(|cutoff| record.date_of_test > cutoff) {
            continue;
        }
        latest
            .entry(&record.employee_id)
            .and_modify(|current| {
                if (record.date_of_test, record.id) > (current.date_of_test, current.id) {
                    *current = record;
                }
            })
            .or_insert(record);
    }

    latest.into_values().cloned().collect()
}
