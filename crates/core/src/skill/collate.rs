//! Skill availability across other companies.

use std::collections::BTreeMap;

use kaizen_shared::types::CompanyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::EmployeeSkill;

/// How many workers other companies offer for one skill, and the cheapest rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSummary {
    /// Skill name.
    pub skill: String,
    /// Number of offered workers.
    pub pax: usize,
    /// Lowest cost among them.
    pub min_cost: Decimal,
}

/// Groups the profiles not offered by `excluding` by skill.
///
/// Ordered by skill name.
#[must_use]
pub fn collate(profiles: &[EmployeeSkill], excluding: &CompanyId) -> Vec<SkillSummary> {
    let mut by_skill: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();

    for profile in profiles.iter().filter(|p| &p.company_id != excluding) {
        let cost = profile.level.cost;
        by_skill
            .entry(profile.key.skill.as_str())
            .and_modify(|(pax, min_cost)| {
                *pax += 1;
                if cost < *min_cost {
                    *min_cost = cost;
                }
            })
            .or_insert((1, cost));
    }

    by_skill
        .into_iter()
        .map(|(skill, (pax, min_cost))| SkillSummary {
            skill: skill.to_string(),
            pax,
            min_cost,
        })
        .collect()
}
