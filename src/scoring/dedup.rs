use super::proficiency::rank;
use crate::profile::SkillRecord;
use std::collections::HashMap;

/// Collapses requirements to one entry per skill name.
///
/// A repeated name replaces the kept record only when its proficiency ranks
/// strictly higher, so ties (including two unranked levels) keep the first
/// one seen. Output follows the order in which each name first appeared.
pub fn dedupe_requirements(requirements: Vec<SkillRecord>) -> Vec<SkillRecord> {
    let mut kept: Vec<SkillRecord> = Vec::with_capacity(requirements.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for requirement in requirements {
        match positions.get(&requirement.name).copied() {
            None => {
                positions.insert(requirement.name.clone(), kept.len());
                kept.push(requirement);
            }
            Some(idx) => {
                let existing = &kept[idx];
                if rank(&requirement.proficiency_level) > rank(&existing.proficiency_level) {
                    tracing::debug!(
                        skill = %requirement.name,
                        from = %existing.proficiency_level,
                        to = %requirement.proficiency_level,
                        "raising duplicate requirement proficiency"
                    );
                    kept[idx] = requirement;
                }
            }
        }
    }

    kept
}
