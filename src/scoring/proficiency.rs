use serde::Serialize;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Basic < Intermediate < Advanced. Labels are matched case-sensitively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
pub enum ProficiencyLevel {
    Basic = 1,
    Intermediate = 2,
    Advanced = 3,
}

impl ProficiencyLevel {
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Ordinal of a proficiency label; anything outside the scale is 0.
pub fn rank(level: &str) -> u8 {
    ProficiencyLevel::from_str(level)
        .map(ProficiencyLevel::rank)
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProficiencyComparison {
    Equal,
    Higher,
    Lower { levels: u8 },
    Unranked,
}

/// Compares `a` against `b`. Either side being off the scale yields `Unranked`.
pub fn compare(a: &str, b: &str) -> ProficiencyComparison {
    let (a, b) = (rank(a), rank(b));
    if a == 0 || b == 0 {
        return ProficiencyComparison::Unranked;
    }

    match a.cmp(&b) {
        std::cmp::Ordering::Equal => ProficiencyComparison::Equal,
        std::cmp::Ordering::Greater => ProficiencyComparison::Higher,
        std::cmp::Ordering::Less => ProficiencyComparison::Lower { levels: b - a },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_rank_scale() {
        assert_eq!(rank("Basic"), 1);
        assert_eq!(rank("Intermediate"), 2);
        assert_eq!(rank("Advanced"), 3);
    }

    #[test]
    fn test_rank_unranked_values() {
        assert_eq!(rank(""), 0);
        assert_eq!(rank("N/A"), 0);
        assert_eq!(rank("advanced"), 0);
        assert_eq!(rank("Expert"), 0);
    }

    #[test]
    fn test_levels_are_ordered() {
        let levels: Vec<_> = ProficiencyLevel::iter().collect();
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
        assert!(levels.windows(2).all(|w| w[0].rank() < w[1].rank()));
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare("Advanced", "Advanced"), ProficiencyComparison::Equal);
        assert_eq!(compare("Advanced", "Basic"), ProficiencyComparison::Higher);
        assert_eq!(
            compare("Intermediate", "Advanced"),
            ProficiencyComparison::Lower { levels: 1 }
        );
        assert_eq!(
            compare("Basic", "Advanced"),
            ProficiencyComparison::Lower { levels: 2 }
        );
    }

    #[test]
    fn test_compare_unranked_on_either_side() {
        assert_eq!(compare("Expert", "Basic"), ProficiencyComparison::Unranked);
        assert_eq!(compare("Basic", ""), ProficiencyComparison::Unranked);
        assert_eq!(compare("Expert", "Expert"), ProficiencyComparison::Unranked);
    }
}
