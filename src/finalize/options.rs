//! Career options, skill pairs and benefits offered during finalization

use crate::core::{Characteristic, ResolverConfig, StepError};
use crate::skills::grant::{format_grant, skill_key};
use crate::skills::merge::ResolvedSkill;
use serde::{Deserialize, Serialize};

/// The three mutually exclusive career options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerOption {
    /// Raise one career skill already at level 1+ to the maximum
    RaiseToMax,
    /// Raise three distinct career skills by one, up to a cap
    RaiseThree,
    /// Gain one pair of skills from the fixed pair catalog
    SkillPair,
}

impl CareerOption {
    pub fn all() -> &'static [CareerOption] {
        &[
            CareerOption::RaiseToMax,
            CareerOption::RaiseThree,
            CareerOption::SkillPair,
        ]
    }

    /// 1-based option number as printed in the rules
    pub fn number(&self) -> u8 {
        match self {
            CareerOption::RaiseToMax => 1,
            CareerOption::RaiseThree => 2,
            CareerOption::SkillPair => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<CareerOption> {
        CareerOption::all()
            .iter()
            .copied()
            .find(|option| option.number() == number)
    }

    pub fn label(&self, config: &ResolverConfig) -> String {
        match self {
            CareerOption::RaiseToMax => format!(
                "Raise one career skill you already have to level {}",
                config.raise_to_max_target
            ),
            CareerOption::RaiseThree => format!(
                "Raise {} career skills by +1 (up to level {})",
                config.raise_three_count, config.raise_three_cap
            ),
            CareerOption::SkillPair => "Gain a pair of skills".to_string(),
        }
    }
}

/// The concrete selection made for a career option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementPick {
    RaiseToMax(String),
    RaiseThree(Vec<String>),
    /// Index into the skill-pair catalog
    SkillPair(usize),
}

impl ImprovementPick {
    pub fn option(&self) -> CareerOption {
        match self {
            ImprovementPick::RaiseToMax(_) => CareerOption::RaiseToMax,
            ImprovementPick::RaiseThree(_) => CareerOption::RaiseThree,
            ImprovementPick::SkillPair(_) => CareerOption::SkillPair,
        }
    }
}

/// Two skills granted together by career option 3
///
/// Entries are grant strings without a level, e.g. `"Gunner (any)"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPair {
    pub first: String,
    pub second: String,
}

impl SkillPair {
    pub fn new(first: &str, second: &str) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn skills(&self) -> [&str; 2] {
        [self.first.as_str(), self.second.as_str()]
    }

    pub fn label(&self) -> String {
        format!("{} and {}", self.first, self.second)
    }
}

/// Built-in skill-pair catalog
pub fn standard_skill_pairs() -> Vec<SkillPair> {
    vec![
        SkillPair::new("Gunner (any)", "Mechanic"),
        SkillPair::new("Pilot (any)", "Vacc Suit"),
        SkillPair::new("Electronics (any)", "Engineer (any)"),
        SkillPair::new("Gun Combat (any)", "Recon"),
        SkillPair::new("Admin", "Advocate"),
        SkillPair::new("Medic", "Science (any)"),
        SkillPair::new("Streetwise", "Deception"),
        SkillPair::new("Leadership", "Tactics (any)"),
    ]
}

/// Benefit picked at the end of finalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Benefit {
    CharacteristicIncrease(Characteristic),
    Credits,
    Weapon,
    Contact,
    ShipShare,
}

impl Benefit {
    /// Every benefit on the fixed list
    pub fn all() -> Vec<Benefit> {
        let mut benefits: Vec<Benefit> = Characteristic::all()
            .iter()
            .map(|c| Benefit::CharacteristicIncrease(*c))
            .collect();
        benefits.extend([
            Benefit::Credits,
            Benefit::Weapon,
            Benefit::Contact,
            Benefit::ShipShare,
        ]);
        benefits
    }

    pub fn label(&self) -> String {
        match self {
            Benefit::CharacteristicIncrease(c) => format!("+1 {}", c),
            Benefit::Credits => "Credits".to_string(),
            Benefit::Weapon => "Weapon".to_string(),
            Benefit::Contact => "Contact".to_string(),
            Benefit::ShipShare => "Ship share".to_string(),
        }
    }
}

/// Turn a pick into improvement grant strings at their target levels
///
/// `skills` is the filtered merge; career eligibility and current levels
/// are read from it.
pub fn plan_improvements(
    pick: &ImprovementPick,
    skills: &[ResolvedSkill],
    pairs: &[SkillPair],
    config: &ResolverConfig,
) -> Result<Vec<String>, StepError> {
    match pick {
        ImprovementPick::RaiseToMax(name) => {
            let skill = find_career_skill(skills, name)?;
            let target = config.raise_to_max_target;
            if skill.level < 1 {
                return Err(ineligible(skill, "must already be at level 1 or higher".into()));
            }
            if skill.level >= target {
                return Err(ineligible(skill, format!("already at level {}", skill.level)));
            }
            Ok(vec![format_grant(&skill.base, skill.specialization.as_deref(), target)])
        }
        ImprovementPick::RaiseThree(names) => {
            if names.len() != config.raise_three_count {
                return Err(StepError::WrongSkillCount {
                    expected: config.raise_three_count,
                    got: names.len(),
                });
            }

            let mut seen: Vec<String> = Vec::with_capacity(names.len());
            let mut grants = Vec::with_capacity(names.len());
            for name in names {
                let key = skill_key(name);
                if seen.contains(&key) {
                    return Err(StepError::DuplicateSkill(name.clone()));
                }
                seen.push(key);

                let skill = find_career_skill(skills, name)?;
                if skill.level >= config.raise_three_cap {
                    return Err(ineligible(
                        skill,
                        format!("already at level {} (cap {})", skill.level, config.raise_three_cap),
                    ));
                }
                grants.push(format_grant(
                    &skill.base,
                    skill.specialization.as_deref(),
                    skill.level + 1,
                ));
            }
            Ok(grants)
        }
        ImprovementPick::SkillPair(index) => {
            let pair = pairs.get(*index).ok_or(StepError::UnknownSkillPair(*index))?;
            Ok(pair
                .skills()
                .iter()
                .map(|skill| format!("{}-{}", skill.trim(), config.skill_pair_level))
                .collect())
        }
    }
}

fn find_career_skill<'a>(
    skills: &'a [ResolvedSkill],
    name: &str,
) -> Result<&'a ResolvedSkill, StepError> {
    let skill = skills
        .iter()
        .find(|s| skill_key(&s.name) == skill_key(name))
        .ok_or_else(|| StepError::UnknownSkill(name.to_string()))?;

    if !skill.source.from_career() {
        return Err(ineligible(skill, "not a career skill".into()));
    }
    Ok(skill)
}

fn ineligible(skill: &ResolvedSkill, reason: String) -> StepError {
    StepError::IneligibleSkill {
        skill: skill.name.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Source;
    use crate::skills::merge::merge;
    use crate::skills::source::SourceGrants;

    fn skills(background: &[&str], career: &[&str]) -> Vec<ResolvedSkill> {
        let sources = SourceGrants::new(background.to_vec(), career.to_vec());
        merge(
            &sources.parse(Source::Background).unwrap(),
            &sources.parse(Source::Career).unwrap(),
        )
    }

    fn plan(pick: ImprovementPick, skills: &[ResolvedSkill]) -> Result<Vec<String>, StepError> {
        plan_improvements(&pick, skills, &standard_skill_pairs(), &ResolverConfig::default())
    }

    #[test]
    fn test_option_numbers_round_trip() {
        for option in CareerOption::all() {
            assert_eq!(CareerOption::from_number(option.number()), Some(*option));
        }
        assert_eq!(CareerOption::from_number(4), None);
    }

    #[test]
    fn test_raise_to_max_targets_level_four() {
        let skills = skills(&[], &["Electronics (computers)-1"]);
        let grants = plan(ImprovementPick::RaiseToMax("electronics (computers)".into()), &skills).unwrap();
        assert_eq!(grants, vec!["Electronics (Computers)-4"]);
    }

    #[test]
    fn test_raise_to_max_requires_career_skill_at_level_one() {
        let skills = skills(&["Streetwise-2"], &["Vacc Suit-0"]);
        assert!(matches!(
            plan(ImprovementPick::RaiseToMax("Streetwise".into()), &skills),
            Err(StepError::IneligibleSkill { .. })
        ));
        assert!(matches!(
            plan(ImprovementPick::RaiseToMax("Vacc Suit".into()), &skills),
            Err(StepError::IneligibleSkill { .. })
        ));
        assert!(matches!(
            plan(ImprovementPick::RaiseToMax("Pilot".into()), &skills),
            Err(StepError::UnknownSkill(_))
        ));
    }

    #[test]
    fn test_raise_three_adds_one_each() {
        let skills = skills(&["Admin-1"], &["Admin-0", "Vacc Suit-0", "Mechanic-1"]);
        let grants = plan(
            ImprovementPick::RaiseThree(vec!["Admin".into(), "Vacc Suit".into(), "Mechanic".into()]),
            &skills,
        )
        .unwrap();
        assert_eq!(grants, vec!["Admin-2", "Vacc Suit-1", "Mechanic-2"]);
    }

    #[test]
    fn test_raise_three_rejects_capped_duplicate_and_short_lists() {
        let skills = skills(&[], &["Admin-2", "Vacc Suit-0", "Mechanic-1", "Recon-1"]);

        assert!(matches!(
            plan(
                ImprovementPick::RaiseThree(vec!["Admin".into(), "Vacc Suit".into(), "Mechanic".into()]),
                &skills
            ),
            Err(StepError::IneligibleSkill { .. })
        ));
        assert!(matches!(
            plan(
                ImprovementPick::RaiseThree(vec!["Recon".into(), "recon".into(), "Mechanic".into()]),
                &skills
            ),
            Err(StepError::DuplicateSkill(_))
        ));
        assert!(matches!(
            plan(ImprovementPick::RaiseThree(vec!["Recon".into()]), &skills),
            Err(StepError::WrongSkillCount { expected: 3, got: 1 })
        ));
    }

    #[test]
    fn test_skill_pair_grants_level_one() {
        let grants = plan(ImprovementPick::SkillPair(0), &[]).unwrap();
        assert_eq!(grants, vec!["Gunner (any)-1", "Mechanic-1"]);
        assert!(matches!(
            plan(ImprovementPick::SkillPair(99), &[]),
            Err(StepError::UnknownSkillPair(99))
        ));
    }

    #[test]
    fn test_benefit_list() {
        let benefits = Benefit::all();
        assert_eq!(benefits.len(), 10);
        assert_eq!(
            Benefit::CharacteristicIncrease(Characteristic::Education).label(),
            "+1 EDU"
        );
    }
}
