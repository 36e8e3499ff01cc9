//! One character build from package selection to export
//!
//! The session owns the source grant lists and re-runs the
//! parse -> merge -> detect pipeline after every mutation. Nothing derived
//! from the sources is cached across a mutation.

use crate::character::{Characteristics, DiceRoller, FinalCharacter, FinalSkill, Package};
use crate::core::{Result, Source, StepError};
use crate::finalize::{
    plan_improvements, Benefit, CareerOption, FinalizationStepper, ImprovementLedger,
    ImprovementPick, Stage,
};
use crate::rules::Rules;
use crate::skills::{
    detect_choices, detect_grant_choices, merge, merge_unfiltered, Choice, ChoiceQueue,
    InstanceKey, Resolution, ResolvedSkill, SourceGrants,
};

#[derive(Debug, Clone)]
pub struct BuildSession {
    rules: Rules,
    background: Package,
    career: Package,
    sources: SourceGrants,
    queue: ChoiceQueue,
    stepper: FinalizationStepper,
    base_characteristics: Characteristics,
    age: Option<u32>,
}

impl BuildSession {
    pub fn new(rules: Rules, background: Package, career: Package) -> Result<Self> {
        background.validate(Source::Background)?;
        career.validate(Source::Career)?;

        let sources = SourceGrants::new(
            background.skills.iter().cloned(),
            career.skills.iter().cloned(),
        );
        let mut session = Self {
            rules,
            background,
            career,
            sources,
            queue: ChoiceQueue::new(),
            stepper: FinalizationStepper::new(),
            base_characteristics: Characteristics::default(),
            age: None,
        };
        session.refresh()?;

        tracing::info!(
            "New build: {} / {} with {} pending choice(s)",
            session.background.name,
            session.career.name,
            session.queue.len()
        );
        Ok(session)
    }

    /// Session over bare grant lists with the standard rules
    pub fn with_grants(background: &[&str], career: &[&str]) -> Result<Self> {
        Self::new(
            Rules::standard(),
            Package::new("Background", background),
            Package::new("Career", career),
        )
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn background(&self) -> &Package {
        &self.background
    }

    pub fn career(&self) -> &Package {
        &self.career
    }

    pub fn sources(&self) -> &SourceGrants {
        &self.sources
    }

    pub fn stage(&self) -> Stage {
        self.stepper.stage()
    }

    pub fn stepper(&self) -> &FinalizationStepper {
        &self.stepper
    }

    pub fn ledger(&self) -> &ImprovementLedger {
        self.stepper.ledger()
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    /// Merge with generic entries and per-grant origins kept
    pub fn unfiltered_skills(&self) -> Result<Vec<ResolvedSkill>> {
        Ok(merge_unfiltered(
            &self.sources.parse(Source::Background)?,
            &self.sources.parse(Source::Career)?,
        ))
    }

    /// Filtered merge of the package grants
    pub fn merged_skills(&self) -> Result<Vec<ResolvedSkill>> {
        Ok(merge(
            &self.sources.parse(Source::Background)?,
            &self.sources.parse(Source::Career)?,
        ))
    }

    /// Skills as displayed: filtered merge plus the improvement ledger
    pub fn skills(&self) -> Result<Vec<ResolvedSkill>> {
        Ok(self.stepper.ledger().apply(&self.merged_skills()?))
    }

    pub fn pending_choices(&self) -> impl Iterator<Item = &Choice> {
        self.queue.pending()
    }

    pub fn current_choice(&self) -> Option<&Choice> {
        self.queue.current()
    }

    pub fn has_pending_choices(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn resolved_choices(&self) -> &[Choice] {
        self.queue.resolved()
    }

    /// Resolve the current choice
    pub fn choose(&mut self, specialization: &str) -> Result<Resolution> {
        let resolution = self.queue.resolve_current(&mut self.sources, specialization)?;
        self.after_resolution()?;
        Ok(resolution)
    }

    /// Resolve a choice by key; stale keys are discarded without error
    pub fn resolve(&mut self, key: &InstanceKey, specialization: &str) -> Result<Resolution> {
        let resolution = self.queue.resolve(&mut self.sources, key, specialization)?;
        self.after_resolution()?;
        Ok(resolution)
    }

    pub fn begin_finalization(&mut self) -> Result<()> {
        if self.has_pending_choices() {
            return Err(StepError::ChoicesPending(self.queue.len()).into());
        }
        self.stepper.begin()?;
        Ok(())
    }

    /// Pick (or re-pick) a career option; earlier improvements are dropped
    pub fn select_career_option(&mut self, option: CareerOption) -> Result<()> {
        self.stepper.choose_option(option)?;
        self.clear_improvements()
    }

    pub fn back_to_career_option(&mut self) -> Result<()> {
        self.stepper.rewind()?;
        self.clear_improvements()
    }

    /// Turn a pick into improvement grants
    ///
    /// Generic grants among them join the choice queue; once none are
    /// pending the ledger is rebuilt and the stepper moves to benefits.
    pub fn select_improvements(&mut self, pick: ImprovementPick) -> Result<()> {
        self.stepper.check_pick(&pick)?;
        let grants = plan_improvements(
            &pick,
            &self.merged_skills()?,
            &self.rules.skill_pairs,
            &self.rules.config,
        )?;
        tracing::info!("Improvements: {}", grants.join(", "));

        self.stepper.record_pick(pick)?;
        self.queue.forget(Source::Improvement);
        self.sources.replace(Source::Improvement, grants);
        self.refresh()?;

        if !self.queue.has_pending_from(Source::Improvement) {
            self.finish_improvements()?;
        }
        Ok(())
    }

    pub fn select_benefit(&mut self, benefit: Benefit) -> Result<()> {
        self.stepper.choose_benefit(benefit, &self.rules.config)?;
        Ok(())
    }

    pub fn complete(&mut self) -> Result<FinalCharacter> {
        self.stepper.complete()?;
        self.final_character()
    }

    /// Snapshot of the build in export shape
    pub fn final_character(&self) -> Result<FinalCharacter> {
        let skills = self
            .skills()?
            .into_iter()
            .map(|s| FinalSkill {
                name: s.name,
                level: s.level,
            })
            .collect();

        let equipment = self
            .background
            .equipment
            .iter()
            .chain(&self.career.equipment)
            .cloned()
            .collect();

        Ok(FinalCharacter {
            background: self.background.name.clone(),
            career: self.career.name.clone(),
            age: self.age,
            characteristics: self.characteristics()?,
            skills,
            career_option: self.stepper.option(),
            improvements: self.stepper.ledger().to_map(),
            benefit: self.stepper.benefit(),
            credits: self.background.credits + self.career.credits,
            equipment,
        })
    }

    /// Base scores plus package modifiers plus the benefit bonus
    pub fn characteristics(&self) -> Result<Characteristics> {
        let mut stats = self.base_characteristics;
        stats.apply_modifiers(&self.background.characteristic_modifiers)?;
        stats.apply_modifiers(&self.career.characteristic_modifiers)?;
        Ok(stats.with_bonus(self.stepper.characteristic_bonus()))
    }

    pub fn set_characteristics(&mut self, base: Characteristics) {
        self.base_characteristics = base;
    }

    pub fn roll_characteristics(&mut self, roller: &mut impl DiceRoller) -> Characteristics {
        self.base_characteristics = Characteristics::roll(roller);
        self.base_characteristics
    }

    /// Roll the career's starting age; `None` if the career has no age rule
    pub fn roll_age(&mut self, roller: &mut impl DiceRoller) -> Option<u32> {
        self.age = self.career.age.map(|rule| rule.determine(roller));
        self.age
    }

    fn after_resolution(&mut self) -> Result<()> {
        self.refresh()?;
        if self.stepper.awaiting_choices() && !self.queue.has_pending_from(Source::Improvement) {
            self.finish_improvements()?;
        }
        Ok(())
    }

    fn clear_improvements(&mut self) -> Result<()> {
        self.queue.forget(Source::Improvement);
        self.sources.clear(Source::Improvement);
        self.refresh()
    }

    fn finish_improvements(&mut self) -> Result<()> {
        let ledger = ImprovementLedger::rebuild(
            &self.sources.parse(Source::Improvement)?,
            &self.merged_skills()?,
            &self.rules.catalog,
        );
        self.stepper.replace_ledger(ledger);
        self.stepper.advance_to_benefits()?;
        Ok(())
    }

    fn refresh(&mut self) -> Result<()> {
        let unfiltered = self.unfiltered_skills()?;
        let mut detected = detect_choices(&unfiltered, &self.rules.catalog);
        detected.extend(detect_grant_choices(
            &self.sources.parse(Source::Improvement)?,
            &unfiltered,
            &self.rules.catalog,
        ));
        self.queue.refresh(detected);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::RngRoller;
    use crate::core::{BuildError, Characteristic};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_finalization_waits_for_choices() {
        let mut session = BuildSession::with_grants(&[], &["Electronics (any)-1"]).unwrap();
        assert!(matches!(
            session.begin_finalization(),
            Err(BuildError::Step(StepError::ChoicesPending(1)))
        ));

        session.choose("sensors").unwrap();
        session.begin_finalization().unwrap();
        assert_eq!(session.stage(), Stage::CareerOption);
    }

    #[test]
    fn test_invalid_package_is_rejected() {
        let result = BuildSession::with_grants(&["Streetwise"], &[]);
        assert!(matches!(result, Err(BuildError::InvalidPackage { .. })));
    }

    #[test]
    fn test_characteristics_include_modifiers_and_bonus() {
        let mut background = Package::new("Belter", &["Vacc Suit-1"]);
        background.characteristic_modifiers.insert("DEX".into(), 1);
        let mut career = Package::new("Navy", &["Admin-1"]);
        career.characteristic_modifiers.insert("dex".into(), 1);

        let mut session = BuildSession::new(Rules::standard(), background, career).unwrap();
        session.begin_finalization().unwrap();
        session.select_career_option(CareerOption::RaiseToMax).unwrap();
        session
            .select_improvements(ImprovementPick::RaiseToMax("Admin".into()))
            .unwrap();
        session
            .select_benefit(Benefit::CharacteristicIncrease(Characteristic::Dexterity))
            .unwrap();

        assert_eq!(session.characteristics().unwrap().get(Characteristic::Dexterity), 10);
    }

    #[test]
    fn test_age_uses_career_rule() {
        let mut career = Package::new("Scout", &["Recon-1"]);
        career.age = Some(crate::character::AgeRule {
            base: 18,
            dice: crate::character::DiceSpec::new(2, 6, 0),
        });
        let mut session =
            BuildSession::new(Rules::standard(), Package::new("Spacer", &[]), career).unwrap();

        let mut roller = RngRoller::new(ChaCha8Rng::seed_from_u64(3));
        let age = session.roll_age(&mut roller).unwrap();
        assert!((20..=30).contains(&age));
        assert_eq!(session.age(), Some(age));
    }
}
