//! End-to-end character builds through the public session API

use career_forge::character::{DiceSpec, RngRoller};
use career_forge::core::{
    BuildError, Characteristic, ChoiceStateError, SkillSource, Source, StepError,
};
use career_forge::finalize::{Benefit, CareerOption, ImprovementPick, Stage};
use career_forge::rules::{builtin_packages, Rules};
use career_forge::skills::{CandidateStatus, Resolution};
use career_forge::BuildSession;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn levels(session: &BuildSession) -> Vec<(String, u8)> {
    session
        .skills()
        .unwrap()
        .into_iter()
        .map(|s| (s.name, s.level))
        .collect()
}

fn level(session: &BuildSession, name: &str) -> Option<u8> {
    session
        .skills()
        .unwrap()
        .into_iter()
        .find(|s| s.name == name)
        .map(|s| s.level)
}

fn at_career_option(background: &[&str], career: &[&str]) -> BuildSession {
    let mut session = BuildSession::with_grants(background, career).unwrap();
    session.begin_finalization().unwrap();
    session
}

#[test]
fn test_unambiguous_grants_merge_without_choices() {
    let session = BuildSession::with_grants(
        &["Profession (belter)-2", "Jack-of-All-Trades-1"],
        &["Admin-1"],
    )
    .unwrap();

    assert!(!session.has_pending_choices());
    assert_eq!(
        levels(&session),
        vec![
            ("Admin".to_string(), 1),
            ("Jack-Of-All-Trades".to_string(), 1),
            ("Profession (Belter)".to_string(), 2),
        ]
    );
}

#[test]
fn test_any_grant_resolves_to_chosen_specialization() {
    let mut session =
        BuildSession::with_grants(&["Streetwise-2"], &["Electronics (any)-1"]).unwrap();

    let choice = session.current_choice().unwrap();
    assert_eq!(choice.skill_name, "Electronics");
    assert_eq!(choice.candidates.len(), 4);
    assert!(choice
        .candidates
        .iter()
        .all(|c| c.status == CandidateStatus::New));

    session.choose("computers").unwrap();
    assert!(!session.has_pending_choices());
    assert_eq!(
        levels(&session),
        vec![
            ("Electronics (Computers)".to_string(), 1),
            ("Streetwise".to_string(), 2),
        ]
    );
    assert_eq!(session.resolved_choices().len(), 1);
}

#[test]
fn test_skill_pair_queues_gunner_and_applies_mechanic() {
    let mut session = at_career_option(&[], &["Admin-1"]);
    session.select_career_option(CareerOption::SkillPair).unwrap();
    session.select_improvements(ImprovementPick::SkillPair(0)).unwrap();

    // Gunner needs a specialization; Mechanic has none
    assert_eq!(session.stage(), Stage::SkillImprovement(CareerOption::SkillPair));
    let choice = session.current_choice().unwrap();
    assert_eq!(choice.skill_name, "Gunner");
    assert_eq!(choice.candidates.len(), 4);
    assert!(choice
        .candidates
        .iter()
        .all(|c| c.status == CandidateStatus::New));
    assert_eq!(session.pending_choices().count(), 1);

    session.choose("turret").unwrap();
    assert_eq!(session.stage(), Stage::Benefits);
    assert_eq!(level(&session, "Gunner (Turret)"), Some(1));
    assert_eq!(level(&session, "Mechanic"), Some(1));
    assert_eq!(session.ledger().get("Gunner (Turret)"), 1);
    assert_eq!(session.ledger().get("Mechanic"), 1);
}

#[test]
fn test_skill_pair_on_held_skill_has_no_effect() {
    let mut session = at_career_option(&["Mechanic-1"], &["Admin-1"]);
    session.select_career_option(CareerOption::SkillPair).unwrap();
    session.select_improvements(ImprovementPick::SkillPair(0)).unwrap();
    session.choose("screen").unwrap();

    assert_eq!(session.ledger().get("Mechanic"), 0);
    assert_eq!(level(&session, "Mechanic"), Some(1));
    assert_eq!(level(&session, "Gunner (Screen)"), Some(1));
}

#[test]
fn test_level_up_replaces_lower_grant() {
    let mut session =
        BuildSession::with_grants(&["Melee (unarmed)-1"], &["Melee (any)-2"]).unwrap();

    let choice = session.current_choice().unwrap();
    assert_eq!(choice.current_level, 1);
    assert_eq!(
        choice.candidate("unarmed").unwrap().status,
        CandidateStatus::LevelUp
    );

    match session.choose("unarmed").unwrap() {
        Resolution::Resolved { removed, .. } => assert_eq!(removed, vec!["Melee (unarmed)-1"]),
        other => panic!("unexpected {:?}", other),
    }

    let melee: Vec<(String, u8)> = levels(&session)
        .into_iter()
        .filter(|(name, _)| name.starts_with("Melee"))
        .collect();
    assert_eq!(melee, vec![("Melee (Unarmed)".to_string(), 2)]);
}

#[test]
fn test_background_level_up_keeps_career_skill_eligible() {
    let mut session =
        BuildSession::with_grants(&["Melee (any)-2"], &["Melee (unarmed)-1", "Admin-1"]).unwrap();

    match session.choose("unarmed").unwrap() {
        Resolution::Resolved { removed, .. } => assert_eq!(removed, vec!["Melee (unarmed)-1"]),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(session.sources().texts(Source::Career), vec!["Admin-1"]);

    let melee = session
        .skills()
        .unwrap()
        .into_iter()
        .find(|s| s.name == "Melee (Unarmed)")
        .unwrap();
    assert_eq!(melee.level, 2);
    assert_eq!(melee.source, SkillSource::Combined);

    session.begin_finalization().unwrap();
    session.select_career_option(CareerOption::RaiseToMax).unwrap();
    session
        .select_improvements(ImprovementPick::RaiseToMax("Melee (Unarmed)".into()))
        .unwrap();
    assert_eq!(session.stage(), Stage::Benefits);
    assert_eq!(level(&session, "Melee (Unarmed)"), Some(4));
}

#[test]
fn test_blocked_candidate_cannot_be_chosen() {
    let mut session =
        BuildSession::with_grants(&["Science (biology)-2"], &["Science (any)-1"]).unwrap();

    let choice = session.current_choice().unwrap();
    assert_eq!(
        choice.candidate("biology").unwrap().status,
        CandidateStatus::Blocked
    );

    let err = session.choose("biology").unwrap_err();
    assert!(matches!(
        err,
        BuildError::Choice(ChoiceStateError::CandidateBlocked { .. })
    ));
    assert!(session.has_pending_choices());

    session.choose("physics").unwrap();
    assert_eq!(level(&session, "Science (Biology)"), Some(2));
    assert_eq!(level(&session, "Science (Physics)"), Some(1));
}

#[test]
fn test_or_list_offers_only_listed_options() {
    let mut session = BuildSession::with_grants(
        &["Pilot (small craft or spacecraft)-1"],
        &["Admin-1"],
    )
    .unwrap();

    let names: Vec<&str> = session
        .current_choice()
        .unwrap()
        .candidates
        .iter()
        .map(|c| c.specialization.as_str())
        .collect();
    assert_eq!(names, vec!["Small Craft", "Spacecraft"]);

    assert!(session.choose("capital ships").is_err());
    session.choose("Spacecraft").unwrap();
    assert_eq!(level(&session, "Pilot (Spacecraft)"), Some(1));
}

#[test]
fn test_sibling_choices_resolve_in_order() {
    let mut session =
        BuildSession::with_grants(&["Gunner (any)-1"], &["Electronics (any)-1", "Gunner (any)-1"])
            .unwrap();

    let order: Vec<&str> = session
        .pending_choices()
        .map(|c| c.skill_name.as_str())
        .collect();
    assert_eq!(order, vec!["Gunner", "Electronics", "Gunner"]);

    session.choose("turret").unwrap();
    session.choose("sensors").unwrap();

    let last = session.current_choice().unwrap();
    assert_eq!(last.candidate("turret").unwrap().status, CandidateStatus::Blocked);
    session.choose("capital").unwrap();

    assert!(!session.has_pending_choices());
    assert_eq!(level(&session, "Gunner (Turret)"), Some(1));
    assert_eq!(level(&session, "Gunner (Capital)"), Some(1));
    assert_eq!(level(&session, "Electronics (Sensors)"), Some(1));
}

#[test]
fn test_stale_choice_is_discarded() {
    let mut session = BuildSession::with_grants(&[], &["Electronics (any)-1"]).unwrap();
    let key = session.current_choice().unwrap().instance_key.clone();

    session.choose("comms").unwrap();
    let err = session.resolve(&key, "sensors").unwrap_err();
    assert!(matches!(
        err,
        BuildError::Choice(ChoiceStateError::AlreadyResolved(_))
    ));

    let mut other = key.clone();
    other.slot = 99;
    assert_eq!(
        session.resolve(&other, "sensors").unwrap(),
        Resolution::Discarded(other)
    );
}

#[test]
fn test_ledger_is_rebuilt_when_option_changes() {
    let mut session = at_career_option(&[], &["Admin-1", "Vacc Suit-0", "Mechanic-1", "Recon-1"]);

    session.select_career_option(CareerOption::RaiseToMax).unwrap();
    session
        .select_improvements(ImprovementPick::RaiseToMax("Admin".into()))
        .unwrap();
    assert_eq!(session.stage(), Stage::Benefits);
    assert_eq!(level(&session, "Admin"), Some(4));

    session.select_career_option(CareerOption::RaiseThree).unwrap();
    assert!(session.ledger().is_empty());
    assert_eq!(level(&session, "Admin"), Some(1));

    session
        .select_improvements(ImprovementPick::RaiseThree(vec![
            "Vacc Suit".into(),
            "Mechanic".into(),
            "Recon".into(),
        ]))
        .unwrap();
    assert_eq!(level(&session, "Admin"), Some(1));
    assert_eq!(level(&session, "Vacc Suit"), Some(1));
    assert_eq!(level(&session, "Mechanic"), Some(2));
    assert_eq!(level(&session, "Recon"), Some(2));
    assert_eq!(session.ledger().len(), 3);
}

#[test]
fn test_back_discards_improvements() {
    let mut session = at_career_option(&[], &["Admin-1"]);
    session.select_career_option(CareerOption::SkillPair).unwrap();
    session.select_improvements(ImprovementPick::SkillPair(0)).unwrap();
    assert!(session.has_pending_choices());

    session.back_to_career_option().unwrap();
    assert_eq!(session.stage(), Stage::CareerOption);
    assert!(!session.has_pending_choices());
    assert!(session.sources().list(Source::Improvement).is_empty());
    assert_eq!(levels(&session), vec![("Admin".to_string(), 1)]);
}

#[test]
fn test_invalid_pick_keeps_stage() {
    let mut session = at_career_option(&["Streetwise-2"], &["Admin-1"]);
    session.select_career_option(CareerOption::RaiseToMax).unwrap();

    let err = session
        .select_improvements(ImprovementPick::RaiseToMax("Streetwise".into()))
        .unwrap_err();
    assert!(matches!(err, BuildError::Step(StepError::IneligibleSkill { .. })));
    assert_eq!(session.stage(), Stage::SkillImprovement(CareerOption::RaiseToMax));

    let err = session
        .select_improvements(ImprovementPick::SkillPair(0))
        .unwrap_err();
    assert!(matches!(err, BuildError::Step(StepError::OptionMismatch(_))));
}

#[test]
fn test_benefit_bonus_is_set_not_added() {
    let mut session = at_career_option(&[], &["Admin-1"]);
    session.select_career_option(CareerOption::RaiseToMax).unwrap();
    session
        .select_improvements(ImprovementPick::RaiseToMax("Admin".into()))
        .unwrap();

    let base = session.characteristics().unwrap().get(Characteristic::Education);
    session
        .select_benefit(Benefit::CharacteristicIncrease(Characteristic::Education))
        .unwrap();
    session
        .select_benefit(Benefit::CharacteristicIncrease(Characteristic::Education))
        .unwrap();
    assert_eq!(
        session.characteristics().unwrap().get(Characteristic::Education),
        base + 1
    );

    session.select_benefit(Benefit::Credits).unwrap();
    assert_eq!(
        session.characteristics().unwrap().get(Characteristic::Education),
        base
    );
}

#[test]
fn test_complete_requires_benefit() {
    let mut session = at_career_option(&[], &["Admin-1"]);
    session.select_career_option(CareerOption::RaiseToMax).unwrap();
    session
        .select_improvements(ImprovementPick::RaiseToMax("Admin".into()))
        .unwrap();

    assert!(matches!(
        session.complete(),
        Err(BuildError::Step(StepError::NoBenefitSelected))
    ));
}

#[test]
fn test_full_build_from_builtin_packages() {
    let book = builtin_packages().unwrap();
    let mut session = BuildSession::new(
        Rules::standard(),
        book.background("Belter").unwrap().clone(),
        book.career("Administrator").unwrap().clone(),
    )
    .unwrap();

    let mut roller = RngRoller::new(ChaCha8Rng::seed_from_u64(2024));
    let age = session.roll_age(&mut roller).unwrap();
    let rule = session.career().age.unwrap();
    assert_eq!(rule.dice, DiceSpec::new(2, 6, 0));
    assert!((24..=34).contains(&age));

    session.choose("computers").unwrap();
    session.begin_finalization().unwrap();
    session.select_career_option(CareerOption::RaiseToMax).unwrap();
    session
        .select_improvements(ImprovementPick::RaiseToMax("Admin".into()))
        .unwrap();
    session.select_benefit(Benefit::Weapon).unwrap();

    let character = session.complete().unwrap();
    assert_eq!(session.stage(), Stage::Complete);
    assert_eq!(character.background, "Belter");
    assert_eq!(character.career, "Administrator");
    assert_eq!(character.age, Some(age));
    assert_eq!(character.skill("Admin"), Some(4));
    assert_eq!(character.skill("Electronics (Computers)"), Some(1));
    assert_eq!(character.skill("Profession (Belter)"), Some(2));
    assert_eq!(character.improvements.get("Admin"), Some(&3));
    assert_eq!(character.characteristics.get(Characteristic::Dexterity), 8);
    assert_eq!(character.characteristics.get(Characteristic::Education), 8);
    assert_eq!(character.credits, 5000);
    assert_eq!(character.equipment, vec!["Vacc suit", "Hand computer"]);

    let mut names: Vec<&str> = character.skills.iter().map(|s| s.name.as_str()).collect();
    let count = names.len();
    names.dedup();
    assert_eq!(names.len(), count);

    let json: serde_json::Value = serde_json::from_str(&character.to_json().unwrap()).unwrap();
    assert_eq!(json["career_option"], "raise_to_max");
    assert_eq!(json["benefit"], "weapon");
    assert_eq!(json["characteristics"]["EDU"], 8);
    assert_eq!(json["improvements"]["Admin"], 3);
}
