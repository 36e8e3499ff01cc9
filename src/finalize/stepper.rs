//! Finalization state machine
//!
//! `Review -> CareerOption -> SkillImprovement -> Benefits -> Complete`.
//! Every (re-)entry into the career-option decision wipes everything that
//! was derived from the previous decision: the pick, the ledger, the
//! benefit and its characteristic bonus.

use crate::core::{Characteristic, ResolverConfig, StepError};
use crate::finalize::ledger::ImprovementLedger;
use crate::finalize::options::{Benefit, CareerOption, ImprovementPick};
use serde::Serialize;
use std::fmt;

/// Finalization stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Review,
    CareerOption,
    /// Sub-phase for the option picked in `CareerOption`
    SkillImprovement(CareerOption),
    Benefits,
    Complete,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Review => "review",
            Stage::CareerOption => "career option",
            Stage::SkillImprovement(_) => "skill improvement",
            Stage::Benefits => "benefits",
            Stage::Complete => "complete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FinalizationStepper {
    stage: Stage,
    option: Option<CareerOption>,
    pick: Option<ImprovementPick>,
    ledger: ImprovementLedger,
    benefit: Option<Benefit>,
    characteristic_bonus: Option<(Characteristic, i32)>,
}

impl FinalizationStepper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn option(&self) -> Option<CareerOption> {
        self.option
    }

    pub fn pick(&self) -> Option<&ImprovementPick> {
        self.pick.as_ref()
    }

    pub fn ledger(&self) -> &ImprovementLedger {
        &self.ledger
    }

    pub fn benefit(&self) -> Option<Benefit> {
        self.benefit
    }

    /// Benefit-sourced characteristic bonus
    pub fn characteristic_bonus(&self) -> Option<(Characteristic, i32)> {
        self.characteristic_bonus
    }

    /// A pick was made and its improvement choices are still open
    pub fn awaiting_choices(&self) -> bool {
        matches!(self.stage, Stage::SkillImprovement(_)) && self.pick.is_some()
    }

    /// Leave review and start the career-option decision
    pub fn begin(&mut self) -> Result<(), StepError> {
        if self.stage != Stage::Review {
            return Err(self.invalid("begin finalization"));
        }
        self.enter(Stage::CareerOption);
        Ok(())
    }

    /// Pick (or re-pick) a career option
    pub fn choose_option(&mut self, option: CareerOption) -> Result<(), StepError> {
        match self.stage {
            Stage::CareerOption | Stage::SkillImprovement(_) | Stage::Benefits => {
                self.reset_downstream();
                self.option = Some(option);
                self.enter(Stage::SkillImprovement(option));
                Ok(())
            }
            _ => Err(self.invalid("choose a career option")),
        }
    }

    /// Go back to the career-option decision, discarding everything after it
    pub fn rewind(&mut self) -> Result<(), StepError> {
        match self.stage {
            Stage::CareerOption => Ok(()),
            Stage::SkillImprovement(_) | Stage::Benefits => {
                self.reset_downstream();
                self.option = None;
                self.enter(Stage::CareerOption);
                Ok(())
            }
            _ => Err(self.invalid("return to the career option")),
        }
    }

    /// Check that a pick fits the current sub-phase
    pub fn check_pick(&self, pick: &ImprovementPick) -> Result<(), StepError> {
        match self.stage {
            Stage::SkillImprovement(option) if option == pick.option() => Ok(()),
            Stage::SkillImprovement(option) => Err(StepError::OptionMismatch(option.number().to_string())),
            _ => Err(self.invalid("select skill improvements")),
        }
    }

    /// Record a pick, dropping the ledger derived from any earlier one
    pub fn record_pick(&mut self, pick: ImprovementPick) -> Result<(), StepError> {
        self.check_pick(&pick)?;
        self.ledger = ImprovementLedger::new();
        self.pick = Some(pick);
        Ok(())
    }

    pub fn replace_ledger(&mut self, ledger: ImprovementLedger) {
        self.ledger = ledger;
    }

    pub fn advance_to_benefits(&mut self) -> Result<(), StepError> {
        if !self.awaiting_choices() {
            return Err(self.invalid("move on to benefits"));
        }
        self.enter(Stage::Benefits);
        Ok(())
    }

    /// Pick (or re-pick) the benefit
    ///
    /// A characteristic benefit sets the bonus outright; any other benefit
    /// clears it.
    pub fn choose_benefit(&mut self, benefit: Benefit, config: &ResolverConfig) -> Result<(), StepError> {
        if self.stage != Stage::Benefits {
            return Err(self.invalid("choose a benefit"));
        }
        self.benefit = Some(benefit);
        self.characteristic_bonus = match benefit {
            Benefit::CharacteristicIncrease(c) => Some((c, config.benefit_bonus)),
            _ => None,
        };
        tracing::info!("Benefit: {}", benefit.label());
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), StepError> {
        if self.stage != Stage::Benefits {
            return Err(self.invalid("complete the build"));
        }
        if self.benefit.is_none() {
            return Err(StepError::NoBenefitSelected);
        }
        self.enter(Stage::Complete);
        Ok(())
    }

    fn reset_downstream(&mut self) {
        self.pick = None;
        self.ledger = ImprovementLedger::new();
        self.benefit = None;
        self.characteristic_bonus = None;
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!("Finalization: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn invalid(&self, action: &'static str) -> StepError {
        StepError::InvalidTransition {
            stage: self.stage.to_string(),
            action,
        }
    }
}
