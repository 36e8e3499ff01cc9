use thiserror::Error;

/// A grant string does not match `"Name[ (spec)]-level"`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrantParseError {
    #[error("'{0}' has no '-<level>' suffix")]
    MissingLevel(String),

    #[error("'{grant}' has a non-numeric level '{level}'")]
    InvalidLevel { grant: String, level: String },

    #[error("'{0}' has an empty skill name")]
    EmptyName(String),

    #[error("'{0}' has unbalanced or trailing text around its parentheses")]
    MalformedSpecialization(String),
}

/// A choice was resolved out of protocol
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChoiceStateError {
    #[error("Choice {0} was already resolved")]
    AlreadyResolved(String),

    #[error("Choice {0} is not the current choice")]
    OutOfOrder(String),

    #[error("No choice is pending")]
    NoPendingChoice,

    #[error("'{specialization}' is not an option for {skill}")]
    UnknownCandidate { skill: String, specialization: String },

    #[error("'{specialization}' is blocked for {skill}: {reason}")]
    CandidateBlocked {
        skill: String,
        specialization: String,
        reason: String,
    },
}

/// An illegal finalization transition or selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("Cannot {action} during the {stage} stage")]
    InvalidTransition { stage: String, action: &'static str },

    #[error("{0} skill choice(s) must be resolved first")]
    ChoicesPending(usize),

    #[error("Selection does not match career option {0}")]
    OptionMismatch(String),

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("{skill} is not eligible: {reason}")]
    IneligibleSkill { skill: String, reason: String },

    #[error("Expected {expected} skills, got {got}")]
    WrongSkillCount { expected: usize, got: usize },

    #[error("{0} was selected more than once")]
    DuplicateSkill(String),

    #[error("No skill pair at index {0}")]
    UnknownSkillPair(usize),

    #[error("No benefit has been selected")]
    NoBenefitSelected,
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Malformed skill grant: {0}")]
    Parse(#[from] GrantParseError),

    #[error("Package '{package}' has a malformed skill grant: {error}")]
    InvalidPackage {
        package: String,
        error: GrantParseError,
    },

    #[error("Choice error: {0}")]
    Choice(#[from] ChoiceStateError),

    #[error("Finalization error: {0}")]
    Step(#[from] StepError),

    #[error("Invalid dice expression: {0}")]
    Dice(String),

    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BuildError>;
