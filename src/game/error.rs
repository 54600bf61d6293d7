use thiserror::Error;

pub type ContentResult<T> = std::result::Result<T, ContentError>;
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
pub type CampaignResult<T> = std::result::Result<T, CampaignError>;

/// Level content that would break an invariant of the state machines.
#[derive(Debug, Error, PartialEq)]
pub enum ContentError {
    #[error("level title is empty")]
    EmptyTitle,
    #[error("level has no quiz questions")]
    EmptyQuiz,
    #[error("question {question} has no options")]
    NoOptions { question: usize },
    #[error("question {question} has no correct option")]
    NoCorrectOption { question: usize },
    #[error("mini-game has no matching targets")]
    NoMatchingTargets,
    #[error("mini-game target {id} is defined twice")]
    DuplicateTarget { id: u32 },
    #[error("mini-game target {id} is outside the 0..=100 grid ({x}, {y})")]
    TargetOutOfBounds { id: u32, x: f32, y: f32 },
    #[error("progress {0} is above 100")]
    ProgressOutOfRange(u8),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("de error: {0}")]
    TomlDeError(#[from] toml::de::Error),
    #[error("level {level}: {error}")]
    InvalidLevel { level: u32, error: ContentError },
    #[error("level {0} is defined twice")]
    DuplicateLevel(u32),
    #[error("catalog has no levels")]
    Empty,
}

#[derive(Debug, Error, PartialEq)]
pub enum CampaignError {
    #[error("level {0} does not exist")]
    UnknownLevel(u32),
    #[error("level {0} is locked")]
    LevelLocked(u32),
}
