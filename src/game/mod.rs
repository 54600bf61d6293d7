//! Level progression core: stage machine, quiz engine, target board.
//!
//! Nothing in here does I/O apart from catalog loading. Every transition is a
//! synchronous function of the current state and one input; time only enters
//! through the `now` passed in by the caller.

mod campaign;
pub use campaign::{Campaign, CampaignEntry, Destination};

mod catalog;
pub use catalog::{Catalog, CatalogEntry};

mod error;
pub use error::{
    CampaignError, CampaignResult, CatalogError, CatalogResult, ContentError, ContentResult,
};

mod event;
pub use event::GameEvent;

mod level;
pub use level::{Level, MiniGame, VideoSegment};

mod minigame;
pub use minigame::{ClickEvent, Target, TargetBoard};

mod quiz;
pub use quiz::{AnswerOutcome, QuestionProgress, QuizOption, QuizProgress, QuizQuestion, QuizSession};

mod run;
pub use run::LevelRun;

mod stage;
pub use stage::{PlaybackControl, Stage, StageShape, Trigger, VideoPlayback, advance};

mod timer;
pub use timer::{Clock, ManualClock, Scheduled, Timing, TokioClock, take_due};
