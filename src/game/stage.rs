//! Per-level stage machine.
//!
//! Stages only move forward. Replaying a video segment is a playback concern
//! and never touches the stage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Intro,
    /// 1-based index into the level's video segments.
    VideoSegment(u32),
    MiniGame,
    Quiz,
    Completion,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::VideoSegment(_) => "video_segment",
            Self::MiniGame => "mini_game",
            Self::Quiz => "quiz",
            Self::Completion => "completion",
        }
    }

    pub fn segment(&self) -> Option<u32> {
        match self {
            Self::VideoSegment(index) => Some(*index),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completion)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VideoSegment(index) => write!(f, "video_segment({index})"),
            other => f.write_str(other.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    SegmentEnd,
    AllMatchesFound,
    QuizComplete,
    Continue,
}

/// What `advance` needs to know about a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageShape {
    pub segments: u32,
    pub has_mini_game: bool,
}

impl StageShape {
    fn after_videos(&self) -> Stage {
        if self.has_mini_game {
            Stage::MiniGame
        } else {
            Stage::Quiz
        }
    }
}

/// Computes the stage following `current` on `trigger`. Triggers that are not
/// valid for `current` leave it unchanged.
pub fn advance(current: Stage, trigger: Trigger, shape: StageShape) -> Stage {
    let next = match (current, trigger) {
        (Stage::Intro, Trigger::Start) if shape.segments == 0 => shape.after_videos(),
        (Stage::Intro, Trigger::Start) => Stage::VideoSegment(1),
        (Stage::VideoSegment(i), Trigger::SegmentEnd) if i < shape.segments => {
            Stage::VideoSegment(i + 1)
        }
        (Stage::VideoSegment(_), Trigger::SegmentEnd) => shape.after_videos(),
        (Stage::MiniGame, Trigger::AllMatchesFound) => Stage::Quiz,
        (Stage::Quiz, Trigger::QuizComplete) => Stage::Completion,
        // leaving the level is up to the host
        (Stage::Completion, Trigger::Continue) => Stage::Completion,
        (stage, trigger) => {
            tracing::trace!("ignoring {:?} in stage {}", trigger, stage);
            stage
        }
    };

    if next != current {
        tracing::debug!("stage {} -> {}", current, next);
    }
    next
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackControl {
    Play,
    Pause,
    Replay,
}

/// Play/pause state of the current video segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoPlayback {
    playing: bool,
    replays: u32,
}

impl VideoPlayback {
    pub fn apply(&mut self, control: PlaybackControl) {
        match control {
            PlaybackControl::Play => self.playing = true,
            PlaybackControl::Pause => self.playing = false,
            PlaybackControl::Replay => {
                self.playing = true;
                self.replays += 1;
            }
        }
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    pub fn replays(&self) -> u32 {
        self.replays
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
