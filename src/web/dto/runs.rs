use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{Destination, GameEvent, LevelRun, PlaybackControl, QuizSession, Stage};
use crate::web::state::RunRecord;

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StartRunRequest {
    pub level_id: u32,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlaybackRequest {
    pub control: PlaybackControl,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AnswerRequest {
    pub option_index: usize,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StageResponse {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<u32>,
}

impl From<Stage> for StageResponse {
    fn from(stage: Stage) -> Self {
        Self {
            name: stage.name().to_string(),
            segment: stage.segment(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct VideoResponse {
    pub segment: u32,
    pub total: u32,
    pub title: String,
    pub captions: Vec<String>,
    pub playing: bool,
    pub replays: u32,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TargetResponse {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub found: bool,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BoardResponse {
    pub prompt: String,
    pub targets: Vec<TargetResponse>,
    pub found: usize,
    pub total: usize,
    pub misses: u32,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OptionResponse {
    pub label: String,
    pub icon: String,
    /// Only revealed once the question is answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct QuizResponse {
    pub question: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionResponse>,
    pub answered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_correct: Option<bool>,
    pub locked: bool,
    pub complete: bool,
    pub correct_answers: usize,
}

impl From<&QuizSession> for QuizResponse {
    fn from(quiz: &QuizSession) -> Self {
        let progress = quiz.current_progress();
        let answered = progress.answered();

        Self {
            question: quiz.current_index(),
            total: quiz.len(),
            prompt: quiz.current_question().prompt().to_string(),
            options: quiz
                .current_question()
                .options()
                .iter()
                .map(|o| OptionResponse {
                    label: o.label().to_string(),
                    icon: o.icon().to_string(),
                    correct: answered.then(|| o.is_correct()),
                })
                .collect(),
            answered,
            was_correct: answered.then(|| progress.was_correct()),
            locked: quiz.is_locked(),
            complete: quiz.is_complete(),
            correct_answers: quiz.correct_answers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventResponse {
    StageChanged { from: String, to: String },
    SegmentEnded { segment: u32 },
    MatchFound { target: u32 },
    NonMatchSelected { target: u32 },
    AllMatchesFound,
    AnswerCorrect { question: usize },
    AnswerIncorrect { question: usize },
    QuestionAdvanced { question: usize },
    QuizRestarted,
    QuizComplete,
    LevelComplete { level: u32, badge: String },
}

impl From<&GameEvent> for EventResponse {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::StageChanged { from, to } => Self::StageChanged {
                from: from.to_string(),
                to: to.to_string(),
            },
            GameEvent::SegmentEnded { segment } => Self::SegmentEnded { segment: *segment },
            GameEvent::MatchFound { target } => Self::MatchFound { target: *target },
            GameEvent::NonMatchSelected { target } => Self::NonMatchSelected { target: *target },
            GameEvent::AllMatchesFound => Self::AllMatchesFound,
            GameEvent::AnswerCorrect { question } => Self::AnswerCorrect {
                question: *question,
            },
            GameEvent::AnswerIncorrect { question } => Self::AnswerIncorrect {
                question: *question,
            },
            GameEvent::QuestionAdvanced { question } => Self::QuestionAdvanced {
                question: *question,
            },
            GameEvent::QuizRestarted => Self::QuizRestarted,
            GameEvent::QuizComplete => Self::QuizComplete,
            GameEvent::LevelComplete { level, badge } => Self::LevelComplete {
                level: *level,
                badge: badge.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DestinationResponse {
    Level { level_id: u32 },
    Home,
}

impl From<Destination> for DestinationResponse {
    fn from(destination: Destination) -> Self {
        match destination {
            Destination::Level(level_id) => Self::Level { level_id },
            Destination::Home => Self::Home,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RunResponse {
    pub id: Uuid,
    pub level_id: u32,
    pub started_at: DateTime<Utc>,
    pub stage: StageResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardResponse>,
    pub quiz: QuizResponse,
    /// A transition is scheduled and will apply on a later request
    pub pending: bool,
    pub events: Vec<EventResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<DestinationResponse>,
}

impl RunResponse {
    pub fn new(id: Uuid, record: &RunRecord, events: &[GameEvent]) -> Self {
        let run = record.run();

        Self {
            id,
            level_id: run.level().id(),
            started_at: record.started_at(),
            stage: run.stage().into(),
            video: video_response(run),
            board: board_response(run),
            quiz: run.quiz().into(),
            pending: run.next_deadline().is_some(),
            events: events.iter().map(EventResponse::from).collect(),
            destination: record.destination().map(DestinationResponse::from),
        }
    }
}

fn video_response(run: &LevelRun) -> Option<VideoResponse> {
    let index = run.stage().segment()?;
    let segment = run.level().segment(index)?;
    let playback = run.playback_state();

    Some(VideoResponse {
        segment: index,
        total: run.level().shape().segments,
        title: segment.title().to_string(),
        captions: segment.captions().to_vec(),
        playing: playback.playing(),
        replays: playback.replays(),
    })
}

fn board_response(run: &LevelRun) -> Option<BoardResponse> {
    let board = run.board()?;
    let prompt = run.level().mini_game()?.prompt().to_string();

    Some(BoardResponse {
        prompt,
        targets: board
            .targets()
            .iter()
            .map(|t| {
                let (x, y) = t.position();
                TargetResponse {
                    id: t.id(),
                    x,
                    y,
                    found: t.found(),
                }
            })
            .collect(),
        found: board.found_count(),
        total: board.match_count(),
        misses: board.misses(),
    })
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContinueResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<DestinationResponse>,
}
