use crate::game::stage::Stage;

/// Things a run reports back to its host, which decides how to show them.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StageChanged { from: Stage, to: Stage },
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

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StageChanged { .. } => "stage_changed",
            Self::SegmentEnded { .. } => "segment_ended",
            Self::MatchFound { .. } => "match_found",
            Self::NonMatchSelected { .. } => "non_match_selected",
            Self::AllMatchesFound => "all_matches_found",
            Self::AnswerCorrect { .. } => "answer_correct",
            Self::AnswerIncorrect { .. } => "answer_incorrect",
            Self::QuestionAdvanced { .. } => "question_advanced",
            Self::QuizRestarted => "quiz_restarted",
            Self::QuizComplete => "quiz_complete",
            Self::LevelComplete { .. } => "level_complete",
        }
    }
}
