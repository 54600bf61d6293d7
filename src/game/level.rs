use std::sync::Arc;

use crate::game::error::{ContentError, ContentResult};
use crate::game::minigame::{Target, TargetBoard};
use crate::game::quiz::QuizQuestion;
use crate::game::stage::StageShape;

/// Opaque video content; the core only counts segments.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSegment {
    title: String,
    captions: Vec<String>,
}

impl VideoSegment {
    pub fn new<T: Into<String>>(title: T, captions: Vec<String>) -> Self {
        Self {
            title: title.into(),
            captions,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn captions(&self) -> &[String] {
        &self.captions
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiniGame {
    prompt: String,
    board: TargetBoard,
}

impl MiniGame {
    pub fn new<P: Into<String>>(prompt: P, targets: Vec<Target>) -> ContentResult<Self> {
        Ok(Self {
            prompt: prompt.into(),
            board: TargetBoard::new(targets)?,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Untouched board every run starts from.
    pub fn board(&self) -> &TargetBoard {
        &self.board
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    id: u32,
    title: String,
    badge: String,
    segments: Vec<VideoSegment>,
    mini_game: Option<MiniGame>,
    questions: Arc<[QuizQuestion]>,
    intro: String,
}

impl Level {
    pub fn new<T: Into<String>, B: Into<String>>(
        id: u32,
        title: T,
        badge: B,
        segments: Vec<VideoSegment>,
        mini_game: Option<MiniGame>,
        questions: Vec<QuizQuestion>,
    ) -> ContentResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ContentError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(ContentError::EmptyQuiz);
        }

        Ok(Self {
            id,
            title,
            badge: badge.into(),
            segments,
            mini_game,
            questions: questions.into(),
            intro: String::new(),
        })
    }

    pub fn with_intro<I: Into<String>>(mut self, intro: I) -> Self {
        self.intro = intro.into();
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn badge(&self) -> &str {
        &self.badge
    }

    pub fn intro(&self) -> &str {
        &self.intro
    }

    pub fn segments(&self) -> &[VideoSegment] {
        &self.segments
    }

    /// `index` is 1-based, as carried by `Stage::VideoSegment`.
    pub fn segment(&self, index: u32) -> Option<&VideoSegment> {
        let index = usize::try_from(index).ok()?.checked_sub(1)?;
        self.segments.get(index)
    }

    pub fn mini_game(&self) -> Option<&MiniGame> {
        self.mini_game.as_ref()
    }

    pub fn questions(&self) -> &Arc<[QuizQuestion]> {
        &self.questions
    }

    pub fn shape(&self) -> StageShape {
        StageShape {
            segments: self.segments.len() as u32,
            has_mini_game: self.mini_game.is_some(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::quiz::QuizOption;

    fn question() -> QuizQuestion {
        QuizQuestion::new(0, "Does radar work at night?", vec![QuizOption::new("Yes", "🌙", true)])
            .unwrap()
    }

    #[test]
    fn test_level_shape_and_segments() {
        let level = Level::new(
            1,
            "Learn SAR",
            "Radar Explorer",
            vec![VideoSegment::new("SAR", vec![]), VideoSegment::new("Clouds", vec![])],
            None,
            vec![question()],
        )
        .unwrap();

        assert_eq!(
            level.shape(),
            StageShape {
                segments: 2,
                has_mini_game: false
            }
        );
        assert_eq!(level.segment(1).map(VideoSegment::title), Some("SAR"));
        assert_eq!(level.segment(2).map(VideoSegment::title), Some("Clouds"));
        assert!(level.segment(0).is_none());
        assert!(level.segment(3).is_none());
    }

    #[test]
    fn test_level_validation() {
        let err = Level::new(1, "  ", "b", vec![], None, vec![question()]).unwrap_err();
        assert_eq!(err, ContentError::EmptyTitle);

        let err = Level::new(1, "t", "b", vec![], None, vec![]).unwrap_err();
        assert_eq!(err, ContentError::EmptyQuiz);
    }
}
