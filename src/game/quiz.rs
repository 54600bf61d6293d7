use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::game::error::{ContentError, ContentResult};
use crate::game::timer::{Scheduled, take_due};

#[derive(Debug, Clone, PartialEq)]
pub struct QuizOption {
    label: String,
    icon: String,
    correct: bool,
}

impl QuizOption {
    pub fn new<L: Into<String>, I: Into<String>>(label: L, icon: I, correct: bool) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
            correct,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn is_correct(&self) -> bool {
        self.correct
    }
}

/// Immutable question content. Per-attempt state lives in [`QuestionProgress`].
#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    prompt: String,
    options: Vec<QuizOption>,
}

impl QuizQuestion {
    /// `position` is only used to label the error.
    pub fn new<P: Into<String>>(
        position: usize,
        prompt: P,
        options: Vec<QuizOption>,
    ) -> ContentResult<Self> {
        if options.is_empty() {
            return Err(ContentError::NoOptions { question: position });
        }
        if !options.iter().any(QuizOption::is_correct) {
            return Err(ContentError::NoCorrectOption { question: position });
        }

        Ok(Self {
            prompt: prompt.into(),
            options,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionProgress {
    answered: bool,
    was_correct: bool,
}

impl QuestionProgress {
    pub fn answered(&self) -> bool {
        self.answered
    }

    /// Meaningless until `answered` is set.
    pub fn was_correct(&self) -> bool {
        self.was_correct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizProgress {
    /// Moved on to the question at this index.
    Advanced(usize),
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingAdvance {
    NextQuestion,
    Finish,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Arc<[QuizQuestion]>,
    progress: Vec<QuestionProgress>,
    current: usize,
    pending: Option<Scheduled<PendingAdvance>>,
    complete: bool,
    advance_delay: Duration,
}

impl QuizSession {
    pub fn new(questions: Arc<[QuizQuestion]>, advance_delay: Duration) -> ContentResult<Self> {
        if questions.is_empty() {
            return Err(ContentError::EmptyQuiz);
        }

        Ok(Self::from_checked(questions, advance_delay))
    }

    /// Caller guarantees `questions` is not empty.
    pub(crate) fn from_checked(questions: Arc<[QuizQuestion]>, advance_delay: Duration) -> Self {
        debug_assert!(!questions.is_empty());
        Self {
            progress: vec![QuestionProgress::default(); questions.len()],
            questions,
            current: 0,
            pending: None,
            complete: false,
            advance_delay,
        }
    }

    /// Same questions, nothing answered.
    pub fn restarted(&self) -> Self {
        Self::from_checked(Arc::clone(&self.questions), self.advance_delay)
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub fn submit_answer(&mut self, option_index: usize, now: Instant) -> AnswerOutcome {
        if self.complete {
            tracing::trace!("quiz already complete");
            return AnswerOutcome::Ignored;
        }

        let question = &self.questions[self.current];
        let Some(option) = question.options().get(option_index) else {
            tracing::trace!("option {} out of range", option_index);
            return AnswerOutcome::Ignored;
        };

        let progress = &mut self.progress[self.current];
        if progress.answered {
            tracing::trace!("question {} already answered", self.current);
            return AnswerOutcome::Ignored;
        }

        progress.answered = true;
        progress.was_correct = option.is_correct();

        if !option.is_correct() {
            tracing::debug!("question {} answered wrong", self.current);
            return AnswerOutcome::Incorrect;
        }

        let task = if self.current + 1 < self.questions.len() {
            PendingAdvance::NextQuestion
        } else {
            PendingAdvance::Finish
        };
        self.pending = Some(Scheduled::new(now, self.advance_delay, task));
        tracing::debug!("question {} answered correctly", self.current);

        AnswerOutcome::Correct
    }

    /// Applies the scheduled advance if it is due.
    pub fn poll(&mut self, now: Instant) -> Option<QuizProgress> {
        match take_due(&mut self.pending, now)? {
            PendingAdvance::NextQuestion => {
                self.current += 1;
                tracing::debug!("quiz moved to question {}", self.current);
                Some(QuizProgress::Advanced(self.current))
            }
            PendingAdvance::Finish => {
                self.complete = true;
                tracing::debug!("quiz complete");
                Some(QuizProgress::Completed)
            }
        }
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due())
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    pub fn current_progress(&self) -> QuestionProgress {
        self.progress[self.current]
    }

    pub fn progress(&self) -> &[QuestionProgress] {
        &self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The current question was answered wrong and can only be left by a restart.
    pub fn is_locked(&self) -> bool {
        let progress = self.current_progress();
        progress.answered && !progress.was_correct
    }

    pub fn correct_answers(&self) -> usize {
        self.progress
            .iter()
            .filter(|p| p.answered && p.was_correct)
            .count()
    }
}
