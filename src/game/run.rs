//! One play-through of a level.
//!
//! A run glues the stage machine to the quiz session and the target board and
//! owns the deferred transitions between them. Every operation polls due
//! timers first, so a transition scheduled earlier is always applied to the
//! state it was scheduled for.

use std::sync::Arc;

use tokio::time::Instant;

use crate::game::event::GameEvent;
use crate::game::level::Level;
use crate::game::minigame::{ClickEvent, TargetBoard};
use crate::game::quiz::{AnswerOutcome, QuizProgress, QuizSession};
use crate::game::stage::{PlaybackControl, Stage, Trigger, VideoPlayback, advance};
use crate::game::timer::{Scheduled, Timing, take_due};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageTask {
    LeaveMiniGame,
}

#[derive(Debug, Clone)]
pub struct LevelRun {
    level: Arc<Level>,
    stage: Stage,
    playback: VideoPlayback,
    board: Option<TargetBoard>,
    quiz: QuizSession,
    stage_timer: Option<Scheduled<StageTask>>,
    timing: Timing,
}

impl LevelRun {
    pub fn new(level: Arc<Level>, timing: Timing) -> Self {
        let quiz = QuizSession::from_checked(Arc::clone(level.questions()), timing.answer_advance());
        let board = level.mini_game().map(|game| game.board().clone());

        Self {
            level,
            stage: Stage::Intro,
            playback: VideoPlayback::default(),
            board,
            quiz,
            stage_timer: None,
            timing,
        }
    }

    #[tracing::instrument(level = "debug", skip(self), fields(level = self.level.id()))]
    pub fn start(&mut self, now: Instant) -> Vec<GameEvent> {
        let mut events = self.poll(now);
        self.transition(Trigger::Start, &mut events);
        events
    }

    #[tracing::instrument(level = "debug", skip(self), fields(level = self.level.id()))]
    pub fn end_segment(&mut self, now: Instant) -> Vec<GameEvent> {
        let mut events = self.poll(now);
        if let Some(segment) = self.stage.segment() {
            events.push(GameEvent::SegmentEnded { segment });
            self.transition(Trigger::SegmentEnd, &mut events);
        }
        events
    }

    /// Returns false when there is no video to control.
    pub fn playback(&mut self, control: PlaybackControl) -> bool {
        if self.stage.segment().is_none() {
            tracing::trace!("no video playing in stage {}", self.stage);
            return false;
        }
        self.playback.apply(control);
        true
    }

    #[tracing::instrument(level = "debug", skip(self), fields(level = self.level.id()))]
    pub fn click_target(&mut self, id: u32, now: Instant) -> Vec<GameEvent> {
        let mut events = self.poll(now);
        if self.stage != Stage::MiniGame {
            return events;
        }
        let Some(board) = self.board.as_mut() else {
            return events;
        };

        match board.click(id) {
            ClickEvent::Ignored => {}
            ClickEvent::MatchFound => events.push(GameEvent::MatchFound { target: id }),
            ClickEvent::NonMatchSelected => {
                events.push(GameEvent::NonMatchSelected { target: id })
            }
            ClickEvent::AllMatchesFound => {
                events.push(GameEvent::AllMatchesFound);
                self.stage_timer = Some(Scheduled::new(
                    now,
                    self.timing.minigame_exit(),
                    StageTask::LeaveMiniGame,
                ));
                events.extend(self.poll(now));
            }
        }
        events
    }

    #[tracing::instrument(level = "debug", skip(self), fields(level = self.level.id()))]
    pub fn submit_answer(&mut self, option_index: usize, now: Instant) -> Vec<GameEvent> {
        let mut events = self.poll(now);
        if self.stage != Stage::Quiz {
            return events;
        }

        let question = self.quiz.current_index();
        match self.quiz.submit_answer(option_index, now) {
            AnswerOutcome::Correct => {
                events.push(GameEvent::AnswerCorrect { question });
                events.extend(self.poll(now));
            }
            AnswerOutcome::Incorrect => events.push(GameEvent::AnswerIncorrect { question }),
            AnswerOutcome::Ignored => {}
        }
        events
    }

    /// Starts the quiz over when the current question was answered wrong.
    pub fn restart_quiz(&mut self, now: Instant) -> Vec<GameEvent> {
        let mut events = self.poll(now);
        if self.stage == Stage::Quiz && self.quiz.is_locked() {
            self.quiz = self.quiz.restarted();
            tracing::debug!("quiz restarted for level {}", self.level.id());
            events.push(GameEvent::QuizRestarted);
        }
        events
    }

    /// Applies every scheduled transition that is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<GameEvent> {
        let mut events = vec![];

        if let Some(StageTask::LeaveMiniGame) = take_due(&mut self.stage_timer, now) {
            self.transition(Trigger::AllMatchesFound, &mut events);
        }

        if self.stage == Stage::Quiz {
            match self.quiz.poll(now) {
                Some(QuizProgress::Advanced(question)) => {
                    events.push(GameEvent::QuestionAdvanced { question })
                }
                Some(QuizProgress::Completed) => {
                    events.push(GameEvent::QuizComplete);
                    if self.transition(Trigger::QuizComplete, &mut events) {
                        events.push(GameEvent::LevelComplete {
                            level: self.level.id(),
                            badge: self.level.badge().to_string(),
                        });
                    }
                }
                None => {}
            }
        }

        events
    }

    /// Earliest instant at which `poll` would change something.
    pub fn next_deadline(&self) -> Option<Instant> {
        let stage_due = self.stage_timer.map(|t| t.due());
        let quiz_due = match self.stage {
            Stage::Quiz => self.quiz.next_deadline(),
            _ => None,
        };

        match (stage_due, quiz_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn transition(&mut self, trigger: Trigger, events: &mut Vec<GameEvent>) -> bool {
        let from = self.stage;
        let to = advance(from, trigger, self.level.shape());
        if to == from {
            return false;
        }

        if to.segment().is_some() {
            self.playback.reset();
        }
        self.stage = to;
        events.push(GameEvent::StageChanged { from, to });
        true
    }

    pub fn level(&self) -> &Arc<Level> {
        &self.level
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn playback_state(&self) -> VideoPlayback {
        self.playback
    }

    pub fn board(&self) -> Option<&TargetBoard> {
        self.board.as_ref()
    }

    pub fn quiz(&self) -> &QuizSession {
        &self.quiz
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn is_complete(&self) -> bool {
        self.stage.is_terminal()
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::game::level::{MiniGame, VideoSegment};
    use crate::game::minigame::Target;
    use crate::game::quiz::{QuizOption, QuizQuestion};

    const ANSWER_DELAY: Duration = Duration::from_millis(1500);
    const EXIT_DELAY: Duration = Duration::from_millis(2000);

    fn timing() -> Timing {
        Timing::new(ANSWER_DELAY, EXIT_DELAY)
    }

    fn question(prompt: &str) -> QuizQuestion {
        QuizQuestion::new(
            0,
            prompt,
            vec![
                QuizOption::new("Too much rain", "☔", true),
                QuizOption::new("Too much sun", "☀️", false),
            ],
        )
        .unwrap()
    }

    fn segments(count: usize) -> Vec<VideoSegment> {
        (1..=count)
            .map(|i| VideoSegment::new(format!("part {i}"), vec![]))
            .collect()
    }

    fn level(segment_count: usize, with_game: bool, questions: usize) -> Arc<Level> {
        let mini_game = with_game.then(|| {
            MiniGame::new(
                "Find the flooded villages",
                vec![
                    Target::new(1, 20.0, 30.0, true),
                    Target::new(2, 45.0, 20.0, false),
                    Target::new(3, 70.0, 35.0, true),
                ],
            )
            .unwrap()
        });
        let questions = (0..questions).map(|i| question(&format!("q{i}"))).collect();

        Arc::new(
            Level::new(7, "Flood Expert", "Flood Explorer", segments(segment_count), mini_game, questions)
                .unwrap(),
        )
    }

    fn stages(events: &[GameEvent]) -> Vec<Stage> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::StageChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_two_segments_one_question_scenario() {
        let mut run = LevelRun::new(level(2, false, 1), timing());
        let mut now = Instant::now();
        let mut events = vec![];

        events.extend(run.start(now));
        events.extend(run.end_segment(now));
        events.extend(run.end_segment(now));
        events.extend(run.submit_answer(0, now));
        assert_eq!(run.stage(), Stage::Quiz);

        now += ANSWER_DELAY;
        events.extend(run.poll(now));

        assert_eq!(
            stages(&events),
            vec![
                Stage::VideoSegment(1),
                Stage::VideoSegment(2),
                Stage::Quiz,
                Stage::Completion
            ]
        );
        assert!(events.contains(&GameEvent::QuizComplete));
        assert!(events.contains(&GameEvent::LevelComplete {
            level: 7,
            badge: "Flood Explorer".to_string()
        }));
        assert!(run.is_complete());
    }

    #[test]
    fn test_mini_game_leads_to_quiz_after_delay() {
        let mut run = LevelRun::new(level(1, true, 1), timing());
        let now = Instant::now();
        run.start(now);
        run.end_segment(now);
        assert_eq!(run.stage(), Stage::MiniGame);

        assert_eq!(run.click_target(2, now), vec![GameEvent::NonMatchSelected { target: 2 }]);
        assert_eq!(run.click_target(1, now), vec![GameEvent::MatchFound { target: 1 }]);
        assert_eq!(run.click_target(1, now), vec![]);
        assert_eq!(run.click_target(3, now), vec![GameEvent::AllMatchesFound]);

        assert_eq!(run.stage(), Stage::MiniGame);
        assert_eq!(run.next_deadline(), Some(now + EXIT_DELAY));

        let events = run.poll(now + EXIT_DELAY);
        assert_eq!(stages(&events), vec![Stage::Quiz]);
        assert_eq!(run.next_deadline(), None);
    }

    #[test]
    fn test_immediate_timing_applies_transitions_inline() {
        let mut run = LevelRun::new(level(1, true, 1), Timing::immediate());
        let now = Instant::now();
        run.start(now);
        run.end_segment(now);
        run.click_target(1, now);

        let events = run.click_target(3, now);
        assert_eq!(stages(&events), vec![Stage::Quiz]);

        let events = run.submit_answer(0, now);
        assert_eq!(stages(&events), vec![Stage::Completion]);
    }

    #[test]
    fn test_quiz_advances_question_by_question() {
        let mut run = LevelRun::new(level(1, false, 3), timing());
        let mut now = Instant::now();
        run.start(now);
        run.end_segment(now);

        let mut advanced = vec![];
        for _ in 0..3 {
            run.submit_answer(0, now);
            now += ANSWER_DELAY;
            for event in run.poll(now) {
                if let GameEvent::QuestionAdvanced { question } = event {
                    advanced.push(question);
                }
            }
        }

        assert_eq!(advanced, vec![1, 2]);
        assert!(run.is_complete());
    }

    #[test]
    fn test_wrong_answer_locks_until_restart() {
        let mut run = LevelRun::new(level(1, false, 2), timing());
        let now = Instant::now();
        run.start(now);
        run.end_segment(now);

        assert_eq!(
            run.submit_answer(1, now),
            vec![GameEvent::AnswerIncorrect { question: 0 }]
        );
        assert_eq!(run.submit_answer(0, now), vec![]);

        assert_eq!(run.restart_quiz(now), vec![GameEvent::QuizRestarted]);
        assert_eq!(
            run.submit_answer(0, now),
            vec![GameEvent::AnswerCorrect { question: 0 }]
        );
        // nothing to restart while the answer is right
        assert_eq!(run.restart_quiz(now), vec![]);
    }

    #[test]
    fn test_actions_outside_their_stage_are_ignored() {
        let mut run = LevelRun::new(level(2, true, 1), timing());
        let now = Instant::now();

        assert_eq!(run.end_segment(now), vec![]);
        assert_eq!(run.submit_answer(0, now), vec![]);
        assert_eq!(run.click_target(1, now), vec![]);
        assert!(!run.playback(PlaybackControl::Play));
        assert_eq!(run.stage(), Stage::Intro);

        run.start(now);
        assert_eq!(run.start(now), vec![]);
        assert_eq!(run.stage(), Stage::VideoSegment(1));
    }

    #[test]
    fn test_replay_keeps_segment() {
        let mut run = LevelRun::new(level(2, false, 1), timing());
        let now = Instant::now();
        run.start(now);

        assert!(run.playback(PlaybackControl::Play));
        assert!(run.playback(PlaybackControl::Replay));
        assert!(run.playback_state().playing());
        assert_eq!(run.stage(), Stage::VideoSegment(1));

        run.end_segment(now);
        assert_eq!(run.stage(), Stage::VideoSegment(2));
        assert!(!run.playback_state().playing());
    }
}
