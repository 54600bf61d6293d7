//! "Find the flooded village" board.

use std::collections::HashSet;

use crate::game::error::{ContentError, ContentResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    id: u32,
    x: f32,
    y: f32,
    is_match: bool,
    found: bool,
}

impl Target {
    /// Position is in percent of the board, `0.0..=100.0` on both axes.
    pub fn new(id: u32, x: f32, y: f32, is_match: bool) -> Self {
        Self {
            id,
            x,
            y,
            is_match,
            found: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn is_match(&self) -> bool {
        self.is_match
    }

    pub fn found(&self) -> bool {
        self.found
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickEvent {
    Ignored,
    MatchFound,
    NonMatchSelected,
    AllMatchesFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetBoard {
    targets: Vec<Target>,
    misses: u32,
}

impl TargetBoard {
    pub fn new(targets: Vec<Target>) -> ContentResult<Self> {
        let mut ids = HashSet::new();
        for target in &targets {
            if !ids.insert(target.id) {
                return Err(ContentError::DuplicateTarget { id: target.id });
            }

            let in_grid = |v: f32| (0.0..=100.0).contains(&v);
            if !in_grid(target.x) || !in_grid(target.y) {
                return Err(ContentError::TargetOutOfBounds {
                    id: target.id,
                    x: target.x,
                    y: target.y,
                });
            }
        }

        if !targets.iter().any(Target::is_match) {
            return Err(ContentError::NoMatchingTargets);
        }

        // boards are built from content, nothing may start out found
        let targets = targets
            .into_iter()
            .map(|t| Target { found: false, ..t })
            .collect();

        Ok(Self { targets, misses: 0 })
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub fn click(&mut self, id: u32) -> ClickEvent {
        let Some(target) = self.targets.iter_mut().find(|t| t.id == id) else {
            tracing::trace!("unknown target {}", id);
            return ClickEvent::Ignored;
        };

        if target.found {
            return ClickEvent::Ignored;
        }

        if !target.is_match {
            self.misses += 1;
            tracing::debug!("target {} is not a match ({} misses)", id, self.misses);
            return ClickEvent::NonMatchSelected;
        }

        target.found = true;
        if self.is_cleared() {
            tracing::debug!("all {} matches found", self.match_count());
            ClickEvent::AllMatchesFound
        } else {
            tracing::debug!("target {} found", id);
            ClickEvent::MatchFound
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn match_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_match).count()
    }

    pub fn found_count(&self) -> usize {
        self.targets.iter().filter(|t| t.is_match && t.found).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.found_count() == self.match_count()
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn board() -> TargetBoard {
        TargetBoard::new(vec![
            Target::new(1, 20.0, 30.0, true),
            Target::new(2, 45.0, 20.0, false),
            Target::new(3, 70.0, 35.0, true),
        ])
        .unwrap()
    }

    #[test]
    fn test_click_sequence_events() {
        let mut board = board();
        let events: Vec<_> = [2, 1, 3].into_iter().map(|id| board.click(id)).collect();

        assert_eq!(
            events,
            vec![
                ClickEvent::NonMatchSelected,
                ClickEvent::MatchFound,
                ClickEvent::AllMatchesFound
            ]
        );
        assert!(board.is_cleared());
        assert_eq!(board.misses(), 1);
    }

    #[test]
    fn test_double_click_is_counted_once() {
        let mut board = board();
        assert_eq!(board.click(1), ClickEvent::MatchFound);
        assert_eq!(board.click(1), ClickEvent::Ignored);
        assert_eq!(board.found_count(), 1);
    }

    #[test]
    fn test_non_match_stays_unfound() {
        let mut board = board();
        assert_eq!(board.click(2), ClickEvent::NonMatchSelected);
        assert_eq!(board.click(2), ClickEvent::NonMatchSelected);
        assert!(!board.targets()[1].found());
        assert_eq!(board.misses(), 2);
        assert_eq!(board.found_count(), 0);
    }

    #[test]
    fn test_unknown_target_is_ignored() {
        let mut board = board();
        let before = board.clone();
        assert_eq!(board.click(42), ClickEvent::Ignored);
        assert_eq!(board, before);
    }

    #[test]
    fn test_board_validation() {
        let err = TargetBoard::new(vec![Target::new(1, 0.0, 0.0, false)]).unwrap_err();
        assert_eq!(err, ContentError::NoMatchingTargets);

        let err = TargetBoard::new(vec![
            Target::new(1, 0.0, 0.0, true),
            Target::new(1, 5.0, 5.0, false),
        ])
        .unwrap_err();
        assert_eq!(err, ContentError::DuplicateTarget { id: 1 });

        let err = TargetBoard::new(vec![Target::new(4, 101.0, 5.0, true)]).unwrap_err();
        assert!(matches!(err, ContentError::TargetOutOfBounds { id: 4, .. }));
    }
}
