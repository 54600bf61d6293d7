use std::sync::Arc;

use crate::game::catalog::Catalog;
use crate::game::error::{CampaignError, CampaignResult};
use crate::game::level::Level;
use crate::game::run::LevelRun;
use crate::game::timer::Timing;

/// Where the host goes after a finished level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Level(u32),
    Home,
}

#[derive(Debug, Clone)]
pub struct CampaignEntry {
    level: Arc<Level>,
    unlocked: bool,
    progress: u8,
    badge_earned: bool,
}

impl CampaignEntry {
    pub fn level(&self) -> &Arc<Level> {
        &self.level
    }

    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    /// 0..=100
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn badge_earned(&self) -> bool {
        self.badge_earned
    }
}

/// The ordered set of levels on the home screen, with per-level progress.
#[derive(Debug, Clone)]
pub struct Campaign {
    entries: Vec<CampaignEntry>,
}

impl Campaign {
    pub fn new(catalog: &Catalog) -> Self {
        let entries = catalog
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| CampaignEntry {
                level: Arc::clone(entry.level()),
                unlocked: i == 0 || entry.unlocked(),
                progress: entry.progress(),
                badge_earned: entry.progress() == 100,
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[CampaignEntry] {
        &self.entries
    }

    pub fn entry(&self, level_id: u32) -> Option<&CampaignEntry> {
        self.entries.iter().find(|e| e.level.id() == level_id)
    }

    pub fn badges(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.badge_earned)
            .map(|e| e.level.badge())
            .collect()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn start(&self, level_id: u32, timing: Timing) -> CampaignResult<LevelRun> {
        let entry = self
            .entry(level_id)
            .ok_or(CampaignError::UnknownLevel(level_id))?;

        if !entry.unlocked {
            return Err(CampaignError::LevelLocked(level_id));
        }

        tracing::debug!("starting level {} ({})", level_id, entry.level.title());
        Ok(LevelRun::new(Arc::clone(&entry.level), timing))
    }

    /// Opens every level, for free play.
    pub fn unlock_all(&mut self) {
        for entry in &mut self.entries {
            entry.unlocked = true;
        }
    }

    /// Records a finished level and unlocks the one after it.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn complete(&mut self, level_id: u32) -> CampaignResult<Destination> {
        let index = self
            .entries
            .iter()
            .position(|e| e.level.id() == level_id)
            .ok_or(CampaignError::UnknownLevel(level_id))?;

        let entry = &mut self.entries[index];
        entry.progress = 100;
        entry.badge_earned = true;
        tracing::info!("level {} complete, badge earned: {}", level_id, entry.level.badge());

        match self.entries.get_mut(index + 1) {
            Some(next) => {
                if !next.unlocked {
                    tracing::debug!("unlocking level {}", next.level.id());
                }
                next.unlocked = true;
                Ok(Destination::Level(next.level.id()))
            }
            None => Ok(Destination::Home),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn campaign() -> Campaign {
        Campaign::new(&Catalog::builtin().unwrap())
    }

    #[test]
    fn test_only_first_level_starts_unlocked() {
        let campaign = campaign();
        let unlocked: Vec<_> = campaign.entries().iter().map(|e| e.unlocked()).collect();
        assert_eq!(unlocked, vec![true, false]);
        assert!(campaign.badges().is_empty());
    }

    #[test]
    fn test_locked_and_unknown_levels_cannot_start() {
        let campaign = campaign();
        let err = campaign.start(2, Timing::default()).unwrap_err();
        assert_eq!(err, CampaignError::LevelLocked(2));

        let err = campaign.start(99, Timing::default()).unwrap_err();
        assert_eq!(err, CampaignError::UnknownLevel(99));

        assert!(campaign.start(1, Timing::default()).is_ok());
    }

    #[test]
    fn test_completion_unlocks_next_level() {
        let mut campaign = campaign();

        assert_eq!(campaign.complete(1), Ok(Destination::Level(2)));
        let first = campaign.entry(1).unwrap();
        assert_eq!(first.progress(), 100);
        assert!(first.badge_earned());
        assert!(campaign.entry(2).unwrap().unlocked());
        assert_eq!(campaign.badges(), vec!["Radar Explorer"]);

        assert_eq!(campaign.complete(2), Ok(Destination::Home));
        assert_eq!(campaign.badges(), vec!["Radar Explorer", "Flood Explorer"]);

        assert_eq!(campaign.complete(3), Err(CampaignError::UnknownLevel(3)));
    }

    #[test]
    fn test_unlock_all_allows_any_level() {
        let mut campaign = campaign();
        campaign.unlock_all();
        assert!(campaign.start(2, Timing::default()).is_ok());
        assert!(campaign.badges().is_empty());
    }
}
