use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::game::{Campaign, Clock, Destination, LevelRun, Timing};

/// A run kept in memory together with what the host learned about it.
#[derive(Debug)]
pub struct RunRecord {
    run: LevelRun,
    started_at: DateTime<Utc>,
    destination: Option<Destination>,
}

impl RunRecord {
    pub fn new(run: LevelRun) -> Self {
        Self {
            run,
            started_at: Utc::now(),
            destination: None,
        }
    }

    pub fn run(&self) -> &LevelRun {
        &self.run
    }

    pub fn run_mut(&mut self) -> &mut LevelRun {
        &mut self.run
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Set once the finished run has been recorded in the campaign.
    pub fn destination(&self) -> Option<Destination> {
        self.destination
    }

    pub fn set_destination(&mut self, destination: Destination) {
        self.destination = Some(destination);
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    campaign: Arc<RwLock<Campaign>>,
    runs: Arc<RwLock<HashMap<Uuid, RunRecord>>>,
    clock: Arc<dyn Clock>,
    timing: Timing,
}

impl AppState {
    pub fn new(campaign: Campaign, timing: Timing, clock: Arc<dyn Clock>) -> Self {
        Self {
            campaign: Arc::new(RwLock::new(campaign)),
            runs: Arc::new(RwLock::new(HashMap::new())),
            clock,
            timing,
        }
    }

    pub fn campaign(&self) -> &RwLock<Campaign> {
        &self.campaign
    }

    /// Lock order: `runs` before `campaign` when both are held.
    pub fn runs(&self) -> &RwLock<HashMap<Uuid, RunRecord>> {
        &self.runs
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }
}
