//! Level content loaded from TOML.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::game::error::{CatalogError, CatalogResult, ContentError, ContentResult};
use crate::game::level::{Level, MiniGame, VideoSegment};
use crate::game::minigame::Target;
use crate::game::quiz::{QuizOption, QuizQuestion};

static BUILTIN_CATALOG: &str = include_str!("../../levels.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    levels: Vec<LevelDef>,
}

#[derive(Debug, Deserialize)]
struct LevelDef {
    id: u32,
    title: String,
    badge: String,
    #[serde(default)]
    intro: String,
    #[serde(default)]
    unlocked: bool,
    #[serde(default)]
    progress: u8,
    #[serde(default)]
    segments: Vec<SegmentDef>,
    mini_game: Option<MiniGameDef>,
    #[serde(default)]
    questions: Vec<QuestionDef>,
}

#[derive(Debug, Deserialize)]
struct SegmentDef {
    title: String,
    #[serde(default)]
    captions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MiniGameDef {
    prompt: String,
    targets: Vec<TargetDef>,
}

#[derive(Debug, Deserialize)]
struct TargetDef {
    id: u32,
    x: f32,
    y: f32,
    is_match: bool,
}

#[derive(Debug, Deserialize)]
struct QuestionDef {
    prompt: String,
    #[serde(default)]
    options: Vec<OptionDef>,
}

#[derive(Debug, Deserialize)]
struct OptionDef {
    label: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    correct: bool,
}

impl LevelDef {
    fn into_entry(self) -> ContentResult<CatalogEntry> {
        if self.progress > 100 {
            return Err(ContentError::ProgressOutOfRange(self.progress));
        }

        let segments = self
            .segments
            .into_iter()
            .map(|s| VideoSegment::new(s.title, s.captions))
            .collect();

        let mini_game = self
            .mini_game
            .map(|game| {
                let targets = game
                    .targets
                    .into_iter()
                    .map(|t| Target::new(t.id, t.x, t.y, t.is_match))
                    .collect();
                MiniGame::new(game.prompt, targets)
            })
            .transpose()?;

        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(position, q)| {
                let options = q
                    .options
                    .into_iter()
                    .map(|o| QuizOption::new(o.label, o.icon, o.correct))
                    .collect();
                QuizQuestion::new(position, q.prompt, options)
            })
            .collect::<ContentResult<Vec<_>>>()?;

        let level = Level::new(self.id, self.title, self.badge, segments, mini_game, questions)?
            .with_intro(self.intro);

        Ok(CatalogEntry {
            level: Arc::new(level),
            unlocked: self.unlocked,
            progress: self.progress,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    level: Arc<Level>,
    unlocked: bool,
    progress: u8,
}

impl CatalogEntry {
    pub fn level(&self) -> &Arc<Level> {
        &self.level
    }

    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }
}

/// Validated, ordered level content.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_toml_str(source: &str) -> CatalogResult<Self> {
        let file: CatalogFile = toml::from_str(source)?;
        if file.levels.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        let mut entries = Vec::with_capacity(file.levels.len());
        for def in file.levels {
            let level = def.id;
            if !ids.insert(level) {
                return Err(CatalogError::DuplicateLevel(level));
            }

            let entry = def
                .into_entry()
                .map_err(|error| CatalogError::InvalidLevel { level, error })?;
            entries.push(entry);
        }

        tracing::debug!("catalog loaded with {} levels", entries.len());
        Ok(Self { entries })
    }

    #[tracing::instrument]
    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        tracing::debug!("reading level catalog from {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// The catalog compiled into the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn level(&self, id: u32) -> Option<&Arc<Level>> {
        self.entries
            .iter()
            .map(CatalogEntry::level)
            .find(|level| level.id() == id)
    }
}
