use serde::{Deserialize, Serialize};

use crate::game::{Campaign, CampaignEntry};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LevelResponse {
    pub id: u32,
    pub title: String,
    pub badge: String,
    pub intro: String,
    pub unlocked: bool,
    pub progress: u8,
    pub badge_earned: bool,
    pub segments: Vec<String>,
    pub has_mini_game: bool,
    pub questions: usize,
}

impl From<&CampaignEntry> for LevelResponse {
    fn from(entry: &CampaignEntry) -> Self {
        let level = entry.level();

        Self {
            id: level.id(),
            title: level.title().to_string(),
            badge: level.badge().to_string(),
            intro: level.intro().to_string(),
            unlocked: entry.unlocked(),
            progress: entry.progress(),
            badge_earned: entry.badge_earned(),
            segments: level.segments().iter().map(|s| s.title().to_string()).collect(),
            has_mini_game: level.mini_game().is_some(),
            questions: level.questions().len(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LevelsResponse {
    pub levels: Vec<LevelResponse>,
    pub badges: Vec<String>,
}

impl From<&Campaign> for LevelsResponse {
    fn from(campaign: &Campaign) -> Self {
        Self {
            levels: campaign.entries().iter().map(LevelResponse::from).collect(),
            badges: campaign.badges().into_iter().map(String::from).collect(),
        }
    }
}
