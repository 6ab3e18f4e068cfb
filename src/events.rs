use serde::Serialize;
use tokio::sync::broadcast::{channel, Receiver, Sender};

use crate::{
    leaderboard::LeaderboardEntry, missions::Mission, profile::UserProfile, rank::Rank, Rarity,
};

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type")]
pub enum AppEvent {
    ProfileUpdated {
        profile: UserProfile,
    },
    AchievementUnlocked {
        uid: String,
        id: String,
        name: String,
        rarity: Rarity,
        xp_awarded: u64,
    },
    LevelUp {
        uid: String,
        level: u32,
    },
    RankChanged {
        uid: String,
        rank: Rank,
    },
    StreakExtended {
        uid: String,
        streak_days: u32,
        multiplier: f64,
    },
    MissionsRotated {
        missions: Vec<Mission>,
    },
    LeaderboardUpdated {
        standings: Vec<LeaderboardEntry>,
    },
    Notice {
        uid: String,
        message: String,
    },
}

#[derive(Clone)]
pub struct EventBroadcaster {
    sender: Sender<AppEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = channel(10000);
        Self { sender }
    }

    pub fn broadcast(&self, event: AppEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> Receiver<AppEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
