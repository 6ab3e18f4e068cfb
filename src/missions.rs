use std::{collections::HashSet, sync::Arc};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Clone, Debug, Serialize)]
pub struct Mission {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub reward_xp: u64,
    pub reward_points: u64,
}

pub const MISSION_POOL: &[Mission] = &[
    Mission {
        id: "daily-post",
        name: "Share Something",
        description: "Publish a post today",
        reward_xp: 30,
        reward_points: 20,
    },
    Mission {
        id: "daily-comments",
        name: "Join Three Conversations",
        description: "Comment on three different posts",
        reward_xp: 25,
        reward_points: 15,
    },
    Mission {
        id: "daily-likes",
        name: "Spread the Love",
        description: "Give five likes",
        reward_xp: 15,
        reward_points: 10,
    },
    Mission {
        id: "daily-chat",
        name: "Say Hello",
        description: "Send a message in the global chat",
        reward_xp: 15,
        reward_points: 10,
    },
    Mission {
        id: "daily-dm",
        name: "Reach Out",
        description: "Start a direct conversation with another member",
        reward_xp: 20,
        reward_points: 10,
    },
    Mission {
        id: "window-shopping",
        name: "Window Shopping",
        description: "Browse the rewards shop",
        reward_xp: 10,
        reward_points: 5,
    },
    Mission {
        id: "tutorial-review",
        name: "Leave a Review",
        description: "Review a tutorial you finished",
        reward_xp: 35,
        reward_points: 25,
    },
    Mission {
        id: "bring-a-friend",
        name: "Bring a Friend",
        description: "Send someone an invite link",
        reward_xp: 40,
        reward_points: 30,
    },
];

struct BoardState {
    date: NaiveDate,
    missions: Vec<&'static Mission>,
    completions: HashSet<(String, &'static str)>,
}

/// The rotating daily mission board. A fresh set is drawn from the pool when
/// the calendar date changes; completions are tracked per member per day.
#[derive(Clone)]
pub struct MissionBoard {
    count: usize,
    inner: Arc<RwLock<BoardState>>,
}

impl MissionBoard {
    pub fn new(count: usize, today: NaiveDate) -> Self {
        Self {
            count,
            inner: Arc::new(RwLock::new(BoardState {
                date: today,
                missions: draw(count),
                completions: HashSet::new(),
            })),
        }
    }

    pub async fn today(&self) -> (NaiveDate, Vec<Mission>) {
        let state = self.inner.read().await;
        (
            state.date,
            state.missions.iter().map(|m| (*m).clone()).collect(),
        )
    }

    /// Re-rolls the board when the date has moved on. Returns the new set if
    /// a rotation happened.
    pub async fn rotate_if_new_day(&self, today: NaiveDate) -> Option<Vec<Mission>> {
        let mut state = self.inner.write().await;
        if state.date == today {
            return None;
        }

        state.date = today;
        state.missions = draw(self.count);
        state.completions.clear();
        Some(state.missions.iter().map(|m| (*m).clone()).collect())
    }

    /// Marks a mission complete for a member, once per day.
    pub async fn complete(&self, uid: &str, mission_id: &str) -> Result<&'static Mission> {
        let mut state = self.inner.write().await;

        let mission = state
            .missions
            .iter()
            .find(|m| m.id == mission_id)
            .copied()
            .ok_or_else(|| anyhow!("Mission {} is not on today's board", mission_id))?;

        if !state.completions.insert((uid.to_string(), mission.id)) {
            return Err(anyhow!("Mission {} already completed today", mission_id));
        }

        Ok(mission)
    }
}

fn draw(count: usize) -> Vec<&'static Mission> {
    let mut rng = rand::rng();
    MISSION_POOL.choose_multiple(&mut rng, count).collect()
}
