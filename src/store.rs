use std::{collections::HashMap, sync::Arc};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::{
    events::{AppEvent, EventBroadcaster},
    profile::UserProfile,
    streak,
};

/// In-process profile document store. Every mutation goes through
/// [`ProfileStore::update`], which re-reads derived fields and pushes the new
/// snapshot onto the live event feed.
#[derive(Clone)]
pub struct ProfileStore {
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
    events: EventBroadcaster,
}

impl ProfileStore {
    pub fn new(events: EventBroadcaster) -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
            events,
        }
    }

    pub async fn create_profile(&self, display_name: String) -> UserProfile {
        let uid = uuid::Uuid::new_v4().to_string();
        let profile = UserProfile::new(uid, display_name);

        self.profiles
            .write()
            .await
            .insert(profile.uid.clone(), profile.clone());

        self.events.broadcast(AppEvent::ProfileUpdated {
            profile: profile.clone(),
        });
        profile
    }

    pub async fn get(&self, uid: &str) -> Option<UserProfile> {
        self.profiles.read().await.get(uid).cloned()
    }

    pub async fn contains(&self, uid: &str) -> bool {
        self.profiles.read().await.contains_key(uid)
    }

    pub async fn all_profiles(&self) -> Vec<UserProfile> {
        self.profiles.read().await.values().cloned().collect()
    }

    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }

    /// Read-modify-write on a single profile document. Level-up and rank
    /// promotions are detected here so callers don't have to compare
    /// snapshots themselves.
    pub async fn update<F>(&self, uid: &str, mutate: F) -> Result<UserProfile>
    where
        F: FnOnce(&mut UserProfile),
    {
        let snapshot = {
            let mut profiles = self.profiles.write().await;
            let profile = profiles
                .get_mut(uid)
                .ok_or_else(|| anyhow!("No profile for member {}", uid))?;

            let level_before = profile.level;
            let rank_before = profile.rank;
            mutate(profile);
            let snapshot = profile.clone();

            if snapshot.level > level_before {
                self.events.broadcast(AppEvent::LevelUp {
                    uid: uid.to_string(),
                    level: snapshot.level,
                });
            }
            if snapshot.rank > rank_before {
                self.events.broadcast(AppEvent::RankChanged {
                    uid: uid.to_string(),
                    rank: snapshot.rank,
                });
            }
            snapshot
        };

        self.events.broadcast(AppEvent::ProfileUpdated {
            profile: snapshot.clone(),
        });
        Ok(snapshot)
    }

    pub async fn award_xp(&self, uid: &str, amount: u64) -> Result<UserProfile> {
        self.update(uid, |profile| profile.award_xp(amount)).await
    }

    pub async fn award_points(&self, uid: &str, amount: u64) -> Result<UserProfile> {
        self.update(uid, |profile| profile.award_points(amount))
            .await
    }

    pub async fn spend_points(&self, uid: &str, cost: u64) -> Result<UserProfile> {
        let mut outcome = Ok(());
        let snapshot = self
            .update(uid, |profile| outcome = profile.spend_points(cost))
            .await?;
        outcome?;
        Ok(snapshot)
    }

    /// Marks a day of activity for the member and announces streak
    /// extensions on the event feed.
    pub async fn record_activity(&self, uid: &str, today: NaiveDate) -> Result<UserProfile> {
        let mut streak_before = 0;
        let snapshot = self
            .update(uid, |profile| {
                streak_before = profile.streak_days;
                profile.record_activity(today);
            })
            .await?;

        if snapshot.streak_days > streak_before {
            self.events.broadcast(AppEvent::StreakExtended {
                uid: uid.to_string(),
                streak_days: snapshot.streak_days,
                multiplier: streak::bonus_multiplier(snapshot.streak_days),
            });
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;

    fn store() -> ProfileStore {
        ProfileStore::new(EventBroadcaster::new())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn create_and_fetch_profile() {
        let store = store();
        let created = store.create_profile("Avery".to_string()).await;
        let fetched = store.get(&created.uid).await.unwrap();
        assert_eq!(fetched.display_name, "Avery");
        assert_eq!(fetched.xp, 0);
    }

    #[tokio::test]
    async fn update_missing_profile_errors() {
        let store = store();
        let result = store.award_xp("ghost", 10).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn xp_award_emits_level_up() {
        let events = EventBroadcaster::new();
        let store = ProfileStore::new(events.clone());
        let profile = store.create_profile("Avery".to_string()).await;

        let mut rx = events.subscribe();
        let updated = store.award_xp(&profile.uid, 150).await.unwrap();
        assert_eq!(updated.level, 2);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, AppEvent::LevelUp { level: 2, .. }));
    }

    #[tokio::test]
    async fn point_award_emits_rank_change() {
        let events = EventBroadcaster::new();
        let store = ProfileStore::new(events.clone());
        let profile = store.create_profile("Avery".to_string()).await;

        let mut rx = events.subscribe();
        let updated = store.award_points(&profile.uid, 600).await.unwrap();
        assert_eq!(updated.rank, Rank::Silver);

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            AppEvent::RankChanged {
                rank: Rank::Silver,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn failed_spend_keeps_balance() {
        let store = store();
        let profile = store.create_profile("Avery".to_string()).await;
        store.award_points(&profile.uid, 50).await.unwrap();

        assert!(store.spend_points(&profile.uid, 100).await.is_err());
        assert_eq!(store.get(&profile.uid).await.unwrap().points, 50);
    }

    #[tokio::test]
    async fn activity_extends_streak_once_per_day() {
        let events = EventBroadcaster::new();
        let store = ProfileStore::new(events.clone());
        let profile = store.create_profile("Avery".to_string()).await;

        let first = store
            .record_activity(&profile.uid, date(2025, 6, 1))
            .await
            .unwrap();
        assert_eq!(first.streak_days, 1);

        let same_day = store
            .record_activity(&profile.uid, date(2025, 6, 1))
            .await
            .unwrap();
        assert_eq!(same_day.streak_days, 1);

        let next_day = store
            .record_activity(&profile.uid, date(2025, 6, 2))
            .await
            .unwrap();
        assert_eq!(next_day.streak_days, 2);
    }
}
