use crate::{
    achievements::{AchievementDefinition, UnlockRule, ACHIEVEMENTS},
    events::{AppEvent, EventBroadcaster},
    profile::UserProfile,
    store::ProfileStore,
};

/// One member action, tagged with the counters its unlock rules need.
/// Counters are the post-action totals reported by the activity ledger.
#[derive(Clone, Debug, PartialEq)]
pub enum ProgressEvent {
    PostCreated { post_count: u64 },
    LikeGiven { like_count: u64 },
    LikeReceived { received_likes: u64 },
    CommentPosted { comment_count: u64 },
    MessageSent { message_count: u64 },
    PurchaseMade { purchase_count: u64 },
    ReferralRecorded { referral_count: u64 },
    MissionCompleted { completed_count: u64 },
    RankingUpdated { position: u32 },
    CheckedIn,
}

/// Walks the achievement catalog after a member action and grants whatever
/// newly qualifies: appends the id, credits the rarity XP reward, and
/// announces the unlock. Each grant is its own store write; a failure in the
/// middle of a pass leaves the rest for the next evaluation, which is safe
/// because rules are idempotent.
#[derive(Clone)]
pub struct UnlockEvaluator {
    store: ProfileStore,
    events: EventBroadcaster,
}

impl UnlockEvaluator {
    pub fn new(store: ProfileStore, events: EventBroadcaster) -> Self {
        Self { store, events }
    }

    pub async fn evaluate(
        &self,
        uid: &str,
        event: &ProgressEvent,
    ) -> Vec<&'static AchievementDefinition> {
        let Some(profile) = self.store.get(uid).await else {
            tracing::warn!("Skipping achievement evaluation, no profile for {}", uid);
            return Vec::new();
        };

        let mut unlocked = Vec::new();

        for definition in ACHIEVEMENTS {
            if profile.has_achievement(definition.id) {
                continue;
            }
            if !rule_satisfied(&definition.rule, &profile, event) {
                continue;
            }

            let reward = definition.xp_reward();
            let granted = self
                .store
                .update(uid, |p| {
                    p.achievements.insert(definition.id.to_string());
                    p.award_xp(reward);
                })
                .await;

            match granted {
                Ok(_) => {
                    self.events.broadcast(AppEvent::AchievementUnlocked {
                        uid: uid.to_string(),
                        id: definition.id.to_string(),
                        name: definition.name.to_string(),
                        rarity: definition.rarity,
                        xp_awarded: reward,
                    });
                    tracing::info!(
                        "Member {} unlocked '{}' (+{} XP)",
                        uid,
                        definition.name,
                        reward
                    );
                    unlocked.push(definition);
                }
                Err(e) => {
                    tracing::warn!("Failed to persist unlock '{}': {}", definition.id, e);
                }
            }
        }

        unlocked
    }
}

fn rule_satisfied(rule: &UnlockRule, profile: &UserProfile, event: &ProgressEvent) -> bool {
    match rule {
        UnlockRule::AtSignup => false,
        UnlockRule::StreakDays(days) => profile.streak_days >= *days,
        UnlockRule::Level(level) => profile.level >= *level,
        UnlockRule::Posts(n) => {
            matches!(event, ProgressEvent::PostCreated { post_count } if post_count >= n)
        }
        UnlockRule::LikesGiven(n) => {
            matches!(event, ProgressEvent::LikeGiven { like_count } if like_count >= n)
        }
        UnlockRule::LikesReceived(n) => {
            matches!(event, ProgressEvent::LikeReceived { received_likes } if received_likes >= n)
        }
        UnlockRule::Comments(n) => {
            matches!(event, ProgressEvent::CommentPosted { comment_count } if comment_count >= n)
        }
        UnlockRule::Messages(n) => {
            matches!(event, ProgressEvent::MessageSent { message_count } if message_count >= n)
        }
        UnlockRule::Purchases(n) => {
            matches!(event, ProgressEvent::PurchaseMade { purchase_count } if purchase_count >= n)
        }
        UnlockRule::Referrals(n) => {
            matches!(event, ProgressEvent::ReferralRecorded { referral_count } if referral_count >= n)
        }
        UnlockRule::MissionsCompleted(n) => {
            matches!(event, ProgressEvent::MissionCompleted { completed_count } if completed_count >= n)
        }
        UnlockRule::RankingTop(n) => {
            matches!(event, ProgressEvent::RankingUpdated { position } if *position >= 1 && position <= n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn harness() -> (ProfileStore, UnlockEvaluator) {
        let events = EventBroadcaster::new();
        let store = ProfileStore::new(events.clone());
        let evaluator = UnlockEvaluator::new(store.clone(), events);
        (store, evaluator)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn first_post_awards_fifty_xp() {
        let (store, evaluator) = harness();
        let profile = store.create_profile("Avery".to_string()).await;
        assert_eq!(profile.xp, 0);

        let unlocked = evaluator
            .evaluate(&profile.uid, &ProgressEvent::PostCreated { post_count: 1 })
            .await;

        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "first-post");

        let after = store.get(&profile.uid).await.unwrap();
        assert_eq!(after.xp, 50);
        assert_eq!(after.level, 1);
        assert!(after.has_achievement("first-post"));
    }

    #[tokio::test]
    async fn evaluation_is_idempotent() {
        let (store, evaluator) = harness();
        let profile = store.create_profile("Avery".to_string()).await;
        let event = ProgressEvent::PostCreated { post_count: 1 };

        let first = evaluator.evaluate(&profile.uid, &event).await;
        assert_eq!(first.len(), 1);

        let second = evaluator.evaluate(&profile.uid, &event).await;
        assert!(second.is_empty());

        let after = store.get(&profile.uid).await.unwrap();
        assert_eq!(after.xp, 50);
    }

    #[tokio::test]
    async fn week_long_streak_unlocks_exactly_once() {
        let (store, evaluator) = harness();
        let profile = store.create_profile("Avery".to_string()).await;

        // Six days in: the 3-day badge is already on the shelf.
        for day in 1..=6 {
            store
                .record_activity(&profile.uid, date(2025, 6, day))
                .await
                .unwrap();
        }
        evaluator.evaluate(&profile.uid, &ProgressEvent::CheckedIn).await;
        let before = store.get(&profile.uid).await.unwrap();
        assert!(before.has_achievement("streak-3"));
        assert!(!before.has_achievement("streak-7"));
        let xp_before = before.xp;

        // Day seven.
        store
            .record_activity(&profile.uid, date(2025, 6, 7))
            .await
            .unwrap();
        let unlocked = evaluator
            .evaluate(&profile.uid, &ProgressEvent::CheckedIn)
            .await;
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "streak-7");

        let after = store.get(&profile.uid).await.unwrap();
        assert_eq!(after.xp, xp_before + 150);

        // Re-running with the same streak does not re-grant.
        let again = evaluator
            .evaluate(&profile.uid, &ProgressEvent::CheckedIn)
            .await;
        assert!(again.is_empty());
        assert_eq!(store.get(&profile.uid).await.unwrap().xp, xp_before + 150);
    }

    #[tokio::test]
    async fn multiple_rules_can_unlock_in_one_pass() {
        let (store, evaluator) = harness();
        let profile = store.create_profile("Avery".to_string()).await;

        // 25 posts satisfies both the first-post and storyteller rules.
        let unlocked = evaluator
            .evaluate(&profile.uid, &ProgressEvent::PostCreated { post_count: 25 })
            .await;

        let ids: Vec<&str> = unlocked.iter().map(|d| d.id).collect();
        assert!(ids.contains(&"first-post"));
        assert!(ids.contains(&"storyteller"));

        let after = store.get(&profile.uid).await.unwrap();
        assert_eq!(after.xp, 50 + 150);
    }

    #[tokio::test]
    async fn missing_profile_aborts_silently() {
        let (_, evaluator) = harness();
        let unlocked = evaluator
            .evaluate("ghost", &ProgressEvent::PostCreated { post_count: 1 })
            .await;
        assert!(unlocked.is_empty());
    }

    #[tokio::test]
    async fn counter_rules_ignore_unrelated_events() {
        let (store, evaluator) = harness();
        let profile = store.create_profile("Avery".to_string()).await;

        // A message event carries no post counter, so post rules stay quiet.
        let unlocked = evaluator
            .evaluate(&profile.uid, &ProgressEvent::MessageSent { message_count: 1 })
            .await;

        let ids: Vec<&str> = unlocked.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["first-message"]);
    }

    #[tokio::test]
    async fn ranking_positions_gate_top_badges() {
        let (store, evaluator) = harness();
        let profile = store.create_profile("Avery".to_string()).await;

        let eleventh = evaluator
            .evaluate(&profile.uid, &ProgressEvent::RankingUpdated { position: 11 })
            .await;
        assert!(eleventh.is_empty());

        let first = evaluator
            .evaluate(&profile.uid, &ProgressEvent::RankingUpdated { position: 1 })
            .await;
        let ids: Vec<&str> = first.iter().map(|d| d.id).collect();
        assert!(ids.contains(&"top-ten"));
        assert!(ids.contains(&"club-champion"));
    }

    #[tokio::test]
    async fn unlock_announcement_carries_name_and_reward() {
        let events = EventBroadcaster::new();
        let store = ProfileStore::new(events.clone());
        let evaluator = UnlockEvaluator::new(store.clone(), events.clone());
        let profile = store.create_profile("Avery".to_string()).await;

        let mut rx = events.subscribe();
        evaluator
            .evaluate(&profile.uid, &ProgressEvent::PostCreated { post_count: 1 })
            .await;

        loop {
            match rx.recv().await.unwrap() {
                AppEvent::AchievementUnlocked {
                    name, xp_awarded, ..
                } => {
                    assert_eq!(name, "Breaking the Ice");
                    assert_eq!(xp_awarded, 50);
                    break;
                }
                _ => continue,
            }
        }
    }
}
