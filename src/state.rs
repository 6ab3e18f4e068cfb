use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::{
    achievements::AchievementDefinition,
    config::{ClubConfig, Config, RewardConfig},
    counters::ActivityLedger,
    engine::{ProgressEvent, UnlockEvaluator},
    events::{AppEvent, EventBroadcaster},
    leaderboard::{self, LeaderboardEntry},
    leveling::{self, LevelProgress},
    missions::MissionBoard,
    profile::UserProfile,
    rank::Rank,
    session::{Session, SessionManager},
    shop,
    store::ProfileStore,
    streak,
};

/// What a recorded action left behind: the updated profile and any
/// achievements the evaluator granted along the way.
#[derive(Debug, Serialize)]
pub struct ActionOutcome {
    pub profile: UserProfile,
    pub unlocked: Vec<&'static AchievementDefinition>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MemberProgress {
    pub uid: String,
    pub display_name: String,
    pub xp: u64,
    pub level_progress: LevelProgress,
    pub points: u64,
    pub rank: Rank,
    pub next_rank: Option<Rank>,
    pub points_to_next_rank: Option<u64>,
    pub streak_days: u32,
    pub streak_multiplier: f64,
    pub achievements_unlocked: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub profiles: ProfileStore,
    pub activity: ActivityLedger,
    pub sessions: SessionManager,
    pub missions: MissionBoard,
    pub evaluator: UnlockEvaluator,
    pub events: EventBroadcaster,
    pub leaderboard: Arc<RwLock<Vec<LeaderboardEntry>>>,
    rewards: RewardConfig,
    club: ClubConfig,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let events = EventBroadcaster::new();
        let profiles = ProfileStore::new(events.clone());
        let evaluator = UnlockEvaluator::new(profiles.clone(), events.clone());

        Self {
            profiles,
            activity: ActivityLedger::new(),
            sessions: SessionManager::new(),
            missions: MissionBoard::new(config.club.daily_mission_count, Utc::now().date_naive()),
            evaluator,
            events,
            leaderboard: Arc::new(RwLock::new(Vec::new())),
            rewards: config.rewards.clone(),
            club: config.club.clone(),
        }
    }

    pub async fn register_member(&self, display_name: String) -> (UserProfile, Session) {
        let profile = self.profiles.create_profile(display_name).await;
        let session = self.sessions.create_session(profile.uid.clone()).await;
        tracing::info!("New member registered: {}", profile.uid);
        (profile, session)
    }

    /// Touches the streak, credits the streak-boosted XP and flat points for
    /// one action, and returns the profile as of the base award.
    async fn award_action(&self, uid: &str, base_xp: u64) -> Result<UserProfile> {
        let today = Utc::now().date_naive();
        let profile = self.profiles.record_activity(uid, today).await?;
        let xp = streak::apply_bonus(base_xp, profile.streak_days);
        self.profiles.award_xp(uid, xp).await?;
        self.profiles.award_points(uid, base_xp).await
    }

    async fn finish(&self, uid: &str, event: ProgressEvent) -> Result<ActionOutcome> {
        let unlocked = self.evaluator.evaluate(uid, &event).await;
        let profile = self
            .profiles
            .get(uid)
            .await
            .ok_or_else(|| anyhow!("No profile for member {}", uid))?;
        Ok(ActionOutcome { profile, unlocked })
    }

    pub async fn record_post(&self, uid: &str) -> Result<ActionOutcome> {
        self.award_action(uid, self.rewards.post_xp).await?;
        let posts = self.activity.record_post(uid).await;
        self.finish(uid, ProgressEvent::PostCreated { post_count: posts })
            .await
    }

    pub async fn record_comment(&self, uid: &str) -> Result<ActionOutcome> {
        self.award_action(uid, self.rewards.comment_xp).await?;
        let comments = self.activity.record_comment(uid).await;
        self.finish(
            uid,
            ProgressEvent::CommentPosted {
                comment_count: comments,
            },
        )
        .await
    }

    pub async fn record_message(&self, uid: &str) -> Result<ActionOutcome> {
        self.award_action(uid, self.rewards.message_xp).await?;
        let messages = self.activity.record_message(uid).await;
        self.finish(
            uid,
            ProgressEvent::MessageSent {
                message_count: messages,
            },
        )
        .await
    }

    /// Credits the giver and, when the recipient is a known member, runs the
    /// received-likes rules on their side as well.
    pub async fn record_like(&self, giver: &str, recipient: &str) -> Result<ActionOutcome> {
        if giver == recipient {
            return Err(anyhow!("Members cannot like their own content"));
        }

        self.award_action(giver, self.rewards.like_xp).await?;
        let given = self.activity.record_like_given(giver).await;

        if self.profiles.contains(recipient).await {
            let received = self.activity.record_like_received(recipient).await;
            self.evaluator
                .evaluate(
                    recipient,
                    &ProgressEvent::LikeReceived {
                        received_likes: received,
                    },
                )
                .await;
        }

        self.finish(giver, ProgressEvent::LikeGiven { like_count: given })
            .await
    }

    pub async fn record_referral(&self, uid: &str) -> Result<ActionOutcome> {
        self.award_action(uid, self.rewards.referral_xp).await?;
        let referrals = self.activity.record_referral(uid).await;
        self.finish(
            uid,
            ProgressEvent::ReferralRecorded {
                referral_count: referrals,
            },
        )
        .await
    }

    /// Daily check-in: extends the streak and pays the check-in points once
    /// per calendar day no matter how often it is called.
    pub async fn check_in(&self, uid: &str) -> Result<ActionOutcome> {
        let today = Utc::now().date_naive();
        let before = self
            .profiles
            .get(uid)
            .await
            .ok_or_else(|| anyhow!("No profile for member {}", uid))?;
        let first_today = before.last_active != Some(today);

        self.profiles.record_activity(uid, today).await?;
        if first_today {
            self.profiles
                .award_points(uid, self.rewards.checkin_points)
                .await?;
        }

        self.finish(uid, ProgressEvent::CheckedIn).await
    }

    pub async fn purchase(&self, uid: &str, product_id: &str) -> Result<ActionOutcome> {
        let product =
            shop::get_product(product_id).ok_or_else(|| anyhow!("Unknown product {}", product_id))?;
        let profile = self
            .profiles
            .get(uid)
            .await
            .ok_or_else(|| anyhow!("No profile for member {}", uid))?;

        shop::check_eligibility(product, &profile)?;
        self.profiles.spend_points(uid, product.cost_points).await?;
        self.profiles
            .record_activity(uid, Utc::now().date_naive())
            .await?;

        let purchases = self.activity.record_purchase(uid).await;
        self.events.broadcast(AppEvent::Notice {
            uid: uid.to_string(),
            message: format!(
                "Purchased {} for {} points",
                product.name, product.cost_points
            ),
        });

        self.finish(
            uid,
            ProgressEvent::PurchaseMade {
                purchase_count: purchases,
            },
        )
        .await
    }

    pub async fn complete_mission(&self, uid: &str, mission_id: &str) -> Result<ActionOutcome> {
        if !self.profiles.contains(uid).await {
            return Err(anyhow!("No profile for member {}", uid));
        }

        self.rotate_missions_if_needed().await;
        let mission = self.missions.complete(uid, mission_id).await?;

        let today = Utc::now().date_naive();
        let profile = self.profiles.record_activity(uid, today).await?;
        let xp = streak::apply_bonus(mission.reward_xp, profile.streak_days);
        self.profiles.award_xp(uid, xp).await?;
        self.profiles
            .award_points(uid, mission.reward_points)
            .await?;

        let completed = self.activity.record_mission(uid).await;
        self.events.broadcast(AppEvent::Notice {
            uid: uid.to_string(),
            message: format!(
                "Mission complete: {} (+{} XP, +{} points)",
                mission.name, xp, mission.reward_points
            ),
        });

        self.finish(
            uid,
            ProgressEvent::MissionCompleted {
                completed_count: completed,
            },
        )
        .await
    }

    pub async fn rotate_missions_if_needed(&self) {
        let today = Utc::now().date_naive();
        if let Some(missions) = self.missions.rotate_if_new_day(today).await {
            tracing::info!("Daily missions rotated ({} on the board)", missions.len());
            self.events
                .broadcast(AppEvent::MissionsRotated { missions });
        }
    }

    /// Recomputes the standings, publishes them, and feeds each member's
    /// position to the evaluator so placement badges can unlock.
    pub async fn refresh_leaderboard(&self) -> Vec<LeaderboardEntry> {
        let profiles = self.profiles.all_profiles().await;
        let standings = leaderboard::standings(&profiles, self.club.leaderboard_top_n);

        *self.leaderboard.write().await = standings.clone();
        self.events.broadcast(AppEvent::LeaderboardUpdated {
            standings: standings.clone(),
        });

        for entry in &standings {
            self.evaluator
                .evaluate(
                    &entry.uid,
                    &ProgressEvent::RankingUpdated {
                        position: entry.position,
                    },
                )
                .await;
        }

        standings
    }

    pub async fn current_leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.leaderboard.read().await.clone()
    }

    pub async fn member_progress(&self, uid: &str) -> Option<MemberProgress> {
        let profile = self.profiles.get(uid).await?;
        let next_rank = profile.rank.next();

        Some(MemberProgress {
            uid: profile.uid.clone(),
            display_name: profile.display_name.clone(),
            xp: profile.xp,
            level_progress: leveling::xp_to_next_level(profile.xp),
            points: profile.points,
            rank: profile.rank,
            next_rank,
            points_to_next_rank: next_rank
                .map(|rank| rank.min_points().saturating_sub(profile.points)),
            streak_days: profile.streak_days,
            streak_multiplier: streak::bonus_multiplier(profile.streak_days),
            achievements_unlocked: profile.achievements.len(),
        })
    }
}
