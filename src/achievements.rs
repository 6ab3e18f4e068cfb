use serde::Serialize;

use crate::Rarity;

/// Condition under which an achievement unlocks. Counter rules match against
/// the counter carried by the triggering event; streak and level rules are
/// checked against the profile snapshot on every evaluation.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnlockRule {
    AtSignup,
    Posts(u64),
    LikesGiven(u64),
    LikesReceived(u64),
    Comments(u64),
    Messages(u64),
    Purchases(u64),
    Referrals(u64),
    MissionsCompleted(u64),
    StreakDays(u32),
    Level(u32),
    RankingTop(u32),
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub rule: UnlockRule,
}

impl AchievementDefinition {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        icon: &'static str,
        rarity: Rarity,
        rule: UnlockRule,
    ) -> Self {
        Self {
            id,
            name,
            description,
            icon,
            rarity,
            rule,
        }
    }

    pub const fn xp_reward(&self) -> u64 {
        self.rarity.xp_reward()
    }
}

pub const ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition::new(
        "charter-member",
        "Charter Member",
        "Join the club",
        "🎟️",
        Rarity::Common,
        UnlockRule::AtSignup,
    ),
    AchievementDefinition::new(
        "first-post",
        "Breaking the Ice",
        "Publish your first post",
        "📝",
        Rarity::Common,
        UnlockRule::Posts(1),
    ),
    AchievementDefinition::new(
        "storyteller",
        "Storyteller",
        "Publish 25 posts",
        "📚",
        Rarity::Rare,
        UnlockRule::Posts(25),
    ),
    AchievementDefinition::new(
        "editorial",
        "Editorial Desk",
        "Publish 100 posts",
        "🗞️",
        Rarity::Epic,
        UnlockRule::Posts(100),
    ),
    AchievementDefinition::new(
        "first-like",
        "Spreading Joy",
        "Give your first like",
        "👍",
        Rarity::Common,
        UnlockRule::LikesGiven(1),
    ),
    AchievementDefinition::new(
        "generous",
        "Generous Soul",
        "Give 100 likes",
        "💖",
        Rarity::Rare,
        UnlockRule::LikesGiven(100),
    ),
    AchievementDefinition::new(
        "crowd-favorite",
        "Crowd Favorite",
        "Receive 50 likes from other members",
        "🌟",
        Rarity::Epic,
        UnlockRule::LikesReceived(50),
    ),
    AchievementDefinition::new(
        "first-comment",
        "Joining In",
        "Leave your first comment",
        "💬",
        Rarity::Common,
        UnlockRule::Comments(1),
    ),
    AchievementDefinition::new(
        "conversationalist",
        "Conversationalist",
        "Leave 50 comments",
        "🗣️",
        Rarity::Rare,
        UnlockRule::Comments(50),
    ),
    AchievementDefinition::new(
        "first-message",
        "Hello There",
        "Send your first chat message",
        "✉️",
        Rarity::Common,
        UnlockRule::Messages(1),
    ),
    AchievementDefinition::new(
        "chatterbox",
        "Chatterbox",
        "Send 100 chat messages",
        "📨",
        Rarity::Rare,
        UnlockRule::Messages(100),
    ),
    AchievementDefinition::new(
        "first-purchase",
        "Window Shopper No More",
        "Make your first shop purchase",
        "🛍️",
        Rarity::Common,
        UnlockRule::Purchases(1),
    ),
    AchievementDefinition::new(
        "collector",
        "Collector",
        "Make 5 shop purchases",
        "🧺",
        Rarity::Rare,
        UnlockRule::Purchases(5),
    ),
    AchievementDefinition::new(
        "big-spender",
        "Big Spender",
        "Make 20 shop purchases",
        "💎",
        Rarity::Epic,
        UnlockRule::Purchases(20),
    ),
    AchievementDefinition::new(
        "recruiter",
        "Recruiter",
        "Refer your first new member",
        "🤝",
        Rarity::Rare,
        UnlockRule::Referrals(1),
    ),
    AchievementDefinition::new(
        "ambassador",
        "Club Ambassador",
        "Refer 10 new members",
        "🏛️",
        Rarity::Epic,
        UnlockRule::Referrals(10),
    ),
    AchievementDefinition::new(
        "mission-rookie",
        "Mission Rookie",
        "Complete your first daily mission",
        "🎯",
        Rarity::Common,
        UnlockRule::MissionsCompleted(1),
    ),
    AchievementDefinition::new(
        "mission-veteran",
        "Mission Veteran",
        "Complete 25 daily missions",
        "🎖️",
        Rarity::Rare,
        UnlockRule::MissionsCompleted(25),
    ),
    AchievementDefinition::new(
        "streak-3",
        "Warming Up",
        "Stay active 3 days in a row",
        "🔥",
        Rarity::Common,
        UnlockRule::StreakDays(3),
    ),
    AchievementDefinition::new(
        "streak-7",
        "Weekly Regular",
        "Stay active 7 days in a row",
        "📅",
        Rarity::Rare,
        UnlockRule::StreakDays(7),
    ),
    AchievementDefinition::new(
        "streak-14",
        "Fortnight Fixture",
        "Stay active 14 days in a row",
        "⚡",
        Rarity::Epic,
        UnlockRule::StreakDays(14),
    ),
    AchievementDefinition::new(
        "streak-30",
        "Iron Habit",
        "Stay active 30 days in a row",
        "🏆",
        Rarity::Legendary,
        UnlockRule::StreakDays(30),
    ),
    AchievementDefinition::new(
        "level-5",
        "Finding Your Feet",
        "Reach level 5",
        "🌱",
        Rarity::Rare,
        UnlockRule::Level(5),
    ),
    AchievementDefinition::new(
        "level-10",
        "Seasoned Member",
        "Reach level 10",
        "🌳",
        Rarity::Epic,
        UnlockRule::Level(10),
    ),
    AchievementDefinition::new(
        "level-25",
        "Pillar of the Club",
        "Reach level 25",
        "🏔️",
        Rarity::Legendary,
        UnlockRule::Level(25),
    ),
    AchievementDefinition::new(
        "top-ten",
        "Top Ten",
        "Place in the leaderboard top 10",
        "🥉",
        Rarity::Epic,
        UnlockRule::RankingTop(10),
    ),
    AchievementDefinition::new(
        "club-champion",
        "Club Champion",
        "Take first place on the leaderboard",
        "👑",
        Rarity::Legendary,
        UnlockRule::RankingTop(1),
    ),
];

/// Starter achievement granted with every new profile.
pub const STARTER_ACHIEVEMENT: &str = "charter-member";

pub fn get_achievement(id: &str) -> Option<&'static AchievementDefinition> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}
