use std::collections::HashSet;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{achievements::STARTER_ACHIEVEMENT, leveling, rank::Rank, streak};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub display_name: String,
    pub points: u64,
    pub xp: u64,
    pub level: u32,
    pub rank: Rank,
    pub achievements: HashSet<String>,
    pub streak_days: u32,
    pub last_active: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(uid: String, display_name: String) -> Self {
        let mut achievements = HashSet::new();
        achievements.insert(STARTER_ACHIEVEMENT.to_string());

        Self {
            uid,
            display_name,
            points: 0,
            xp: 0,
            level: 1,
            rank: Rank::Bronze,
            achievements,
            streak_days: 0,
            last_active: None,
            created_at: Utc::now(),
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.contains(id)
    }

    /// Adds XP and re-derives `level` from the new total.
    pub fn award_xp(&mut self, amount: u64) {
        self.xp += amount;
        self.level = leveling::calculate_level(self.xp);
    }

    /// Adds points and promotes `rank` if a new tier threshold is crossed.
    /// Rank is never lowered, even if points previously dipped below a tier.
    pub fn award_points(&mut self, amount: u64) {
        self.points += amount;
        self.rank = self.rank.max(Rank::from_points(self.points));
    }

    /// Deducts spent points without re-deriving rank.
    pub fn spend_points(&mut self, cost: u64) -> Result<()> {
        if self.points < cost {
            return Err(anyhow!(
                "Insufficient points. Have: {}, need: {}",
                self.points,
                cost
            ));
        }

        self.points -= cost;
        Ok(())
    }

    /// Marks a day of activity and returns the resulting streak length.
    pub fn record_activity(&mut self, today: NaiveDate) -> u32 {
        self.streak_days = streak::advance(self.last_active, self.streak_days, today);
        self.last_active = Some(today);
        self.streak_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fresh() -> UserProfile {
        UserProfile::new("member-1".to_string(), "Avery".to_string())
    }

    #[test]
    fn new_profile_starts_zeroed_with_starter_achievement() {
        let profile = fresh();
        assert_eq!(profile.points, 0);
        assert_eq!(profile.xp, 0);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.rank, Rank::Bronze);
        assert_eq!(profile.streak_days, 0);
        assert!(profile.has_achievement(STARTER_ACHIEVEMENT));
        assert_eq!(profile.achievements.len(), 1);
    }

    #[test]
    fn xp_awards_keep_level_in_sync() {
        let mut profile = fresh();
        profile.award_xp(50);
        assert_eq!(profile.level, 1);
        profile.award_xp(50);
        assert_eq!(profile.level, 2);
        assert_eq!(profile.level, leveling::calculate_level(profile.xp));
    }

    #[test]
    fn point_awards_promote_rank() {
        let mut profile = fresh();
        profile.award_points(499);
        assert_eq!(profile.rank, Rank::Bronze);
        profile.award_points(1);
        assert_eq!(profile.rank, Rank::Silver);
    }

    #[test]
    fn spending_never_demotes_rank() {
        let mut profile = fresh();
        profile.award_points(1600);
        assert_eq!(profile.rank, Rank::Gold);

        profile.spend_points(1500).unwrap();
        assert_eq!(profile.points, 100);
        assert_eq!(profile.rank, Rank::Gold);

        // A later award re-derives from points but cannot pull the rank down.
        profile.award_points(10);
        assert_eq!(profile.rank, Rank::Gold);
    }

    #[test]
    fn overspending_is_rejected() {
        let mut profile = fresh();
        profile.award_points(100);
        assert!(profile.spend_points(101).is_err());
        assert_eq!(profile.points, 100);
    }

    #[test]
    fn activity_drives_streak() {
        let mut profile = fresh();
        assert_eq!(profile.record_activity(date(2025, 6, 1)), 1);
        assert_eq!(profile.record_activity(date(2025, 6, 1)), 1);
        assert_eq!(profile.record_activity(date(2025, 6, 2)), 2);
        assert_eq!(profile.record_activity(date(2025, 6, 5)), 1);
    }
}
