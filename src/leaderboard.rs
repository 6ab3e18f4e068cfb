use serde::{Deserialize, Serialize};

use crate::{profile::UserProfile, rank::Rank};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub uid: String,
    pub display_name: String,
    pub position: u32,
    pub level: u32,
    pub rank: Rank,
    pub points: u64,
}

/// Top-N standings by points, XP breaking ties, uid keeping the order
/// stable. Positions are 1-based.
pub fn standings(profiles: &[UserProfile], top_n: usize) -> Vec<LeaderboardEntry> {
    let mut sorted: Vec<&UserProfile> = profiles.iter().collect();
    sorted.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.xp.cmp(&a.xp))
            .then(a.uid.cmp(&b.uid))
    });

    sorted
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, profile)| LeaderboardEntry {
            uid: profile.uid.clone(),
            display_name: profile.display_name.clone(),
            position: (i + 1) as u32,
            level: profile.level,
            rank: profile.rank,
            points: profile.points,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(uid: &str, points: u64, xp: u64) -> UserProfile {
        let mut profile = UserProfile::new(uid.to_string(), format!("Member {}", uid));
        profile.award_points(points);
        profile.award_xp(xp);
        profile
    }

    #[test]
    fn orders_by_points_descending() {
        let profiles = vec![member("a", 100, 0), member("b", 300, 0), member("c", 200, 0)];
        let standings = standings(&profiles, 10);

        let uids: Vec<&str> = standings.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(uids, vec!["b", "c", "a"]);
        assert_eq!(standings[0].position, 1);
        assert_eq!(standings[2].position, 3);
    }

    #[test]
    fn xp_breaks_point_ties() {
        let profiles = vec![member("a", 100, 10), member("b", 100, 90)];
        let standings = standings(&profiles, 10);
        assert_eq!(standings[0].uid, "b");
    }

    #[test]
    fn truncates_to_top_n() {
        let profiles: Vec<UserProfile> = (0..20)
            .map(|i| member(&format!("m{:02}", i), i * 10, 0))
            .collect();
        let standings = standings(&profiles, 10);
        assert_eq!(standings.len(), 10);
        assert_eq!(standings[0].points, 190);
    }

    #[test]
    fn empty_club_produces_empty_board() {
        assert!(standings(&[], 10).is_empty());
    }
}
