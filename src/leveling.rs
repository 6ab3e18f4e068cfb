use serde::{Deserialize, Serialize};

const BASE_LEVEL_COST: u64 = 100;
const LEVEL_COST_GROWTH: f64 = 1.2;

/// XP needed to clear level `level` and move on to the next one.
pub fn level_cost(level: u32) -> u64 {
    (BASE_LEVEL_COST as f64 * LEVEL_COST_GROWTH.powi(level as i32 - 1)).floor() as u64
}

/// Total XP required to reach `level` from a fresh profile.
pub fn xp_for_level(level: u32) -> u64 {
    (1..level).map(level_cost).sum()
}

/// The largest level whose cumulative cost fits inside `xp`. Always >= 1.
pub fn calculate_level(xp: u64) -> u32 {
    let mut level = 1;
    let mut remaining = xp;

    loop {
        let cost = level_cost(level);
        if remaining < cost {
            return level;
        }
        remaining -= cost;
        level += 1;
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LevelProgress {
    pub level: u32,
    pub current: u64,
    pub needed: u64,
    pub percent: f64,
}

/// Progress within the active level band for a given XP total.
pub fn xp_to_next_level(xp: u64) -> LevelProgress {
    let level = calculate_level(xp);
    let current = xp - xp_for_level(level);
    let needed = level_cost(level);
    let percent = ((current as f64 / needed as f64) * 100.0).clamp(0.0, 100.0);

    LevelProgress {
        level,
        current,
        needed,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_profile_is_level_one() {
        assert_eq!(calculate_level(0), 1);
        let progress = xp_to_next_level(0);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.current, 0);
        assert_eq!(progress.needed, 100);
        assert_eq!(progress.percent, 0.0);
    }

    #[test]
    fn level_costs_grow_geometrically() {
        assert_eq!(level_cost(1), 100);
        assert_eq!(level_cost(2), 120);
        assert_eq!(level_cost(3), 144);
        assert_eq!(level_cost(4), 172);
    }

    #[test]
    fn cumulative_thresholds() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 100);
        assert_eq!(xp_for_level(3), 220);
        assert_eq!(xp_for_level(4), 364);
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(calculate_level(99), 1);
        assert_eq!(calculate_level(100), 2);
        assert_eq!(calculate_level(219), 2);
        assert_eq!(calculate_level(220), 3);
    }

    #[test]
    fn level_is_non_decreasing() {
        let mut previous = 0;
        for xp in (0..50_000).step_by(37) {
            let level = calculate_level(xp);
            assert!(level >= 1);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn band_containment() {
        for xp in [0, 1, 99, 100, 220, 1000, 12_345, 987_654] {
            let level = calculate_level(xp);
            assert!(xp_for_level(level) <= xp);
            assert!(xp < xp_for_level(level + 1));
        }
    }

    #[test]
    fn progress_stays_in_bounds() {
        for xp in (0..10_000).step_by(113) {
            let progress = xp_to_next_level(xp);
            assert!(progress.current < progress.needed);
            assert!((0.0..=100.0).contains(&progress.percent));
        }
    }
}
