use chrono::NaiveDate;

/// Ascending milestone table: consecutive days -> XP multiplier.
const MILESTONES: &[(u32, f64)] = &[(3, 1.1), (7, 1.25), (14, 1.5), (30, 2.0)];

/// The highest milestone multiplier earned by `streak_days`, or 1.0 below the
/// first milestone.
pub fn bonus_multiplier(streak_days: u32) -> f64 {
    MILESTONES
        .iter()
        .rev()
        .find(|(days, _)| streak_days >= *days)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(1.0)
}

/// Applies the streak multiplier to an action's base XP award.
pub fn apply_bonus(base_xp: u64, streak_days: u32) -> u64 {
    (base_xp as f64 * bonus_multiplier(streak_days)).round() as u64
}

/// Streak transition for a day of activity: same day is a no-op, the next
/// calendar day extends the run, anything else restarts it at 1.
pub fn advance(last_active: Option<NaiveDate>, streak_days: u32, today: NaiveDate) -> u32 {
    match last_active {
        Some(day) if day == today => streak_days,
        Some(day) if day.succ_opt() == Some(today) => streak_days + 1,
        _ => 1,
    }
}
