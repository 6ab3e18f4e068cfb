use serde::{Deserialize, Serialize};

pub mod achievements;
pub mod api;
pub mod config;
pub mod counters;
pub mod engine;
pub mod events;
pub mod leaderboard;
pub mod leveling;
pub mod missions;
pub mod profile;
pub mod rank;
pub mod rate_limiter;
pub mod session;
pub mod shop;
pub mod state;
pub mod store;
pub mod streak;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const fn xp_reward(&self) -> u64 {
        match self {
            Rarity::Common => 50,
            Rarity::Rare => 150,
            Rarity::Epic => 500,
            Rarity::Legendary => 1000,
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_xp_rewards() {
        assert_eq!(Rarity::Common.xp_reward(), 50);
        assert_eq!(Rarity::Rare.xp_reward(), 150);
        assert_eq!(Rarity::Epic.xp_reward(), 500);
        assert_eq!(Rarity::Legendary.xp_reward(), 1000);
    }
}
