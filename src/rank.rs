use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Rank {
    /// The tier whose points band contains `points`.
    pub const fn from_points(points: u64) -> Self {
        if points >= 5000 {
            Rank::Diamond
        } else if points >= 3000 {
            Rank::Platinum
        } else if points >= 1500 {
            Rank::Gold
        } else if points >= 500 {
            Rank::Silver
        } else {
            Rank::Bronze
        }
    }

    pub const fn min_points(&self) -> u64 {
        match self {
            Rank::Bronze => 0,
            Rank::Silver => 500,
            Rank::Gold => 1500,
            Rank::Platinum => 3000,
            Rank::Diamond => 5000,
        }
    }

    pub const fn next(&self) -> Option<Rank> {
        match self {
            Rank::Bronze => Some(Rank::Silver),
            Rank::Silver => Some(Rank::Gold),
            Rank::Gold => Some(Rank::Platinum),
            Rank::Platinum => Some(Rank::Diamond),
            Rank::Diamond => None,
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Rank::Bronze => "Bronze",
            Rank::Silver => "Silver",
            Rank::Gold => "Gold",
            Rank::Platinum => "Platinum",
            Rank::Diamond => "Diamond",
        }
    }
}
