use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::{profile::UserProfile, rank::Rank};

#[derive(Clone, Copy, Debug, Serialize)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost_points: u64,
    pub required_rank: Option<Rank>,
}

pub const PRODUCTS: &[Product] = &[
    Product {
        id: "sticker-pack",
        name: "Sticker Pack",
        description: "A sheet of club stickers",
        cost_points: 100,
        required_rank: None,
    },
    Product {
        id: "club-mug",
        name: "Club Mug",
        description: "Enameled mug with the club crest",
        cost_points: 250,
        required_rank: None,
    },
    Product {
        id: "profile-flair",
        name: "Profile Flair",
        description: "Animated border for your avatar",
        cost_points: 500,
        required_rank: Some(Rank::Silver),
    },
    Product {
        id: "vip-lounge-pass",
        name: "VIP Lounge Pass",
        description: "A month of access to the VIP lounge",
        cost_points: 1200,
        required_rank: Some(Rank::Gold),
    },
    Product {
        id: "founders-jacket",
        name: "Founders Jacket",
        description: "Limited-run embroidered jacket",
        cost_points: 2500,
        required_rank: Some(Rank::Platinum),
    },
    Product {
        id: "gala-invite",
        name: "Gala Invitation",
        description: "Seat at the annual members' gala",
        cost_points: 4000,
        required_rank: Some(Rank::Diamond),
    },
];

pub fn get_product(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

/// Rank gate first, balance second: a product locked behind a tier is
/// rejected no matter how many points the member holds.
pub fn check_eligibility(product: &Product, profile: &UserProfile) -> Result<()> {
    if let Some(required) = product.required_rank {
        if profile.rank < required {
            return Err(anyhow!(
                "'{}' requires {} rank, member is {}",
                product.name,
                required.display_name(),
                profile.rank.display_name()
            ));
        }
    }

    if profile.points < product.cost_points {
        return Err(anyhow!(
            "Insufficient points for '{}'. Have: {}, need: {}",
            product.name,
            profile.points,
            product.cost_points
        ));
    }

    Ok(())
}
