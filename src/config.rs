use std::env;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub rewards: RewardConfig,
    pub club: ClubConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

/// Base awards per member action. Action XP runs through the streak
/// multiplier; points are credited flat.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RewardConfig {
    pub post_xp: u64,
    pub comment_xp: u64,
    pub message_xp: u64,
    pub like_xp: u64,
    pub referral_xp: u64,
    pub checkin_points: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClubConfig {
    pub daily_mission_count: usize,
    pub leaderboard_top_n: usize,
    pub leaderboard_refresh_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .or_else(|_| env::var("SERVER_PORT"))
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
                cors_origins: env::var("CORS_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            rewards: RewardConfig {
                post_xp: env::var("POST_XP")
                    .unwrap_or_else(|_| "25".to_string())
                    .parse()
                    .unwrap_or(25),
                comment_xp: env::var("COMMENT_XP")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                message_xp: env::var("MESSAGE_XP")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                like_xp: env::var("LIKE_XP")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
                referral_xp: env::var("REFERRAL_XP")
                    .unwrap_or_else(|_| "40".to_string())
                    .parse()
                    .unwrap_or(40),
                checkin_points: env::var("CHECKIN_POINTS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            club: ClubConfig {
                daily_mission_count: env::var("DAILY_MISSION_COUNT")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .unwrap_or(3),
                leaderboard_top_n: env::var("LEADERBOARD_TOP_N")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
                leaderboard_refresh_secs: env::var("LEADERBOARD_REFRESH_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()
                    .unwrap_or(120),
            },
        })
    }
}
