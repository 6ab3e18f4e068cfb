use std::{collections::HashMap, sync::Arc};

use serde::Serialize;
use tokio::sync::RwLock;

/// Per-member activity tallies, re-read on every evaluation rather than
/// cached in the profile document.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct ActivitySnapshot {
    pub posts: u64,
    pub likes_given: u64,
    pub likes_received: u64,
    pub comments: u64,
    pub messages: u64,
    pub purchases: u64,
    pub referrals: u64,
    pub missions_completed: u64,
}

#[derive(Clone)]
pub struct ActivityLedger {
    counts: Arc<RwLock<HashMap<String, ActivitySnapshot>>>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self {
            counts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    async fn bump<F>(&self, uid: &str, apply: F) -> u64
    where
        F: FnOnce(&mut ActivitySnapshot) -> u64,
    {
        let mut counts = self.counts.write().await;
        let entry = counts.entry(uid.to_string()).or_default();
        apply(entry)
    }

    pub async fn record_post(&self, uid: &str) -> u64 {
        self.bump(uid, |c| {
            c.posts += 1;
            c.posts
        })
        .await
    }

    pub async fn record_like_given(&self, uid: &str) -> u64 {
        self.bump(uid, |c| {
            c.likes_given += 1;
            c.likes_given
        })
        .await
    }

    pub async fn record_like_received(&self, uid: &str) -> u64 {
        self.bump(uid, |c| {
            c.likes_received += 1;
            c.likes_received
        })
        .await
    }

    pub async fn record_comment(&self, uid: &str) -> u64 {
        self.bump(uid, |c| {
            c.comments += 1;
            c.comments
        })
        .await
    }

    pub async fn record_message(&self, uid: &str) -> u64 {
        self.bump(uid, |c| {
            c.messages += 1;
            c.messages
        })
        .await
    }

    pub async fn record_purchase(&self, uid: &str) -> u64 {
        self.bump(uid, |c| {
            c.purchases += 1;
            c.purchases
        })
        .await
    }

    pub async fn record_referral(&self, uid: &str) -> u64 {
        self.bump(uid, |c| {
            c.referrals += 1;
            c.referrals
        })
        .await
    }

    pub async fn record_mission(&self, uid: &str) -> u64 {
        self.bump(uid, |c| {
            c.missions_completed += 1;
            c.missions_completed
        })
        .await
    }

    pub async fn snapshot(&self, uid: &str) -> ActivitySnapshot {
        self.counts
            .read()
            .await
            .get(uid)
            .copied()
            .unwrap_or_default()
    }
}

impl Default for ActivityLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_accumulate_per_member() {
        let ledger = ActivityLedger::new();
        assert_eq!(ledger.record_post("a").await, 1);
        assert_eq!(ledger.record_post("a").await, 2);
        assert_eq!(ledger.record_post("b").await, 1);
        assert_eq!(ledger.record_message("a").await, 1);

        let snapshot = ledger.snapshot("a").await;
        assert_eq!(snapshot.posts, 2);
        assert_eq!(snapshot.messages, 1);
        assert_eq!(snapshot.purchases, 0);
    }

    #[tokio::test]
    async fn unknown_member_snapshot_is_zeroed() {
        let ledger = ActivityLedger::new();
        let snapshot = ledger.snapshot("nobody").await;
        assert_eq!(snapshot.posts, 0);
        assert_eq!(snapshot.referrals, 0);
    }
}
