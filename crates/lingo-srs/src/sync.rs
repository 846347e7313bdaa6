//! Cross-device review progress.
//!
//! Devices review offline and reconcile later. For each item the copy
//! with the most recent review wins.

use crate::models::ReviewItem;
use crate::SrsResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Merge local progress into remote progress.
///
/// Remote order is kept. A local item replaces its remote copy only when
/// it was reviewed strictly later; never-reviewed counts as oldest. Local
/// items the remote side has not seen are appended.
pub fn merge_review_items(local: &[ReviewItem], remote: &[ReviewItem]) -> Vec<ReviewItem> {
    let mut merged: Vec<ReviewItem> = Vec::with_capacity(remote.len() + local.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for item in remote {
        match positions.get(item.id.as_str()) {
            // Duplicate ids on one side collapse; the last copy wins.
            Some(&pos) => merged[pos] = item.clone(),
            None => {
                positions.insert(item.id.as_str(), merged.len());
                merged.push(item.clone());
            }
        }
    }

    let mut replaced = 0;
    let mut added = 0;
    for item in local {
        match positions.get(item.id.as_str()) {
            Some(&pos) => {
                if reviewed_at(item) > reviewed_at(&merged[pos]) {
                    merged[pos] = item.clone();
                    replaced += 1;
                }
            }
            None => {
                positions.insert(item.id.as_str(), merged.len());
                merged.push(item.clone());
                added += 1;
            }
        }
    }

    tracing::debug!(
        remote = remote.len(),
        local = local.len(),
        replaced,
        added,
        "merged review items"
    );
    merged
}

fn reviewed_at(item: &ReviewItem) -> DateTime<Utc> {
    item.last_reviewed.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Serialized review progress for one user, as last written by a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    pub user_id: String,
    /// Device that wrote the snapshot.
    pub device_id: String,
    pub review_items: Vec<ReviewItem>,
    pub last_sync_timestamp: DateTime<Utc>,
    /// Increases by one on every write.
    pub sync_version: u64,
}

impl SyncSnapshot {
    /// Build the snapshot that follows `previous` after syncing `local_items`.
    pub fn next(
        previous: Option<&SyncSnapshot>,
        user_id: impl Into<String>,
        device_id: impl Into<String>,
        local_items: &[ReviewItem],
        now: DateTime<Utc>,
    ) -> Self {
        let (review_items, sync_version) = match previous {
            Some(prev) => (
                merge_review_items(local_items, &prev.review_items),
                prev.sync_version.saturating_add(1),
            ),
            None => (local_items.to_vec(), 1),
        };

        Self {
            user_id: user_id.into(),
            device_id: device_id.into(),
            review_items,
            last_sync_timestamp: now,
            sync_version,
        }
    }

    pub fn to_json(&self) -> SrsResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SrsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SrsError;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn item(id: &str, last_reviewed: Option<DateTime<Utc>>, repetitions: u32) -> ReviewItem {
        ReviewItem {
            last_reviewed,
            repetitions,
            ..ReviewItem::new(id, "Thank you", "Gracias", t0())
        }
    }

    fn ids(items: &[ReviewItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_newer_local_wins_in_remote_position() {
        let remote = vec![
            item("a", Some(t0()), 1),
            item("b", Some(t0()), 1),
        ];
        let local = vec![item("b", Some(t0() + Duration::hours(2)), 2)];

        let merged = merge_review_items(&local, &remote);
        assert_eq!(ids(&merged), vec!["a", "b"]);
        assert_eq!(merged[1].repetitions, 2);
    }

    #[test]
    fn test_older_or_equal_local_loses() {
        let remote = vec![item("a", Some(t0()), 4)];

        let older = vec![item("a", Some(t0() - Duration::days(1)), 9)];
        assert_eq!(merge_review_items(&older, &remote)[0].repetitions, 4);

        let same = vec![item("a", Some(t0()), 9)];
        assert_eq!(merge_review_items(&same, &remote)[0].repetitions, 4);
    }

    #[test]
    fn test_never_reviewed_counts_as_oldest() {
        let remote = vec![item("a", None, 0)];
        let local = vec![item("a", Some(t0()), 1)];
        assert_eq!(merge_review_items(&local, &remote)[0].repetitions, 1);

        let remote = vec![item("a", Some(t0()), 1)];
        let local = vec![item("a", None, 0)];
        assert_eq!(merge_review_items(&local, &remote)[0].repetitions, 1);
    }

    #[test]
    fn test_local_only_items_appended() {
        let remote = vec![item("a", None, 0)];
        let local = vec![item("c", None, 0), item("a", None, 0), item("b", None, 0)];

        let merged = merge_review_items(&local, &remote);
        assert_eq!(ids(&merged), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_first_snapshot() {
        let items = vec![item("a", None, 0)];
        let snapshot = SyncSnapshot::next(None, "user-1", "phone", &items, t0());

        assert_eq!(snapshot.sync_version, 1);
        assert_eq!(snapshot.review_items, items);
        assert_eq!(snapshot.last_sync_timestamp, t0());
    }

    #[test]
    fn test_next_snapshot_merges_and_bumps_version() {
        let first = SyncSnapshot::next(None, "user-1", "phone", &[item("a", Some(t0()), 1)], t0());
        let laptop_items = vec![
            item("a", Some(t0() + Duration::days(1)), 2),
            item("b", None, 0),
        ];

        let second = SyncSnapshot::next(
            Some(&first),
            "user-1",
            "laptop",
            &laptop_items,
            t0() + Duration::days(1),
        );

        assert_eq!(second.sync_version, 2);
        assert_eq!(second.device_id, "laptop");
        assert_eq!(ids(&second.review_items), vec!["a", "b"]);
        assert_eq!(second.review_items[0].repetitions, 2);
    }

    #[test]
    fn test_version_saturates() {
        let mut first = SyncSnapshot::next(None, "user-1", "phone", &[], t0());
        first.sync_version = u64::MAX;

        let second = SyncSnapshot::next(Some(&first), "user-1", "phone", &[], t0());
        assert_eq!(second.sync_version, u64::MAX);
    }

    #[test]
    fn test_snapshot_json() {
        let items = vec![item("a", Some(t0()), 1)];
        let snapshot = SyncSnapshot::next(None, "user-1", "phone", &items, t0());
        let json = snapshot.to_json().unwrap();

        assert!(json.contains("\"syncVersion\":1"));
        assert!(json.contains("\"reviewItems\""));
        assert_eq!(SyncSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_snapshot_bad_json() {
        let result = SyncSnapshot::from_json("{\"userId\": 5}");
        assert!(matches!(result, Err(SrsError::Json(_))));
    }
}
