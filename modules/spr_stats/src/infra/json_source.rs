use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};

use crate::contract::model::{Release, Spr, User};
use crate::domain::ports::TrackerSource;

/// On-disk layout of a tracker export. Missing arrays are empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub sprs: Vec<Spr>,
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Same layout with entries left undecoded, so one bad entry only costs itself.
#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    users: Vec<Value>,
    #[serde(default)]
    sprs: Vec<Value>,
    #[serde(default)]
    releases: Vec<Value>,
}

fn decode_entries<T: DeserializeOwned>(kind: &'static str, path: &Path, raw: Vec<Value>) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(kind, index, source = %path.display(), error = %e, "skipping undecodable entry");
                None
            }
        })
        .collect()
}

/// [`TrackerSource`] backed by a JSON file that is re-read on every fetch, so edits show
/// up on the next poll tick.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read_snapshot(&self) -> anyhow::Result<TrackerSnapshot> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read tracker data from {}", self.path.display()))?;
        let raw: RawSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("invalid tracker data in {}", self.path.display()))?;
        let snapshot = TrackerSnapshot {
            users: decode_entries("user", &self.path, raw.users),
            sprs: decode_entries("spr", &self.path, raw.sprs),
            releases: decode_entries("release", &self.path, raw.releases),
        };
        trace!(
            users = snapshot.users.len(),
            sprs = snapshot.sprs.len(),
            releases = snapshot.releases.len(),
            "tracker snapshot loaded"
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl TrackerSource for JsonFileSource {
    async fn fetch_all_records(&self) -> anyhow::Result<Vec<Spr>> {
        Ok(self.read_snapshot().await?.sprs)
    }

    async fn fetch_all_users(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.read_snapshot().await?.users)
    }

    async fn fetch_all_releases(&self) -> anyhow::Result<Vec<Release>> {
        Ok(self.read_snapshot().await?.releases)
    }
}
