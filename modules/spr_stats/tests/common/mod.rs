#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use spr_stats::domain::ports::TrackerSource;
use spr_stats::model::{Release, Resolution, Spr, Territory, User};

/// In-memory tracker whose contents can be edited between ticks.
#[derive(Default)]
pub struct MemorySource {
    pub users: Mutex<Vec<User>>,
    pub sprs: Mutex<Vec<Spr>>,
    pub releases: Mutex<Vec<Release>>,
    pub failing: AtomicBool,
}

impl MemorySource {
    pub fn seeded() -> Self {
        let src = Self::default();
        *src.users.lock().unwrap() = vec![
            User::new(1, "admin").with_first_name("Administrator"),
            User::new(2, "ann").with_first_name("Ann"),
            User::new(3, "bob").with_first_name("Bob"),
            User::new(4, "system").with_first_name("System"),
        ];
        *src.sprs.lock().unwrap() = vec![
            spr(1, Territory::CetcWest, "ann", Resolution::New),
            spr(2, Territory::Hudson, "ann", Resolution::Reviewed),
            spr(3, Territory::Sed, "ann", Resolution::Duplicate),
            spr(4, Territory::Ned, "bob", Resolution::PartiallyFixed),
        ];
        let now = Utc::now();
        let mut current = Release::new(Territory::Sed, now - Duration::days(10));
        current.id = 1;
        current.current = true;
        let mut upcoming = Release::new(Territory::Sed, now + Duration::days(10));
        upcoming.id = 2;
        *src.releases.lock().unwrap() = vec![current, upcoming];
        src
    }

    pub fn push_spr(&self, spr: Spr) {
        self.sprs.lock().unwrap().push(spr);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("tracker offline");
        }
        Ok(())
    }
}

pub fn spr(number: i64, territory: Territory, login: &str, resolution: Resolution) -> Spr {
    let mut s = Spr::new(territory, number)
        .owned_by(User::new(0, login))
        .with_resolution(resolution);
    s.id = number;
    s
}

#[async_trait]
impl TrackerSource for MemorySource {
    async fn fetch_all_records(&self) -> anyhow::Result<Vec<Spr>> {
        self.check()?;
        Ok(self.sprs.lock().unwrap().clone())
    }

    async fn fetch_all_users(&self) -> anyhow::Result<Vec<User>> {
        self.check()?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn fetch_all_releases(&self) -> anyhow::Result<Vec<Release>> {
        self.check()?;
        Ok(self.releases.lock().unwrap().clone())
    }
}

/// Let spawned tasks run without moving the paused clock.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
