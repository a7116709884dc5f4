//! In-memory user records
//!
//! Keeps read and write counters so callers can observe how often the
//! store is actually reached behind the cache.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use trellis_domain::error::{Error, Result};
use trellis_infrastructure::di::{Injectable, Named};

/// Stored account
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub nickname: Option<String>,
    pub age: Option<i64>,
    pub salt: String,
    pub password_hash: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Fields of a record about to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub nickname: Option<String>,
    pub age: Option<i64>,
    pub salt: String,
    pub password_hash: String,
}

/// Filter applied by [`UserStore::search`]
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub username: Option<String>,
    pub age: Option<i64>,
    pub active: Option<bool>,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<BTreeMap<u64, UserRecord>>,
    sequence: AtomicU64,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl Named for UserStore {
    const NAME: &'static str = "UserStore";
}

impl Injectable for UserStore {
    fn instantiate() -> Self {
        Self::default()
    }
}

impl UserStore {
    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<u64, UserRecord>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.users
            .read()
            .map_err(|_| Error::internal("user store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<u64, UserRecord>>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.users
            .write()
            .map_err(|_| Error::internal("user store lock poisoned"))
    }

    /// Insert a record under the next id
    ///
    /// Usernames are unique; the check and the insert share one write lock.
    pub fn insert(&self, user: NewUser) -> Result<UserRecord> {
        let mut users = self.write()?;
        if users.values().any(|existing| existing.username == user.username) {
            return Err(Error::service("`username` has exists."));
        }
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let record = UserRecord {
            id,
            username: user.username,
            nickname: user.nickname,
            age: user.age,
            salt: user.salt,
            password_hash: user.password_hash,
            active: true,
            created_at: Utc::now(),
            last_login_at: None,
        };
        users.insert(id, record.clone());
        Ok(record)
    }

    pub fn find(&self, id: u64) -> Result<Option<UserRecord>> {
        Ok(self.read()?.get(&id).cloned())
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        Ok(self
            .read()?
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    /// Records matching `filter`, ordered by id
    pub fn search(&self, filter: &UserFilter) -> Result<Vec<UserRecord>> {
        Ok(self
            .read()?
            .values()
            .filter(|user| {
                filter
                    .username
                    .as_deref()
                    .is_none_or(|needle| user.username.contains(needle))
            })
            .filter(|user| filter.age.is_none_or(|age| user.age == Some(age)))
            .filter(|user| filter.active.is_none_or(|active| user.active == active))
            .skip(filter.offset)
            .take(filter.limit)
            .cloned()
            .collect())
    }

    /// Apply `change` to record `id` and return the result
    pub fn update<F>(&self, id: u64, change: F) -> Result<Option<UserRecord>>
    where
        F: FnOnce(&mut UserRecord),
    {
        let mut users = self.write()?;
        Ok(users.get_mut(&id).map(|user| {
            change(user);
            user.clone()
        }))
    }

    pub fn remove(&self, id: u64) -> Result<Option<UserRecord>> {
        Ok(self.write()?.remove(&id))
    }

    /// Delete every deactivated record; returns the removed ids
    pub fn purge_inactive(&self) -> Result<Vec<u64>> {
        let mut users = self.write()?;
        let inactive: Vec<u64> = users
            .values()
            .filter(|user| !user.active)
            .map(|user| user.id)
            .collect();
        for id in &inactive {
            users.remove(id);
        }
        Ok(inactive)
    }

    /// Number of read accesses so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of write accesses so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
