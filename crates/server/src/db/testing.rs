//! In-memory record store doubles for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use parcelhub_core::{PackageId, UserId, Username};

use super::{RecordStore, RepositoryError};
use crate::models::{NewPackage, NewUser, Package, User};

/// In-memory record store enforcing the same uniqueness rules as the
/// database schema.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    users: Vec<User>,
    packages: Vec<Package>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn find_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| &u.username == username).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut inner = self.inner.lock().await;
        if inner
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(RepositoryError::Conflict(
                "username or email already exists".to_owned(),
            ));
        }

        let id = i32::try_from(inner.users.len())
            .map_err(|_| RepositoryError::DataCorruption("user id overflow".to_owned()))?
            + 1;
        let created = User {
            id: UserId::new(id),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            age: user.age,
        };
        inner.users.push(created.clone());
        Ok(created)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.inner.lock().await.users.clone())
    }

    async fn insert_package(&self, package: NewPackage) -> Result<Package, RepositoryError> {
        let mut inner = self.inner.lock().await;
        let id = i32::try_from(inner.packages.len())
            .map_err(|_| RepositoryError::DataCorruption("package id overflow".to_owned()))?
            + 1;
        let created = Package {
            id: PackageId::new(id),
            user_id: package.user_id,
            height: package.height,
            width: package.width,
            length: package.length,
            weight: package.weight,
        };
        inner.packages.push(created.clone());
        Ok(created)
    }

    async fn list_packages(&self) -> Result<Vec<Package>, RepositoryError> {
        Ok(self.inner.lock().await.packages.clone())
    }
}

/// Wrapper that counts reads and writes hitting the inner store, so tests
/// can assert that a cache hit skipped the store entirely.
pub struct CountingRecordStore {
    inner: Arc<dyn RecordStore>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingRecordStore {
    pub fn new(inner: Arc<dyn RecordStore>) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for CountingRecordStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.inner.ping().await
    }

    async fn find_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find_user_by_username(username).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_user(user).await
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.list_users().await
    }

    async fn insert_package(&self, package: NewPackage) -> Result<Package, RepositoryError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_package(package).await
    }

    async fn list_packages(&self) -> Result<Vec<Package>, RepositoryError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.list_packages().await
    }
}
