//! `PostgreSQL` implementation of the record store.
//!
//! Queries are bound at runtime (`query_as`) so the crate builds without a
//! live database; row types map into domain types at the boundary, treating
//! invalid stored values as data corruption rather than panicking.

use async_trait::async_trait;
use sqlx::PgPool;

use parcelhub_core::{Email, PackageId, UserId, Username};

use super::{RecordStore, RepositoryError};
use crate::models::{NewPackage, NewUser, Package, User};

/// Record store backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row type for the `users` table.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    password_hash: String,
    age: Option<i32>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let username = Username::parse(&self.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            username,
            email,
            password_hash: self.password_hash,
            age: self.age,
        })
    }
}

/// Row type for the `packages` table.
#[derive(sqlx::FromRow)]
struct PackageRow {
    id: i32,
    user_id: i32,
    height: f64,
    width: f64,
    length: f64,
    weight: f64,
}

impl From<PackageRow> for Package {
    fn from(row: PackageRow) -> Self {
        Self {
            id: PackageId::new(row.id),
            user_id: UserId::new(row.user_id),
            height: row.height,
            width: row.width,
            length: row.length,
            weight: row.weight,
        }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, password_hash, age
            FROM users
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (username, email, password_hash, age)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, age
            ",
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.age)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username or email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, password_hash, age
            FROM users
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn insert_package(&self, package: NewPackage) -> Result<Package, RepositoryError> {
        let row = sqlx::query_as::<_, PackageRow>(
            r"
            INSERT INTO packages (user_id, height, width, length, weight)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, height, width, length, weight
            ",
        )
        .bind(package.user_id.as_i32())
        .bind(package.height)
        .bind(package.width)
        .bind(package.length)
        .bind(package.weight)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_packages(&self) -> Result<Vec<Package>, RepositoryError> {
        let rows = sqlx::query_as::<_, PackageRow>(
            r"
            SELECT id, user_id, height, width, length, weight
            FROM packages
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Package::from).collect())
    }
}
