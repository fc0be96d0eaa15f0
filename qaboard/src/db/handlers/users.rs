//! Database repository for users.

use crate::types::{MacAddress, UserId};
use crate::db::{
    errors::{DbError, Result},
    models::users::{UserCreateDBRequest, UserDBResponse},
};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct User {
    pub id: UserId,
    pub mac_address: String,
    pub username: String,
    pub points: i32,
}

impl From<User> for UserDBResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            mac_address: MacAddress::new(&user.mac_address),
            username: user.username,
            points: user.points,
        }
    }
}

pub struct Users<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Register a device. A second registration of the same address fails on the
    /// `users_mac_address_key` constraint.
    #[instrument(skip(self, request), fields(username = %request.username), err)]
    pub async fn create(&mut self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (mac_address, username, points)
            VALUES ($1, $2, $3)
            RETURNING id, mac_address, username, points
            "#,
        )
        .bind(request.mac_address.as_str())
        .bind(&request.username)
        .bind(request.points)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(UserDBResponse::from(user))
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: UserId) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, User>("SELECT id, mac_address, username, points FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user.map(UserDBResponse::from))
    }

    #[instrument(skip(self, mac_address), err)]
    pub async fn get_user_by_mac_address(&mut self, mac_address: &MacAddress) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, User>("SELECT id, mac_address, username, points FROM users WHERE mac_address = $1")
            .bind(mac_address.as_str())
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user.map(UserDBResponse::from))
    }

    /// Add `delta` to a balance in a single statement and return the new balance.
    /// Balances have no floor and may go negative.
    #[instrument(skip(self), err)]
    pub async fn adjust_points(&mut self, id: UserId, delta: i32) -> Result<i32> {
        let points = sqlx::query_scalar::<_, i32>("UPDATE users SET points = points + $2 WHERE id = $1 RETURNING points")
            .bind(id)
            .bind(delta)
            .fetch_optional(&mut *self.db)
            .await?;

        points.ok_or(DbError::not_found("user"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    fn request(mac: &str, username: &str) -> UserCreateDBRequest {
        UserCreateDBRequest {
            mac_address: MacAddress::new(mac),
            username: username.to_string(),
            points: 100,
        }
    }

    #[sqlx::test]
    async fn test_create_user(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let user = repo.create(&request("AA:BB:CC:DD:EE:01", "alice")).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.points, 100);
        assert_eq!(user.mac_address.as_str(), "aa:bb:cc:dd:ee:01");

        let found = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found, user);
    }

    #[sqlx::test]
    async fn test_get_user_by_mac_address(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let created = repo.create(&request("aa:bb:cc:dd:ee:02", "bob")).await.unwrap();

        let found = repo
            .get_user_by_mac_address(&MacAddress::new("AA:BB:CC:DD:EE:02"))
            .await
            .unwrap()
            .expect("lookup is case-insensitive");
        assert_eq!(found.id, created.id);

        let missing = repo.get_user_by_mac_address(&MacAddress::new("00:00:00:00:00:00")).await.unwrap();
        assert!(missing.is_none());
    }

    #[sqlx::test]
    async fn test_duplicate_mac_address_is_unique_violation(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let first = repo.create(&request("aa:bb:cc:dd:ee:03", "carol")).await.unwrap();
        let err = repo.create(&request("AA:BB:CC:DD:EE:03", "mallory")).await.unwrap_err();

        match err {
            DbError::UniqueViolation { constraint, table, .. } => {
                assert_eq!(constraint.as_deref(), Some("users_mac_address_key"));
                assert_eq!(table.as_deref(), Some("users"));
            }
            other => panic!("expected unique violation, got {other:?}"),
        }

        let unchanged = repo.get_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(unchanged.username, "carol");
    }

    #[sqlx::test]
    async fn test_adjust_points_allows_negative_balance(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let user = repo.create(&request("aa:bb:cc:dd:ee:04", "dave")).await.unwrap();
        assert_eq!(repo.adjust_points(user.id, 5).await.unwrap(), 105);
        assert_eq!(repo.adjust_points(user.id, -200).await.unwrap(), -95);

        let err = repo.adjust_points(user.id + 1000, 5).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "user" }));
    }
}
