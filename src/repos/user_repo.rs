/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - PgPool を受け取り CRUD を提供
 * - userName の一意制約違反は RepoError::Conflict として返す
 */
use std::str::FromStr;

use chrono_tz::Tz;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{NewUser, User, UserFilter, UserPatch};
use crate::repos::error::RepoError;

const USER_COLUMNS: &str =
    r#""userId", "userName", "firstName", "lastName", "passwordHash", location"#;

#[derive(Debug, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    #[sqlx(rename = "userName")]
    pub user_name: String,
    #[sqlx(rename = "firstName")]
    pub first_name: String,
    #[sqlx(rename = "lastName")]
    pub last_name: String,
    #[sqlx(rename = "passwordHash")]
    pub password_hash: String,
    pub location: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let location = Tz::from_str(&row.location)
            .map_err(|_| RepoError::InvalidData(format!("unknown location {}", row.location)))?;

        Ok(User {
            id: row.id,
            user_name: row.user_name,
            first_name: row.first_name,
            last_name: row.last_name,
            password_hash: row.password_hash,
            location,
        })
    }
}

pub async fn list(db: &PgPool, filter: &UserFilter) -> Result<Vec<User>, RepoError> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
    if let Some(name) = &filter.user_name {
        qb.push(r#" WHERE "userName" = "#).push_bind(name);
    }
    qb.push(r#" ORDER BY "createdAt""#);

    let rows = qb.build_query_as::<UserRow>().fetch_all(db).await?;

    rows.into_iter().map(User::try_from).collect()
}

pub async fn create(db: &PgPool, user: &NewUser) -> Result<Uuid, RepoError> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users ("userId", "userName", "firstName", "lastName", "passwordHash", location)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(&user.user_name)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.password_hash)
    .bind(user.location.name())
    .execute(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(id)
}

pub async fn get(db: &PgPool, user_id: Uuid) -> Result<Option<User>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"SELECT {USER_COLUMNS} FROM users WHERE "userId" = $1"#
    ))
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    row.map(User::try_from).transpose()
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    patch: &UserPatch,
) -> Result<Option<User>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET
            "userName" = COALESCE($2, "userName"),
            "firstName" = COALESCE($3, "firstName"),
            "lastName" = COALESCE($4, "lastName"),
            "passwordHash" = COALESCE($5, "passwordHash"),
            location = COALESCE($6, location)
        WHERE "userId" = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(patch.user_name.as_deref())
    .bind(patch.first_name.as_deref())
    .bind(patch.last_name.as_deref())
    .bind(patch.password_hash.as_deref())
    .bind(patch.location.map(|tz| tz.name()))
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    row.map(User::try_from).transpose()
}

/// Owned todos go with the user through `ON DELETE CASCADE`.
pub async fn delete(db: &PgPool, user_id: Uuid) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
