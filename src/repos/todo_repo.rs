/*
 * Responsibility
 * - todos テーブル向け SQLx 操作
 * - 読み出しは users と join して owner の location を取得し、date をその offset で返す
 * - フィルタは QueryBuilder の bind で組み立てる (文字列連結しない)
 */
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{NewTodo, TodoFilter, TodoItem, TodoPatch};
use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct TodoRow {
    #[sqlx(rename = "todoId")]
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub status: String,
    #[sqlx(rename = "ownerUserId")]
    pub owner_user_id: Uuid,
    pub location: String,
}

impl TryFrom<TodoRow> for TodoItem {
    type Error = RepoError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let location = Tz::from_str(&row.location)
            .map_err(|_| RepoError::InvalidData(format!("unknown location {}", row.location)))?;

        Ok(TodoItem {
            id: row.id,
            name: row.name,
            date: TodoItem::localize(row.date, &location),
            status: row.status,
            owner_user_id: row.owner_user_id,
        })
    }
}

const SELECT_JOINED: &str = r#"
    SELECT t."todoId", t.name, t.date, t.status, t."ownerUserId", u.location
    FROM todos t
    JOIN users u ON u."userId" = t."ownerUserId"
"#;

pub async fn list(db: &PgPool, filter: &TodoFilter) -> Result<Vec<TodoItem>, RepoError> {
    let mut qb = QueryBuilder::<Postgres>::new(SELECT_JOINED);
    qb.push(" WHERE TRUE");

    if let Some(owner) = filter.owner_user_id {
        qb.push(r#" AND t."ownerUserId" = "#).push_bind(owner);
    }
    if let Some(status) = &filter.status {
        qb.push(" AND t.status = ").push_bind(status);
    }
    if let Some(from) = filter.from_date {
        qb.push(" AND t.date >= ").push_bind(from);
    }
    if let Some(to) = filter.to_date {
        qb.push(" AND t.date <= ").push_bind(to);
    }
    qb.push(r#" ORDER BY t.date, t."createdAt""#);

    let rows = qb.build_query_as::<TodoRow>().fetch_all(db).await?;

    rows.into_iter().map(TodoItem::try_from).collect()
}

pub async fn create(db: &PgPool, todo: &NewTodo) -> Result<Uuid, RepoError> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO todos ("todoId", name, date, status, "ownerUserId")
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(&todo.name)
    .bind(todo.date)
    .bind(&todo.status)
    .bind(todo.owner_user_id)
    .execute(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(id)
}

pub async fn get(db: &PgPool, todo_id: Uuid) -> Result<Option<TodoItem>, RepoError> {
    let row = sqlx::query_as::<_, TodoRow>(&format!(r#"{SELECT_JOINED} WHERE t."todoId" = $1"#))
        .bind(todo_id)
        .fetch_optional(db)
        .await?;

    row.map(TodoItem::try_from).transpose()
}

pub async fn update(
    db: &PgPool,
    todo_id: Uuid,
    patch: &TodoPatch,
) -> Result<Option<TodoItem>, RepoError> {
    let row = sqlx::query_as::<_, TodoRow>(
        r#"
        WITH updated AS (
            UPDATE todos
            SET
                name = COALESCE($2, name),
                date = COALESCE($3, date),
                status = COALESCE($4, status)
            WHERE "todoId" = $1
            RETURNING "todoId", name, date, status, "ownerUserId"
        )
        SELECT t."todoId", t.name, t.date, t.status, t."ownerUserId", u.location
        FROM updated t
        JOIN users u ON u."userId" = t."ownerUserId"
        "#,
    )
    .bind(todo_id)
    .bind(patch.name.as_deref())
    .bind(patch.date)
    .bind(patch.status.as_deref())
    .fetch_optional(db)
    .await?;

    row.map(TodoItem::try_from).transpose()
}

pub async fn delete(db: &PgPool, todo_id: Uuid) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM todos
        WHERE "todoId" = $1
        "#,
    )
    .bind(todo_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
