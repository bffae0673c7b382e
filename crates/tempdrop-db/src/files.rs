use crate::types::{FileMetadataRow, FileRow, InsertFileParams};
use chrono::{DateTime, Utc};

/// Get the id of the live (unexpired at `now`) file holding `name`, if any
pub async fn find_live_id(
    executor: impl sqlx::PgExecutor<'_>,
    name: &str,
    now: DateTime<Utc>,
) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM shared_files WHERE name = $1 AND expires_at > $2")
            .bind(name)
            .bind(now)
            .fetch_optional(executor)
            .await?;
    Ok(row.map(|r| r.0))
}

/// Insert a shared file, returning its id.
///
/// A row already holding the name is overwritten and given a fresh id, so
/// an expired-but-unpurged name can be reused and a racing upload of the
/// same name ends with the last writer's data.
pub async fn insert(
    executor: impl sqlx::PgExecutor<'_>,
    p: &InsertFileParams,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO shared_files (
            name, original_name, content_type, size_bytes, upload_type,
            file_data, text_content, created_at, expires_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (name) DO UPDATE SET
            id = nextval(pg_get_serial_sequence('shared_files', 'id')),
            original_name = EXCLUDED.original_name,
            content_type = EXCLUDED.content_type,
            size_bytes = EXCLUDED.size_bytes,
            upload_type = EXCLUDED.upload_type,
            file_data = EXCLUDED.file_data,
            text_content = EXCLUDED.text_content,
            created_at = EXCLUDED.created_at,
            expires_at = EXCLUDED.expires_at
        RETURNING id
        "#,
    )
    .bind(&p.name)
    .bind(&p.original_name)
    .bind(&p.content_type)
    .bind(p.size_bytes)
    .bind(&p.upload_type)
    .bind(&p.file_data)
    .bind(&p.text_content)
    .bind(p.created_at)
    .bind(p.expires_at)
    .fetch_one(executor)
    .await?;
    Ok(row.0)
}

/// Get a shared file by name, regardless of expiry
pub async fn get_by_name(
    executor: impl sqlx::PgExecutor<'_>,
    name: &str,
) -> Result<Option<FileRow>, sqlx::Error> {
    sqlx::query_as::<_, FileRow>(
        r#"
        SELECT
            id, name, original_name, content_type, size_bytes, upload_type,
            file_data, text_content, created_at, expires_at
        FROM shared_files
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(executor)
    .await
}

/// Delete a shared file by id, returning whether a row was removed
pub async fn delete_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM shared_files WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete every shared file that expired before `now`, returning the count
pub async fn delete_expired_before(
    executor: impl sqlx::PgExecutor<'_>,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM shared_files WHERE expires_at < $1")
        .bind(now)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// List metadata of files still live at `now`, newest first
pub async fn list_active(
    executor: impl sqlx::PgExecutor<'_>,
    now: DateTime<Utc>,
) -> Result<Vec<FileMetadataRow>, sqlx::Error> {
    sqlx::query_as::<_, FileMetadataRow>(
        r#"
        SELECT
            id, name, original_name, content_type, size_bytes, upload_type,
            created_at, expires_at
        FROM shared_files
        WHERE expires_at > $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(now)
    .fetch_all(executor)
    .await
}
