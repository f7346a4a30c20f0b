use super::podcast_repository::PodcastRepository;
use crate::domain::podcast::{PodcastError, PodcastRecord};
use crate::infrastructure::db::{check_connection, DbPool};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct PgPodcastRepository {
    pool: Arc<DbPool>,
}

impl PgPodcastRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

fn persistence(err: sqlx::Error) -> PodcastError {
    tracing::error!(error = %err, "Podcast query failed");
    PodcastError::Persistence(err.to_string())
}

#[async_trait]
impl PodcastRepository for PgPodcastRepository {
    async fn create(&self, topic: &str, script: &str) -> Result<PodcastRecord, PodcastError> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let record = sqlx::query_as::<_, PodcastRecord>(
            r#"
            INSERT INTO podcasts (id, topic, script, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, topic, script, summary, audio_location, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(topic)
        .bind(script)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(persistence)?;

        Ok(record)
    }

    async fn update_summary(&self, id: Uuid, summary: &str) -> Result<(), PodcastError> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE podcasts
            SET summary = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(summary)
        .bind(id)
        .execute(pool)
        .await
        .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(PodcastError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn update_audio_location(&self, id: Uuid, location: &str) -> Result<(), PodcastError> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE podcasts
            SET audio_location = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(location)
        .bind(id)
        .execute(pool)
        .await
        .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(PodcastError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, limit: i64) -> Result<Vec<PodcastRecord>, PodcastError> {
        let pool = self.pool.as_ref();
        let records = sqlx::query_as::<_, PodcastRecord>(
            r#"
            SELECT id, topic, script, summary, audio_location, created_at, updated_at
            FROM podcasts
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(persistence)?;

        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<PodcastRecord, PodcastError> {
        let pool = self.pool.as_ref();
        sqlx::query_as::<_, PodcastRecord>(
            r#"
            SELECT id, topic, script, summary, audio_location, created_at, updated_at
            FROM podcasts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(persistence)?
        .ok_or_else(|| PodcastError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), PodcastError> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            DELETE FROM podcasts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await
        .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(PodcastError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn check_connection(&self) -> Result<(), PodcastError> {
        check_connection(&self.pool).await.map(|_| ()).map_err(persistence)
    }
}
