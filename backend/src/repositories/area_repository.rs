//! Database repository for areas of interest.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::models::AreaOfInterest;

/// Repository for area-of-interest database operations.
pub struct AreaOfInterestRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AreaOfInterestRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, area: &AreaOfInterest) -> Result<()> {
        sqlx::query("INSERT INTO areas_of_interest (id, name, description) VALUES (?, ?, ?)")
            .bind(&area.id)
            .bind(&area.name)
            .bind(&area.description)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_all(&self) -> Result<Vec<AreaOfInterest>> {
        let areas = sqlx::query_as::<_, AreaOfInterest>(
            "SELECT id, name, description FROM areas_of_interest ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(areas)
    }

    /// Checks if an area with this name already exists (case-insensitive).
    pub async fn name_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM areas_of_interest WHERE lower(name) = lower(?)",
        )
        .bind(name)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }
}
