//! Database repository for community members.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::models::CommunityMember;

/// Repository for community-member database operations.
pub struct CommunityMemberRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommunityMemberRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, member: &CommunityMember) -> Result<()> {
        sqlx::query("INSERT INTO community_members (id, full_name, email) VALUES (?, ?, ?)")
            .bind(&member.id)
            .bind(&member.full_name)
            .bind(&member.email)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_all(&self) -> Result<Vec<CommunityMember>> {
        let members = sqlx::query_as::<_, CommunityMember>(
            "SELECT id, full_name, email FROM community_members ORDER BY full_name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(members)
    }

    /// Checks if a member with this email already exists (case-insensitive).
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM community_members WHERE lower(email) = lower(?)",
        )
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }
}
