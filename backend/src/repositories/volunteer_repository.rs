//! Database repository for volunteer applications.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::database::models::VolunteerApplication;

/// Repository for volunteer-application database operations.
pub struct VolunteerApplicationRepository<'a> {
    pool: &'a SqlitePool,
}

#[derive(sqlx::FromRow)]
struct VolunteerApplicationRow {
    id: String,
    full_name: String,
    email: String,
    phone_number: String,
    city: String,
    country: String,
    has_volunteering_experience: bool,
    areas_of_interest: String,
    other_areas: String,
    available_time: String,
    skills_or_knowledge: String,
    why_volunteer: String,
    additional_comments: String,
    created_at: DateTime<Utc>,
}

impl VolunteerApplicationRow {
    fn into_application(self) -> Result<VolunteerApplication> {
        let areas_of_interest: Vec<String> = serde_json::from_str(&self.areas_of_interest)
            .context("corrupt areas-of-interest list")?;

        Ok(VolunteerApplication {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            phone_number: self.phone_number,
            city: self.city,
            country: self.country,
            has_volunteering_experience: self.has_volunteering_experience,
            areas_of_interest,
            other_areas: self.other_areas,
            available_time: self.available_time,
            skills_or_knowledge: self.skills_or_knowledge,
            why_volunteer: self.why_volunteer,
            additional_comments: self.additional_comments,
            created_at: self.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, full_name, email, phone_number, city, country,
           has_volunteering_experience, areas_of_interest, other_areas,
           available_time, skills_or_knowledge, why_volunteer,
           additional_comments, created_at
    FROM volunteer_applications
"#;

impl<'a> VolunteerApplicationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, application: &VolunteerApplication) -> Result<()> {
        let areas_of_interest = serde_json::to_string(&application.areas_of_interest)
            .context("failed to serialize areas-of-interest list")?;

        sqlx::query(
            r#"
            INSERT INTO volunteer_applications
                (id, full_name, email, phone_number, city, country,
                 has_volunteering_experience, areas_of_interest, other_areas,
                 available_time, skills_or_knowledge, why_volunteer,
                 additional_comments, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.id)
        .bind(&application.full_name)
        .bind(&application.email)
        .bind(&application.phone_number)
        .bind(&application.city)
        .bind(&application.country)
        .bind(application.has_volunteering_experience)
        .bind(areas_of_interest)
        .bind(&application.other_areas)
        .bind(&application.available_time)
        .bind(&application.skills_or_knowledge)
        .bind(&application.why_volunteer)
        .bind(&application.additional_comments)
        .bind(application.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_all(&self) -> Result<Vec<VolunteerApplication>> {
        let rows = sqlx::query_as::<_, VolunteerApplicationRow>(&format!(
            "{} ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(VolunteerApplicationRow::into_application)
            .collect()
    }

    /// Case-insensitive lookup by applicant email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<VolunteerApplication>> {
        let row = sqlx::query_as::<_, VolunteerApplicationRow>(&format!(
            "{} WHERE lower(email) = lower(?)",
            SELECT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(VolunteerApplicationRow::into_application).transpose()
    }
}
