//! Volunteer-application business logic service.

use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::api::common::{
    PagedRequest, PagedResponse, SortKey, paginate, search_filter, validation_errors_to_message,
};
use crate::database::models::{CreateVolunteerApplication, VolunteerApplication};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::volunteer_repository::VolunteerApplicationRepository;

pub struct VolunteerApplicationService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> VolunteerApplicationService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Stores a volunteer application. One application per email, checked at
    /// write time; the creation timestamp is stamped here, not by the caller.
    pub async fn create_application(
        &self,
        request: CreateVolunteerApplication,
    ) -> ServiceResult<VolunteerApplication> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::validation(validation_errors_to_message(
                &errors,
            )));
        }

        let repo = VolunteerApplicationRepository::new(self.pool);
        if repo.get_by_email(&request.email).await?.is_some() {
            tracing::warn!(
                "Duplicate volunteer application attempted for {}",
                request.email
            );
            return Err(ServiceError::already_exists(
                "Volunteer application",
                &request.email,
            ));
        }

        let application = VolunteerApplication {
            id: uuid::Uuid::now_v7().to_string(),
            full_name: request.full_name,
            email: request.email,
            phone_number: request.phone_number,
            city: request.city,
            country: request.country,
            has_volunteering_experience: request.has_volunteering_experience,
            areas_of_interest: request.areas_of_interest,
            other_areas: request.other_areas,
            available_time: request.available_time,
            skills_or_knowledge: request.skills_or_knowledge,
            why_volunteer: request.why_volunteer,
            additional_comments: request.additional_comments,
            created_at: Utc::now(),
        };
        repo.create(&application).await?;

        tracing::info!("Volunteer application stored for {}", application.email);
        Ok(application)
    }

    /// Lists applications through the paged-query engine; the free-text
    /// search matches full name, email and city.
    pub async fn list_applications(
        &self,
        request: &PagedRequest,
    ) -> ServiceResult<PagedResponse<VolunteerApplication>> {
        let applications = VolunteerApplicationRepository::new(self.pool)
            .get_all()
            .await?;

        let sort_key: Option<SortKey<'_, VolunteerApplication>> =
            match request.sort_by.as_deref() {
                Some("email") => Some(Box::new(|app| app.email.clone())),
                Some("city") => Some(Box::new(|app| app.city.clone())),
                Some("createdAt") => Some(Box::new(|app| app.created_at.to_rfc3339())),
                Some(_) => Some(Box::new(|app| app.full_name.clone())),
                None => None,
            };

        Ok(paginate(
            applications,
            request,
            search_filter(request),
            sort_key,
            request.ascending(),
        ))
    }

    /// Case-insensitive lookup; a blank email short-circuits to `None`.
    pub async fn get_by_email(&self, email: &str) -> ServiceResult<Option<VolunteerApplication>> {
        if email.trim().is_empty() {
            return Ok(None);
        }
        Ok(VolunteerApplicationRepository::new(self.pool)
            .get_by_email(email)
            .await?)
    }
}
