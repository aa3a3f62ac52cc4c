//! Area-of-interest business logic service.

use sqlx::SqlitePool;
use validator::Validate;

use crate::api::common::{
    PagedRequest, PagedResponse, SortKey, paginate, search_filter, validation_errors_to_message,
};
use crate::database::models::{AreaOfInterest, CreateAreaOfInterest};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::area_repository::AreaOfInterestRepository;

pub struct AreaOfInterestService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AreaOfInterestService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new area of interest. Area names are unique, checked at
    /// write time.
    pub async fn create_area(&self, request: CreateAreaOfInterest) -> ServiceResult<AreaOfInterest> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::validation(validation_errors_to_message(
                &errors,
            )));
        }

        let repo = AreaOfInterestRepository::new(self.pool);
        if repo.name_exists(&request.name).await? {
            return Err(ServiceError::already_exists("Area of interest", &request.name));
        }

        let area = AreaOfInterest {
            id: uuid::Uuid::now_v7().to_string(),
            name: request.name,
            description: request.description,
        };
        repo.create(&area).await?;

        Ok(area)
    }

    /// Lists areas through the paged-query engine. Store failures propagate
    /// to the boundary; there is no silent empty page.
    pub async fn list_areas(
        &self,
        request: &PagedRequest,
    ) -> ServiceResult<PagedResponse<AreaOfInterest>> {
        let areas = AreaOfInterestRepository::new(self.pool).get_all().await?;

        let sort_key: Option<SortKey<'_, AreaOfInterest>> =
            match request.sort_by.as_deref() {
                Some("description") => Some(Box::new(|area| area.description.clone())),
                Some(_) => Some(Box::new(|area| area.name.clone())),
                None => None,
            };

        Ok(paginate(
            areas,
            request,
            search_filter(request),
            sort_key,
            request.ascending(),
        ))
    }
}
