//! Community-member business logic service.

use sqlx::SqlitePool;
use validator::Validate;

use crate::api::common::{
    PagedRequest, PagedResponse, SortKey, paginate, search_filter, validation_errors_to_message,
};
use crate::database::models::{CommunityMember, CreateCommunityMember};
use crate::errors::{ServiceError, ServiceResult};
use crate::repositories::community_repository::CommunityMemberRepository;

pub struct CommunityService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CommunityService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Registers a community member. One member per email, checked at write
    /// time.
    pub async fn create_member(
        &self,
        request: CreateCommunityMember,
    ) -> ServiceResult<CommunityMember> {
        if let Err(errors) = request.validate() {
            return Err(ServiceError::validation(validation_errors_to_message(
                &errors,
            )));
        }

        let repo = CommunityMemberRepository::new(self.pool);
        if repo.email_exists(&request.email).await? {
            return Err(ServiceError::already_exists(
                "Community member",
                &request.email,
            ));
        }

        let member = CommunityMember {
            id: uuid::Uuid::now_v7().to_string(),
            full_name: request.full_name,
            email: request.email.to_lowercase(),
        };
        repo.create(&member).await?;

        Ok(member)
    }

    /// Lists members through the paged-query engine.
    pub async fn list_members(
        &self,
        request: &PagedRequest,
    ) -> ServiceResult<PagedResponse<CommunityMember>> {
        let members = CommunityMemberRepository::new(self.pool).get_all().await?;

        let sort_key: Option<SortKey<'_, CommunityMember>> =
            match request.sort_by.as_deref() {
                Some("email") => Some(Box::new(|member| member.email.clone())),
                Some(_) => Some(Box::new(|member| member.full_name.clone())),
                None => None,
            };

        Ok(paginate(
            members,
            request,
            search_filter(request),
            sort_key,
            request.ascending(),
        ))
    }
}
