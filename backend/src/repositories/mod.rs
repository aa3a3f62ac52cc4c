//! Database repositories for all persistent entities.

pub mod account_repository;
pub mod area_repository;
pub mod community_repository;
pub mod volunteer_repository;
