//! Business-logic services for the persistence-glue entities.

pub mod area_service;
pub mod community_service;
pub mod volunteer_service;
