//! # squad-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    AccessService, AdminService, ChatService, GameProfileService, GameService,
    NotificationService, OrderService, ProfileService, ReviewService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult,
};
