pub mod auth_service;
pub mod esewa;
pub mod notification_service;
pub mod registration_service;
