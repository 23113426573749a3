pub mod application_service;
pub mod authorization;
pub mod directory;
pub mod notification_service;
pub mod transition;
pub mod visibility;
