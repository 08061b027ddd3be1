//! Site user profiles with owner-only access.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{JobSkill, JobSkillRequest, ProfileUpdate, SiteUser, UserModifyProfileRequest};
pub use router::user_router;
pub use service::UserService;
