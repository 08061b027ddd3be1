//! Recruitment posts and the application workflow around them.
//!
//! A user applies to an open post (status APPLIED), may cancel while the post stays open, and
//! the post author accepts or rejects applicants until the post is closed.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    PostSummary, RecruitmentPost, RecruitmentStatus, RecruitmentUser, RecruitmentUserPosts,
    RecruitmentUserStatus, StatusTransitionError,
};
pub use router::recruitment_router;
pub use service::RecruitmentUserService;
