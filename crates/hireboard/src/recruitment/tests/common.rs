use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::context::ServiceContext;
use crate::ids::{ApplicationId, CategoryId, JobPostingId, JobSkillId, PostId, UserId};
use crate::pagination::PageLimits;
use crate::recruitment::domain::{
    RecruitmentPost, RecruitmentStatus, RecruitmentUser, RecruitmentUserStatus,
};
use crate::recruitment::RecruitmentUserService;
use crate::store::{Fixture, MemoryStore};
use crate::users::domain::{JobSkill, SiteUser};

pub(super) const APPLICANT: u64 = 1;
pub(super) const OTHER_APPLICANT: u64 = 2;
pub(super) const AUTHOR: u64 = 7;
pub(super) const OPEN_POST: u64 = 10;
pub(super) const CLOSED_POST: u64 = 20;
pub(super) const SECOND_OPEN_POST: u64 = 30;

pub(super) fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn post(id: u64, status: RecruitmentStatus) -> RecruitmentPost {
    RecruitmentPost {
        post_id: PostId(id),
        subject: format!("Side project team #{id}"),
        content: "Looking for two backend developers".to_string(),
        category_id: CategoryId(3),
        author_id: UserId(AUTHOR),
        recruitment_closing_date: at(30),
        num_of_applicants: Some(2),
        recruitment_status: status,
        job_posting_id: Some(JobPostingId(500)),
        created_at: at(1),
    }
}

pub(super) fn user(id: u64) -> SiteUser {
    SiteUser {
        id: UserId(id),
        name: format!("user{id}"),
        email: format!("user{id}@example.com"),
        introduction: None,
        job: None,
        job_skills: Vec::new(),
    }
}

pub(super) fn fixture() -> Fixture {
    Fixture {
        skills: vec![JobSkill {
            id: JobSkillId(1),
            name: "Rust".to_string(),
        }],
        users: vec![user(APPLICANT), user(OTHER_APPLICANT), user(AUTHOR)],
        posts: vec![
            post(OPEN_POST, RecruitmentStatus::Open),
            post(CLOSED_POST, RecruitmentStatus::Closed),
            post(SECOND_OPEN_POST, RecruitmentStatus::Open),
        ],
        applications: vec![RecruitmentUser {
            id: ApplicationId(100),
            post_id: PostId(CLOSED_POST),
            user_id: UserId(APPLICANT),
            status: RecruitmentUserStatus::Accepted,
            applied_at: at(2),
        }],
    }
}

pub(super) fn build_store() -> MemoryStore {
    MemoryStore::from_fixture(fixture()).expect("fixture loads")
}

pub(super) fn build_service() -> (RecruitmentUserService, MemoryStore) {
    (
        RecruitmentUserService::new(PageLimits::default()),
        build_store(),
    )
}

pub(super) fn build_context() -> (Arc<ServiceContext<MemoryStore>>, MemoryStore) {
    let store = build_store();
    let context = Arc::new(ServiceContext::new(
        Arc::new(store.clone()),
        PageLimits::default(),
    ));
    (context, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
