use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{RecruitmentPost, RecruitmentUser, RecruitmentUserPosts, RecruitmentUserStatus};
use crate::context::ServiceContext;
use crate::error::{ErrorCode, ServiceError};
use crate::ids::{PostId, UserId};
use crate::pagination::PageRequest;
use crate::principal::Principal;
use crate::store::UnitOfWork;

/// Router builder exposing the application workflow.
pub fn recruitment_router<U>(context: Arc<ServiceContext<U>>) -> Router
where
    U: UnitOfWork + 'static,
{
    Router::new()
        .route(
            "/api/v1/recruitment/posts/:post_id/applications",
            post(apply_handler::<U>).delete(cancel_handler::<U>),
        )
        .route(
            "/api/v1/recruitment/posts/:post_id/applications/:user_id",
            put(review_handler::<U>),
        )
        .route(
            "/api/v1/recruitment/posts/:post_id/close",
            post(close_handler::<U>),
        )
        .route(
            "/api/v1/recruitment/applications",
            get(list_handler::<U>),
        )
        .with_state(context)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationsQuery {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    page_num: Option<u32>,
    #[serde(default)]
    page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    status: String,
}

pub(crate) async fn apply_handler<U>(
    State(context): State<Arc<ServiceContext<U>>>,
    principal: Principal,
    Path(post_id): Path<u64>,
) -> Result<(StatusCode, Json<RecruitmentUser>), ServiceError>
where
    U: UnitOfWork + 'static,
{
    let application = context.in_transaction(|tx| {
        context
            .recruitment
            .save_recruitment(tx, &principal, PostId(post_id))
    })?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub(crate) async fn cancel_handler<U>(
    State(context): State<Arc<ServiceContext<U>>>,
    principal: Principal,
    Path(post_id): Path<u64>,
) -> Result<StatusCode, ServiceError>
where
    U: UnitOfWork + 'static,
{
    context.in_transaction(|tx| {
        context
            .recruitment
            .cancel_recruitment(tx, &principal, PostId(post_id))
    })?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn review_handler<U>(
    State(context): State<Arc<ServiceContext<U>>>,
    principal: Principal,
    Path((post_id, user_id)): Path<(u64, u64)>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<RecruitmentUser>, ServiceError>
where
    U: UnitOfWork + 'static,
{
    let decision = RecruitmentUserStatus::parse(&request.status)
        .ok_or(ErrorCode::RecruitmentStatusNotSupport)?;
    let application = context.in_transaction(|tx| {
        context.recruitment.review_application(
            tx,
            &principal,
            PostId(post_id),
            UserId(user_id),
            decision,
        )
    })?;
    Ok(Json(application))
}

pub(crate) async fn close_handler<U>(
    State(context): State<Arc<ServiceContext<U>>>,
    principal: Principal,
    Path(post_id): Path<u64>,
) -> Result<Json<RecruitmentPost>, ServiceError>
where
    U: UnitOfWork + 'static,
{
    let post = context.in_transaction(|tx| {
        context
            .recruitment
            .close_recruitment(tx, &principal, PostId(post_id))
    })?;
    Ok(Json(post))
}

pub(crate) async fn list_handler<U>(
    State(context): State<Arc<ServiceContext<U>>>,
    principal: Principal,
    Query(query): Query<ApplicationsQuery>,
) -> Result<Json<RecruitmentUserPosts>, ServiceError>
where
    U: UnitOfWork + 'static,
{
    let page =
        PageRequest::with_defaults(query.page_num, query.page_size, context.recruitment.limits());
    let status = query
        .status
        .unwrap_or_else(|| RecruitmentUserStatus::Accepted.label().to_string());
    let posts = context.read(|tx| {
        context
            .recruitment
            .get_accepted_posts(tx, &principal, &status, page)
    })?;
    Ok(Json(posts))
}
