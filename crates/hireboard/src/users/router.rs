use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::domain::{SiteUser, UserModifyProfileRequest};
use crate::context::ServiceContext;
use crate::error::ServiceError;
use crate::ids::UserId;
use crate::principal::Principal;
use crate::store::UnitOfWork;

pub fn user_router<U>(context: Arc<ServiceContext<U>>) -> Router
where
    U: UnitOfWork + 'static,
{
    Router::new()
        .route(
            "/api/v1/users/:id",
            get(get_handler::<U>).patch(modify_handler::<U>),
        )
        .with_state(context)
}

pub(crate) async fn get_handler<U>(
    State(context): State<Arc<ServiceContext<U>>>,
    principal: Principal,
    Path(id): Path<u64>,
) -> Result<Json<SiteUser>, ServiceError>
where
    U: UnitOfWork + 'static,
{
    let user = context.read(|tx| context.users.get_user(tx, UserId(id), &principal))?;
    Ok(Json(user))
}

pub(crate) async fn modify_handler<U>(
    State(context): State<Arc<ServiceContext<U>>>,
    principal: Principal,
    Path(id): Path<u64>,
    Json(request): Json<UserModifyProfileRequest>,
) -> Result<Json<SiteUser>, ServiceError>
where
    U: UnitOfWork + 'static,
{
    let user = context.in_transaction(|tx| {
        context
            .users
            .modify_user(tx, UserId(id), &principal, request)
    })?;
    Ok(Json(user))
}
