use std::sync::Arc;

use axum::Router;

use crate::error::ServiceError;
use crate::pagination::PageLimits;
use crate::recruitment::{recruitment_router, RecruitmentUserService};
use crate::store::{Transaction, UnitOfWork};
use crate::users::{user_router, UserService};

/// Services plus the store they run against, shared by the HTTP handlers.
pub struct ServiceContext<U> {
    pub store: Arc<U>,
    pub recruitment: RecruitmentUserService,
    pub users: UserService,
}

impl<U> ServiceContext<U>
where
    U: UnitOfWork,
{
    pub fn new(store: Arc<U>, limits: PageLimits) -> Self {
        Self {
            store,
            recruitment: RecruitmentUserService::new(limits),
            users: UserService::new(),
        }
    }

    /// Run `f` in a fresh transaction and commit it when `f` succeeds.
    pub fn in_transaction<R>(
        &self,
        f: impl FnOnce(&mut U::Tx) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        let mut tx = self.store.begin()?;
        let value = f(&mut tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Run a read-only `f`; the transaction is dropped without committing.
    pub fn read<R>(
        &self,
        f: impl FnOnce(&U::Tx) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        let tx = self.store.begin()?;
        f(&tx)
    }
}

/// Every recruitment and user endpoint behind one router.
pub fn api_router<U>(context: Arc<ServiceContext<U>>) -> Router
where
    U: UnitOfWork + 'static,
{
    recruitment_router(context.clone()).merge(user_router(context))
}
