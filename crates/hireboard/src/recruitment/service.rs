use chrono::Utc;
use tracing::{debug, info};

use super::domain::{RecruitmentPost, RecruitmentUser, RecruitmentUserPosts, RecruitmentUserStatus};
use crate::error::{ErrorCode, ServiceError};
use crate::ids::{PostId, UserId};
use crate::pagination::{PageLimits, PageRequest};
use crate::principal::Principal;
use crate::store::{NewApplication, PostRepository, RecruitmentUserRepository};

/// Application and cancellation workflow plus status scoped listing.
///
/// Every operation runs against the caller's open transaction; nothing is persisted until the
/// caller commits it.
#[derive(Debug, Clone, Default)]
pub struct RecruitmentUserService {
    limits: PageLimits,
}

impl RecruitmentUserService {
    pub fn new(limits: PageLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &PageLimits {
        &self.limits
    }

    /// Apply to a recruitment post.
    pub fn save_recruitment<T>(
        &self,
        tx: &mut T,
        user: &Principal,
        post_id: PostId,
    ) -> Result<RecruitmentUser, ServiceError>
    where
        T: PostRepository + RecruitmentUserRepository,
    {
        let post = get_post(tx, post_id)?;
        check_recruitment_condition(tx, user, &post)?;

        let application = tx.save(NewApplication {
            post_id: post.post_id,
            user_id: user.id,
            status: RecruitmentUserStatus::Applied,
            applied_at: Utc::now(),
        })?;

        info!(
            post_id = post_id.0,
            user_id = user.id.0,
            application_id = application.id.0,
            "recruitment application staged"
        );
        Ok(application)
    }

    /// Withdraw the requester's application while the post is still open.
    pub fn cancel_recruitment<T>(
        &self,
        tx: &mut T,
        user: &Principal,
        post_id: PostId,
    ) -> Result<(), ServiceError>
    where
        T: PostRepository + RecruitmentUserRepository,
    {
        let post = get_post(tx, post_id)?;
        validate_recruitment_not_closed(&post)?;

        let application = get_recruitment_user(tx, user.id, post_id)?;
        tx.delete(&application)?;

        info!(
            post_id = post_id.0,
            user_id = user.id.0,
            application_id = application.id.0,
            "recruitment application cancelled"
        );
        Ok(())
    }

    /// Posts on which the requester holds an application in `status`.
    pub fn get_accepted_posts<T>(
        &self,
        tx: &T,
        user: &Principal,
        status: &str,
        page: PageRequest,
    ) -> Result<RecruitmentUserPosts, ServiceError>
    where
        T: PostRepository,
    {
        let status =
            RecruitmentUserStatus::parse(status).ok_or(ErrorCode::RecruitmentStatusNotSupport)?;
        page.validate(&self.limits)?;

        let posts = tx.find_recruitment_all(user.id, status, &page)?;
        debug!(
            user_id = user.id.0,
            status = status.label(),
            total = posts.total_elements,
            "listed recruitment posts"
        );
        Ok(RecruitmentUserPosts { status, posts })
    }

    /// Accept or reject an applicant; only the post author may decide.
    pub fn review_application<T>(
        &self,
        tx: &mut T,
        author: &Principal,
        post_id: PostId,
        applicant_id: UserId,
        decision: RecruitmentUserStatus,
    ) -> Result<RecruitmentUser, ServiceError>
    where
        T: PostRepository + RecruitmentUserRepository,
    {
        let post = get_post(tx, post_id)?;
        validate_author(&post, author)?;
        validate_recruitment_not_closed(&post)?;

        let application = get_recruitment_user(tx, applicant_id, post_id)?;
        let decided = application
            .decide(decision)
            .map_err(|_| ErrorCode::InvalidStatusTransition)?;
        tx.update_status(decided.id, decided.status)?;

        info!(
            post_id = post_id.0,
            applicant_id = applicant_id.0,
            status = decided.status.label(),
            "recruitment application reviewed"
        );
        Ok(decided)
    }

    /// Close the post to further applications, cancellations, and reviews.
    pub fn close_recruitment<T>(
        &self,
        tx: &mut T,
        author: &Principal,
        post_id: PostId,
    ) -> Result<RecruitmentPost, ServiceError>
    where
        T: PostRepository,
    {
        let post = get_post(tx, post_id)?;
        validate_author(&post, author)?;

        let closed = post.closed().map_err(|_| ErrorCode::RecruitmentClosed)?;
        tx.update_post_status(closed.post_id, closed.recruitment_status)?;

        info!(post_id = post_id.0, "recruitment closed");
        Ok(closed)
    }
}

fn check_recruitment_condition<T>(
    tx: &T,
    user: &Principal,
    post: &RecruitmentPost,
) -> Result<(), ServiceError>
where
    T: RecruitmentUserRepository,
{
    if is_already_applied(tx, user.id, post.post_id)? {
        return Err(ErrorCode::AlreadyRecruitment.into());
    }

    validate_recruitment_not_closed(post)
}

fn is_already_applied<T>(tx: &T, user_id: UserId, post_id: PostId) -> Result<bool, ServiceError>
where
    T: RecruitmentUserRepository,
{
    Ok(tx.find_by_post_and_user(post_id, user_id)?.is_some())
}

fn validate_recruitment_not_closed(post: &RecruitmentPost) -> Result<(), ServiceError> {
    if post.is_closed() {
        return Err(ErrorCode::RecruitmentClosed.into());
    }
    Ok(())
}

fn validate_author(post: &RecruitmentPost, requester: &Principal) -> Result<(), ServiceError> {
    if !post.is_authored_by(requester.id) {
        return Err(ErrorCode::UnauthorizedUser.into());
    }
    Ok(())
}

fn get_recruitment_user<T>(
    tx: &T,
    user_id: UserId,
    post_id: PostId,
) -> Result<RecruitmentUser, ServiceError>
where
    T: RecruitmentUserRepository,
{
    tx.find_by_post_and_user(post_id, user_id)?
        .ok_or_else(|| ErrorCode::RecruitmentNotFound.into())
}

fn get_post<T>(tx: &T, post_id: PostId) -> Result<RecruitmentPost, ServiceError>
where
    T: PostRepository,
{
    tx.find_by_id_fetch(post_id)?
        .ok_or_else(|| ErrorCode::PostNotFound.into())
}
