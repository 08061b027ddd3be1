//! Repository contracts and the explicit unit of work the services run inside.
//!
//! Reads return owned snapshots. Writes are staged as [`WriteCommand`]s on the open
//! transaction and only reach storage when the caller commits it; dropping a transaction
//! discards everything it staged.

pub mod memory;

use chrono::{DateTime, Utc};
use crate::ids::{ApplicationId, PostId, UserId};
use crate::pagination::{Page, PageRequest};
use crate::recruitment::domain::{
    PostSummary, RecruitmentPost, RecruitmentStatus, RecruitmentUser, RecruitmentUserStatus,
};
use crate::users::domain::{JobSkill, ProfileUpdate, SiteUser};

pub use memory::{Fixture, FixtureError, MemoryStore, MemoryTransaction};

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("application not found")]
    ApplicationNotFound,
    #[error("recruitment is closed")]
    Closed,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub trait PostRepository {
    fn find_by_id(&self, id: PostId) -> Result<Option<RecruitmentPost>, RepositoryError>;

    /// Load a post with its author, category, and job posting references resolved.
    fn find_by_id_fetch(&self, id: PostId) -> Result<Option<RecruitmentPost>, RepositoryError> {
        self.find_by_id(id)
    }

    fn find_all(&self) -> Result<Vec<RecruitmentPost>, RepositoryError>;

    /// Posts on which `user_id` holds an application in `status`, newest post first.
    fn find_recruitment_all(
        &self,
        user_id: UserId,
        status: RecruitmentUserStatus,
        page: &PageRequest,
    ) -> Result<Page<PostSummary>, RepositoryError>;

    fn update_post_status(
        &mut self,
        post_id: PostId,
        status: RecruitmentStatus,
    ) -> Result<(), RepositoryError>;
}

pub trait RecruitmentUserRepository {
    fn find_by_post_and_user(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<Option<RecruitmentUser>, RepositoryError>;

    fn save(&mut self, application: NewApplication) -> Result<RecruitmentUser, RepositoryError>;

    fn delete(&mut self, application: &RecruitmentUser) -> Result<(), RepositoryError>;

    fn update_status(
        &mut self,
        id: ApplicationId,
        status: RecruitmentUserStatus,
    ) -> Result<(), RepositoryError>;
}

pub trait UserRepository {
    fn find_user(&self, id: UserId) -> Result<Option<SiteUser>, RepositoryError>;

    fn update_profile(&mut self, update: ProfileUpdate) -> Result<(), RepositoryError>;
}

pub trait JobSkillRepository {
    fn find_by_name(&self, name: &str) -> Result<Option<JobSkill>, RepositoryError>;
}

/// Application row before storage assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewApplication {
    pub post_id: PostId,
    pub user_id: UserId,
    pub status: RecruitmentUserStatus,
    pub applied_at: DateTime<Utc>,
}

/// Explicit update staged by a transaction and applied on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCommand {
    InsertApplication(RecruitmentUser),
    DeleteApplication(ApplicationId),
    UpdateApplicationStatus {
        id: ApplicationId,
        status: RecruitmentUserStatus,
    },
    UpdatePostStatus {
        post_id: PostId,
        status: RecruitmentStatus,
    },
    UpdateProfile(ProfileUpdate),
}

/// Opens the transaction each service call runs inside.
pub trait UnitOfWork: Send + Sync {
    type Tx: Transaction;

    fn begin(&self) -> Result<Self::Tx, RepositoryError>;
}

pub trait Transaction:
    PostRepository + RecruitmentUserRepository + UserRepository + JobSkillRepository
{
    fn staged(&self) -> &[WriteCommand];

    /// Apply every staged command atomically, or none of them.
    fn commit(self) -> Result<(), RepositoryError>
    where
        Self: Sized;
}
