use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    JobSkillRepository, NewApplication, PostRepository, RecruitmentUserRepository,
    RepositoryError, Transaction, UnitOfWork, UserRepository, WriteCommand,
};
use crate::ids::{ApplicationId, JobSkillId, PostId, UserId};
use crate::pagination::{Page, PageRequest};
use crate::recruitment::domain::{
    PostSummary, RecruitmentPost, RecruitmentStatus, RecruitmentUser, RecruitmentUserStatus,
};
use crate::users::domain::{JobSkill, ProfileUpdate, SiteUser};

/// Seed data used to hydrate a [`MemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub skills: Vec<JobSkill>,
    #[serde(default)]
    pub users: Vec<SiteUser>,
    #[serde(default)]
    pub posts: Vec<RecruitmentPost>,
    #[serde(default)]
    pub applications: Vec<RecruitmentUser>,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    posts: BTreeMap<PostId, RecruitmentPost>,
    users: BTreeMap<UserId, SiteUser>,
    skills: BTreeMap<JobSkillId, JobSkill>,
    applications: BTreeMap<ApplicationId, RecruitmentUser>,
}

impl StoreState {
    fn application_for(&self, post_id: PostId, user_id: UserId) -> Option<&RecruitmentUser> {
        self.applications
            .values()
            .find(|application| application.post_id == post_id && application.user_id == user_id)
    }

    fn ensure_open(&self, post_id: PostId) -> Result<(), RepositoryError> {
        match self.posts.get(&post_id) {
            None => Err(RepositoryError::NotFound),
            Some(post) if post.is_closed() => Err(RepositoryError::Closed),
            Some(_) => Ok(()),
        }
    }

    fn insert(&mut self, application: &RecruitmentUser) -> Result<(), RepositoryError> {
        if !self.posts.contains_key(&application.post_id) {
            return Err(RepositoryError::NotFound);
        }
        // (post, user) is unique even when two callers passed the existence check.
        if self.applications.contains_key(&application.id)
            || self
                .application_for(application.post_id, application.user_id)
                .is_some()
        {
            return Err(RepositoryError::Conflict);
        }
        self.applications.insert(application.id, application.clone());
        Ok(())
    }

    fn owning_post(&self, id: ApplicationId) -> Result<PostId, RepositoryError> {
        self.applications
            .get(&id)
            .map(|application| application.post_id)
            .ok_or(RepositoryError::ApplicationNotFound)
    }

    fn apply(&mut self, command: &WriteCommand) -> Result<(), RepositoryError> {
        match command {
            WriteCommand::InsertApplication(application) => {
                self.ensure_open(application.post_id)?;
                self.insert(application)?;
            }
            WriteCommand::DeleteApplication(id) => {
                self.ensure_open(self.owning_post(*id)?)?;
                self.applications.remove(id);
            }
            WriteCommand::UpdateApplicationStatus { id, status } => {
                self.ensure_open(self.owning_post(*id)?)?;
                if let Some(application) = self.applications.get_mut(id) {
                    application.status = *status;
                }
            }
            WriteCommand::UpdatePostStatus { post_id, status } => {
                let post = self
                    .posts
                    .get_mut(post_id)
                    .ok_or(RepositoryError::NotFound)?;
                post.recruitment_status = *status;
            }
            WriteCommand::UpdateProfile(update) => {
                let user = self
                    .users
                    .get_mut(&update.user_id)
                    .ok_or(RepositoryError::NotFound)?;
                *user = user.with_profile(update);
            }
        }
        Ok(())
    }
}

/// Mutex-guarded store backing local runs and tests.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
    sequence: Arc<AtomicU64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            sequence: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl MemoryStore {
    pub fn from_fixture(fixture: Fixture) -> Result<Self, RepositoryError> {
        let mut state = StoreState::default();
        state.skills = fixture
            .skills
            .into_iter()
            .map(|skill| (skill.id, skill))
            .collect();
        state.users = fixture
            .users
            .into_iter()
            .map(|user| (user.id, user))
            .collect();
        state.posts = fixture
            .posts
            .into_iter()
            .map(|post| (post.post_id, post))
            .collect();
        // Seeded history may sit on posts that are already closed.
        for application in &fixture.applications {
            state.insert(application)?;
        }

        let next_id = state
            .applications
            .keys()
            .next_back()
            .map_or(1, |id| id.0 + 1);

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            sequence: Arc::new(AtomicU64::new(next_id)),
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, FixtureError> {
        let fixture: Fixture = serde_json::from_str(raw)?;
        Ok(Self::from_fixture(fixture)?)
    }

    /// Committed application count, used by health output and tests.
    pub fn application_count(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.state)?.applications.len())
    }
}

/// Failure while loading a JSON fixture.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("malformed fixture: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("inconsistent fixture: {0}")]
    Invalid(#[from] RepositoryError),
}

fn lock(state: &Mutex<StoreState>) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
    state
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store lock poisoned".to_string()))
}

impl UnitOfWork for MemoryStore {
    type Tx = MemoryTransaction;

    fn begin(&self) -> Result<Self::Tx, RepositoryError> {
        Ok(MemoryTransaction {
            state: self.state.clone(),
            sequence: self.sequence.clone(),
            staged: Vec::new(),
        })
    }
}

/// Transaction over a [`MemoryStore`]; reads see committed state plus its own staged writes.
#[derive(Debug)]
pub struct MemoryTransaction {
    state: Arc<Mutex<StoreState>>,
    sequence: Arc<AtomicU64>,
    staged: Vec<WriteCommand>,
}

impl MemoryTransaction {
    fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> Result<T, RepositoryError> {
        let guard = lock(&self.state)?;
        if self.staged.is_empty() {
            return Ok(f(&*guard));
        }

        let mut view = guard.clone();
        drop(guard);
        for command in &self.staged {
            view.apply(command)?;
        }
        Ok(f(&view))
    }
}

impl PostRepository for MemoryTransaction {
    fn find_by_id(&self, id: PostId) -> Result<Option<RecruitmentPost>, RepositoryError> {
        self.read(|state| state.posts.get(&id).cloned())
    }

    fn find_all(&self) -> Result<Vec<RecruitmentPost>, RepositoryError> {
        self.read(|state| state.posts.values().cloned().collect())
    }

    fn find_recruitment_all(
        &self,
        user_id: UserId,
        status: RecruitmentUserStatus,
        page: &PageRequest,
    ) -> Result<Page<PostSummary>, RepositoryError> {
        self.read(|state| {
            let mut summaries: Vec<PostSummary> = state
                .applications
                .values()
                .filter(|application| {
                    application.user_id == user_id && application.status == status
                })
                .filter_map(|application| state.posts.get(&application.post_id))
                .map(RecruitmentPost::summary)
                .collect();
            summaries.sort_by(|a, b| b.post_id.cmp(&a.post_id));
            Page::from_ordered(summaries, page)
        })
    }

    fn update_post_status(
        &mut self,
        post_id: PostId,
        status: RecruitmentStatus,
    ) -> Result<(), RepositoryError> {
        self.staged.push(WriteCommand::UpdatePostStatus { post_id, status });
        Ok(())
    }
}

impl RecruitmentUserRepository for MemoryTransaction {
    fn find_by_post_and_user(
        &self,
        post_id: PostId,
        user_id: UserId,
    ) -> Result<Option<RecruitmentUser>, RepositoryError> {
        self.read(|state| state.application_for(post_id, user_id).cloned())
    }

    fn save(&mut self, application: NewApplication) -> Result<RecruitmentUser, RepositoryError> {
        let id = ApplicationId(self.sequence.fetch_add(1, Ordering::Relaxed));
        let record = RecruitmentUser {
            id,
            post_id: application.post_id,
            user_id: application.user_id,
            status: application.status,
            applied_at: application.applied_at,
        };
        self.staged.push(WriteCommand::InsertApplication(record.clone()));
        Ok(record)
    }

    fn delete(&mut self, application: &RecruitmentUser) -> Result<(), RepositoryError> {
        self.staged.push(WriteCommand::DeleteApplication(application.id));
        Ok(())
    }

    fn update_status(
        &mut self,
        id: ApplicationId,
        status: RecruitmentUserStatus,
    ) -> Result<(), RepositoryError> {
        self.staged.push(WriteCommand::UpdateApplicationStatus { id, status });
        Ok(())
    }
}

impl UserRepository for MemoryTransaction {
    fn find_user(&self, id: UserId) -> Result<Option<SiteUser>, RepositoryError> {
        self.read(|state| state.users.get(&id).cloned())
    }

    fn update_profile(&mut self, update: ProfileUpdate) -> Result<(), RepositoryError> {
        self.staged.push(WriteCommand::UpdateProfile(update));
        Ok(())
    }
}

impl JobSkillRepository for MemoryTransaction {
    fn find_by_name(&self, name: &str) -> Result<Option<JobSkill>, RepositoryError> {
        self.read(|state| {
            state
                .skills
                .values()
                .find(|skill| skill.name == name)
                .cloned()
        })
    }
}

impl Transaction for MemoryTransaction {
    fn staged(&self) -> &[WriteCommand] {
        &self.staged
    }

    fn commit(self) -> Result<(), RepositoryError> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let mut guard = lock(&self.state)?;
        let mut next = guard.clone();
        for command in &self.staged {
            next.apply(command)?;
        }
        *guard = next;
        debug!(commands = self.staged.len(), "memory transaction committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CategoryId;
    use chrono::{TimeZone, Utc};

    fn fixture() -> Fixture {
        let at = Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap();
        let post = |id: u64, status| RecruitmentPost {
            post_id: PostId(id),
            subject: format!("post {id}"),
            content: "content".to_string(),
            category_id: CategoryId(1),
            author_id: UserId(99),
            recruitment_closing_date: at,
            num_of_applicants: Some(3),
            recruitment_status: status,
            job_posting_id: None,
            created_at: at,
        };
        Fixture {
            skills: vec![JobSkill {
                id: JobSkillId(1),
                name: "Rust".to_string(),
            }],
            users: Vec::new(),
            posts: vec![
                post(10, RecruitmentStatus::Open),
                post(11, RecruitmentStatus::Open),
            ],
            applications: vec![RecruitmentUser {
                id: ApplicationId(5),
                post_id: PostId(11),
                user_id: UserId(1),
                status: RecruitmentUserStatus::Accepted,
                applied_at: at,
            }],
        }
    }

    fn new_application(post: u64, user: u64) -> NewApplication {
        NewApplication {
            post_id: PostId(post),
            user_id: UserId(user),
            status: RecruitmentUserStatus::Applied,
            applied_at: Utc::now(),
        }
    }

    #[test]
    fn staged_writes_are_invisible_until_commit() {
        let store = MemoryStore::from_fixture(fixture()).expect("fixture loads");
        let mut tx = store.begin().expect("begin");
        let saved = tx.save(new_application(10, 1)).expect("stage insert");
        assert_eq!(saved.id, ApplicationId(6), "sequence continues after fixture ids");

        let other = store.begin().expect("begin");
        assert!(other
            .find_by_post_and_user(PostId(10), UserId(1))
            .expect("read")
            .is_none());
        assert!(tx
            .find_by_post_and_user(PostId(10), UserId(1))
            .expect("read own write")
            .is_some());

        tx.commit().expect("commit");
        assert_eq!(store.application_count().expect("count"), 2);
    }

    #[test]
    fn dropped_transaction_discards_writes() {
        let store = MemoryStore::from_fixture(fixture()).expect("fixture loads");
        {
            let mut tx = store.begin().expect("begin");
            tx.save(new_application(10, 1)).expect("stage insert");
        }
        assert_eq!(store.application_count().expect("count"), 1);
    }

    #[test]
    fn duplicate_pair_is_rejected_at_commit() {
        let store = MemoryStore::from_fixture(fixture()).expect("fixture loads");
        let mut first = store.begin().expect("begin");
        let mut second = store.begin().expect("begin");
        first.save(new_application(10, 1)).expect("stage");
        second.save(new_application(10, 1)).expect("stage");

        first.commit().expect("first commit wins");
        assert_eq!(second.commit(), Err(RepositoryError::Conflict));
        assert_eq!(store.application_count().expect("count"), 2);
    }

    #[test]
    fn application_staged_before_close_is_rejected_at_commit() {
        let store = MemoryStore::from_fixture(fixture()).expect("fixture loads");
        let mut apply = store.begin().expect("begin");
        let mut close = store.begin().expect("begin");
        apply.save(new_application(10, 2)).expect("stage");
        close
            .update_post_status(PostId(10), RecruitmentStatus::Closed)
            .expect("stage");

        close.commit().expect("close commits first");
        assert_eq!(apply.commit(), Err(RepositoryError::Closed));
        assert_eq!(store.application_count().expect("count"), 1);
    }

    #[test]
    fn status_change_staged_before_close_is_rejected_at_commit() {
        let store = MemoryStore::from_fixture(fixture()).expect("fixture loads");
        let mut review = store.begin().expect("begin");
        let mut cancel = store.begin().expect("begin");
        let mut close = store.begin().expect("begin");
        review
            .update_status(ApplicationId(5), RecruitmentUserStatus::Rejected)
            .expect("stage");
        let existing = cancel
            .find_by_post_and_user(PostId(11), UserId(1))
            .expect("read")
            .expect("fixture application");
        cancel.delete(&existing).expect("stage");
        close
            .update_post_status(PostId(11), RecruitmentStatus::Closed)
            .expect("stage");

        close.commit().expect("close commits first");
        assert_eq!(review.commit(), Err(RepositoryError::Closed));
        assert_eq!(cancel.commit(), Err(RepositoryError::Closed));

        let tx = store.begin().expect("begin");
        let kept = tx
            .find_by_post_and_user(PostId(11), UserId(1))
            .expect("read")
            .expect("application kept");
        assert_eq!(kept.status, RecruitmentUserStatus::Accepted);
    }

    #[test]
    fn second_delete_of_same_application_reports_missing_application() {
        let store = MemoryStore::from_fixture(fixture()).expect("fixture loads");
        let mut first = store.begin().expect("begin");
        let mut second = store.begin().expect("begin");
        let existing = first
            .find_by_post_and_user(PostId(11), UserId(1))
            .expect("read")
            .expect("fixture application");
        first.delete(&existing).expect("stage");
        second.delete(&existing).expect("stage");

        first.commit().expect("first delete wins");
        assert_eq!(second.commit(), Err(RepositoryError::ApplicationNotFound));
        assert_eq!(store.application_count().expect("count"), 0);
    }

    #[test]
    fn closed_posts_keep_seeded_applications() {
        let mut fixture = fixture();
        fixture.posts[1].recruitment_status = RecruitmentStatus::Closed;
        let store = MemoryStore::from_fixture(fixture).expect("fixture loads");
        assert_eq!(store.application_count().expect("count"), 1);
    }

    #[test]
    fn failed_commit_applies_nothing() {
        let store = MemoryStore::from_fixture(fixture()).expect("fixture loads");
        let mut tx = store.begin().expect("begin");
        tx.save(new_application(10, 2)).expect("stage");
        tx.update_post_status(PostId(404), RecruitmentStatus::Closed)
            .expect("stage");

        assert_eq!(tx.commit(), Err(RepositoryError::NotFound));
        assert_eq!(store.application_count().expect("count"), 1);
    }

    #[test]
    fn recruitment_query_filters_by_user_and_status() {
        let store = MemoryStore::from_fixture(fixture()).expect("fixture loads");
        let tx = store.begin().expect("begin");
        let page = tx
            .find_recruitment_all(
                UserId(1),
                RecruitmentUserStatus::Accepted,
                &PageRequest::new(0, 10),
            )
            .expect("query");
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].post_id, PostId(11));

        let applied = tx
            .find_recruitment_all(
                UserId(1),
                RecruitmentUserStatus::Applied,
                &PageRequest::new(0, 10),
            )
            .expect("query");
        assert!(applied.is_empty());
    }

    #[test]
    fn fixture_with_duplicate_pair_is_invalid() {
        let mut fixture = fixture();
        let mut duplicate = fixture.applications[0].clone();
        duplicate.id = ApplicationId(6);
        fixture.applications.push(duplicate);
        assert!(matches!(
            MemoryStore::from_fixture(fixture),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn skills_resolve_by_exact_name() {
        let store = MemoryStore::from_fixture(fixture()).expect("fixture loads");
        let tx = store.begin().expect("begin");
        assert!(tx.find_by_name("Rust").expect("lookup").is_some());
        assert!(tx.find_by_name("Go").expect("lookup").is_none());
    }
}
