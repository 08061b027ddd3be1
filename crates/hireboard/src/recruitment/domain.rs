use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ApplicationId, CategoryId, JobPostingId, PostId, UserId};
use crate::pagination::Page;

/// Lifecycle of the listing itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecruitmentStatus {
    Open,
    Closed,
}

impl RecruitmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RecruitmentStatus::Open => "OPEN",
            RecruitmentStatus::Closed => "CLOSED",
        }
    }
}

/// State of one user's application to one post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecruitmentUserStatus {
    Applied,
    Accepted,
    Rejected,
}

impl RecruitmentUserStatus {
    pub const ALL: [RecruitmentUserStatus; 3] = [
        RecruitmentUserStatus::Applied,
        RecruitmentUserStatus::Accepted,
        RecruitmentUserStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RecruitmentUserStatus::Applied => "APPLIED",
            RecruitmentUserStatus::Accepted => "ACCEPTED",
            RecruitmentUserStatus::Rejected => "REJECTED",
        }
    }

    /// Case-insensitive lookup by name; `None` for anything outside the enum.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw))
    }

    pub const fn is_decided(self) -> bool {
        !matches!(self, RecruitmentUserStatus::Applied)
    }
}

/// Rejected lifecycle change on a post or application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatusTransitionError {
    #[error("recruitment is already closed")]
    AlreadyClosed,
    #[error("cannot move application from {from:?} to {to:?}")]
    Application {
        from: RecruitmentUserStatus,
        to: RecruitmentUserStatus,
    },
}

/// Recruitment listing snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitmentPost {
    pub post_id: PostId,
    pub subject: String,
    pub content: String,
    pub category_id: CategoryId,
    pub author_id: UserId,
    pub recruitment_closing_date: DateTime<Utc>,
    #[serde(default)]
    pub num_of_applicants: Option<u32>,
    pub recruitment_status: RecruitmentStatus,
    #[serde(default)]
    pub job_posting_id: Option<JobPostingId>,
    pub created_at: DateTime<Utc>,
}

impl RecruitmentPost {
    pub fn is_closed(&self) -> bool {
        self.recruitment_status == RecruitmentStatus::Closed
    }

    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }

    pub fn updated(&self, subject: String, content: String, num_of_applicants: u32) -> Self {
        Self {
            subject,
            content,
            num_of_applicants: Some(num_of_applicants),
            ..self.clone()
        }
    }

    /// OPEN -> CLOSED; a closed post never reopens.
    pub fn closed(&self) -> Result<Self, StatusTransitionError> {
        if self.is_closed() {
            return Err(StatusTransitionError::AlreadyClosed);
        }
        Ok(Self {
            recruitment_status: RecruitmentStatus::Closed,
            ..self.clone()
        })
    }

    pub fn summary(&self) -> PostSummary {
        PostSummary {
            post_id: self.post_id,
            subject: self.subject.clone(),
            category_id: self.category_id,
            author_id: self.author_id,
            recruitment_status: self.recruitment_status,
            recruitment_closing_date: self.recruitment_closing_date,
            num_of_applicants: self.num_of_applicants,
            created_at: self.created_at,
        }
    }
}

/// Association between one post and one applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitmentUser {
    pub id: ApplicationId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub status: RecruitmentUserStatus,
    pub applied_at: DateTime<Utc>,
}

impl RecruitmentUser {
    pub fn applied(
        id: ApplicationId,
        post_id: PostId,
        user_id: UserId,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            user_id,
            status: RecruitmentUserStatus::Applied,
            applied_at,
        }
    }

    /// APPLIED -> ACCEPTED | REJECTED.
    pub fn decide(&self, next: RecruitmentUserStatus) -> Result<Self, StatusTransitionError> {
        if self.status.is_decided() || !next.is_decided() {
            return Err(StatusTransitionError::Application {
                from: self.status,
                to: next,
            });
        }
        Ok(Self {
            status: next,
            ..self.clone()
        })
    }
}

/// Listing row returned by paged recruitment queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub post_id: PostId,
    pub subject: String,
    pub category_id: CategoryId,
    pub author_id: UserId,
    pub recruitment_status: RecruitmentStatus,
    pub recruitment_closing_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_of_applicants: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// Posts on which the requester holds an application of `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecruitmentUserPosts {
    pub status: RecruitmentUserStatus,
    pub posts: Page<PostSummary>,
}
