use serde::{Deserialize, Serialize};

use crate::ids::{JobSkillId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobSkill {
    pub id: JobSkillId,
    pub name: String,
}

/// Account holder with an editable profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub job_skills: Vec<JobSkill>,
}

impl SiteUser {
    pub fn with_profile(&self, update: &ProfileUpdate) -> Self {
        let mut next = self.clone();
        next.introduction = update.introduction.clone();
        next.job = update.job.clone();
        if let Some(skills) = &update.job_skills {
            next.job_skills = skills.clone();
        }
        next
    }
}

/// Profile edit submitted by the account owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModifyProfileRequest {
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    /// `None` leaves the current skill set untouched.
    #[serde(default)]
    pub job_skills: Option<Vec<JobSkillRequest>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSkillRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl JobSkillRequest {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
        }
    }
}

/// Resolved profile change applied by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub user_id: UserId,
    pub introduction: Option<String>,
    pub job: Option<String>,
    pub job_skills: Option<Vec<JobSkill>>,
}
