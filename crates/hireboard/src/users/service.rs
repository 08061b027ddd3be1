use std::collections::BTreeSet;

use tracing::{debug, info};

use super::domain::{JobSkill, JobSkillRequest, ProfileUpdate, SiteUser, UserModifyProfileRequest};
use crate::error::{ErrorCode, ServiceError};
use crate::ids::UserId;
use crate::principal::Principal;
use crate::store::{JobSkillRepository, UserRepository};

/// Ownership gated profile reads and edits.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserService;

impl UserService {
    pub fn new() -> Self {
        Self
    }

    pub fn get_user_by_id<T>(&self, tx: &T, id: UserId) -> Result<SiteUser, ServiceError>
    where
        T: UserRepository,
    {
        tx.find_user(id)?
            .ok_or_else(|| ErrorCode::UserNotFound.into())
    }

    pub fn is_valid_user(&self, id: UserId, requester: &Principal) -> Result<(), ServiceError> {
        if id != requester.id {
            return Err(ErrorCode::UnauthorizedUser.into());
        }
        Ok(())
    }

    pub fn get_user<T>(
        &self,
        tx: &T,
        id: UserId,
        requester: &Principal,
    ) -> Result<SiteUser, ServiceError>
    where
        T: UserRepository,
    {
        self.is_valid_user(id, requester)?;
        self.get_user_by_id(tx, id)
    }

    /// Replace free-text profile fields and, when supplied, the skill set.
    pub fn modify_user<T>(
        &self,
        tx: &mut T,
        id: UserId,
        requester: &Principal,
        request: UserModifyProfileRequest,
    ) -> Result<SiteUser, ServiceError>
    where
        T: UserRepository + JobSkillRepository,
    {
        self.is_valid_user(id, requester)?;
        let user = self.get_user_by_id(tx, id)?;

        let job_skills = match request.job_skills {
            Some(requests) => Some(resolve_skills(tx, &requests)?),
            None => None,
        };

        let update = ProfileUpdate {
            user_id: user.id,
            introduction: request.introduction,
            job: request.job,
            job_skills,
        };
        let updated = user.with_profile(&update);
        tx.update_profile(update)?;

        info!(
            user_id = id.0,
            skills = updated.job_skills.len(),
            "profile update staged"
        );
        Ok(updated)
    }
}

/// Unnamed and unknown skills are skipped; repeats collapse to one entry.
fn resolve_skills<T>(tx: &T, requests: &[JobSkillRequest]) -> Result<Vec<JobSkill>, ServiceError>
where
    T: JobSkillRepository,
{
    let mut seen = BTreeSet::new();
    let mut skills = Vec::with_capacity(requests.len());
    for name in requests.iter().filter_map(|request| request.name.as_deref()) {
        match tx.find_by_name(name)? {
            Some(skill) if seen.insert(skill.id) => skills.push(skill),
            Some(_) => {}
            None => debug!(skill = name, "ignoring unknown job skill"),
        }
    }
    Ok(skills)
}
