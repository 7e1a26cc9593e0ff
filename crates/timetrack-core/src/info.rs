use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Passport, Result};

/// Personal data returned by the passport lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserInfo {
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub address: String,
}

/// External capability resolving a passport to personal data.
///
/// Called once per user registration, before anything is written.
#[async_trait]
pub trait UserInfoProvider: Send + Sync {
    async fn user_info(&self, passport: &Passport) -> Result<UserInfo>;
}
