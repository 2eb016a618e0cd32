use serde::{Deserialize, Serialize};

use super::{RatingSample, UserId};

/// A user of the ratings site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: UserId,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

impl User {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
            age: None,
            zipcode: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A user together with everything they have rated
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub ratings: Vec<RatingSample>,
}
