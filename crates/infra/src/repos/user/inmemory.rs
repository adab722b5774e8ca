use super::IUserRepo;
use crate::repos::shared::inmemory_repo::*;
use autogift_domain::{normalize_email, User, ID};

pub struct InMemoryUserRepo {
    users: std::sync::Mutex<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self {
            users: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for InMemoryUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        insert(user, &self.users);
        Ok(())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        save(user, &self.users);
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> anyhow::Result<Option<User>> {
        Ok(find(user_id, &self.users))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let email = normalize_email(email);
        let mut users = find_by(&self.users, |u| u.email == email);
        if users.is_empty() {
            return Ok(None);
        }
        Ok(Some(users.remove(0)))
    }
}
