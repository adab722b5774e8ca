use super::IConnectionRepo;
use crate::repos::shared::inmemory_repo::*;
use autogift_domain::{Connection, ID};

pub struct InMemoryConnectionRepo {
    connections: std::sync::Mutex<Vec<Connection>>,
}

impl InMemoryConnectionRepo {
    pub fn new() -> Self {
        Self {
            connections: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IConnectionRepo for InMemoryConnectionRepo {
    async fn insert(&self, connection: &Connection) -> anyhow::Result<()> {
        insert(connection, &self.connections);
        Ok(())
    }

    async fn save(&self, connection: &Connection) -> anyhow::Result<()> {
        save(connection, &self.connections);
        Ok(())
    }

    async fn find_between(
        &self,
        user_id: &ID,
        other_user_id: &ID,
    ) -> anyhow::Result<Vec<Connection>> {
        Ok(find_by(&self.connections, |c| {
            (c.user_id == *user_id && c.connected_user_id == *other_user_id)
                || (c.user_id == *other_user_id && c.connected_user_id == *user_id)
        }))
    }
}
