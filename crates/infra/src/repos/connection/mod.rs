mod inmemory;
mod postgres;

use autogift_domain::{Connection, ID};
pub use inmemory::InMemoryConnectionRepo;
pub use postgres::PostgresConnectionRepo;

#[async_trait::async_trait]
pub trait IConnectionRepo: Send + Sync {
    async fn insert(&self, connection: &Connection) -> anyhow::Result<()>;
    async fn save(&self, connection: &Connection) -> anyhow::Result<()>;
    /// Connections between the two users regardless of who initiated them
    async fn find_between(&self, user_id: &ID, other_user_id: &ID)
        -> anyhow::Result<Vec<Connection>>;
}

#[cfg(test)]
mod tests {
    use crate::setup_context;
    use autogift_domain::{Connection, User, ID};

    #[tokio::test]
    async fn find_between_ignores_direction() {
        let ctx = setup_context().await;
        let a = User::new(ID::default(), format!("{}@example.com", ID::default()));
        let b = User::new(ID::default(), format!("{}@example.com", ID::default()));
        let c = User::new(ID::default(), format!("{}@example.com", ID::default()));
        for user in [&a, &b, &c] {
            ctx.repos.users.insert(user).await.expect("To insert user");
        }

        let mut connection = Connection::new(a.id.clone(), b.id.clone());
        ctx.repos.connections.insert(&connection).await.unwrap();
        connection.accept();
        ctx.repos.connections.save(&connection).await.unwrap();

        let res = ctx
            .repos
            .connections
            .find_between(&b.id, &a.id)
            .await
            .unwrap();
        assert_eq!(res.len(), 1);
        assert!(res[0].connects(&a.id, &b.id));

        assert!(ctx
            .repos
            .connections
            .find_between(&a.id, &c.id)
            .await
            .unwrap()
            .is_empty());
    }
}
