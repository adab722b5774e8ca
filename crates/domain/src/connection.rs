use crate::shared::entity::{Entity, ID};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Blocked,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Blocked => "blocked",
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "blocked" => Ok(Self::Blocked),
            _ => Err(format!("Unknown connection status: {}", s)),
        }
    }
}

/// A social graph edge between two `User`s. Either side may have
/// initiated the `Connection`.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ID,
    pub user_id: ID,
    pub connected_user_id: ID,
    pub status: ConnectionStatus,
}

impl Connection {
    pub fn new(user_id: ID, connected_user_id: ID) -> Self {
        Self {
            id: Default::default(),
            user_id,
            connected_user_id,
            status: ConnectionStatus::Pending,
        }
    }

    pub fn accept(&mut self) {
        self.status = ConnectionStatus::Accepted;
    }

    /// Accepted edge between the two users, regardless of direction
    pub fn connects(&self, a: &ID, b: &ID) -> bool {
        self.status == ConnectionStatus::Accepted
            && ((self.user_id == *a && self.connected_user_id == *b)
                || (self.user_id == *b && self.connected_user_id == *a))
    }
}

impl Entity for Connection {
    fn id(&self) -> &ID {
        &self.id
    }
}
