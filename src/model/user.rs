use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A Notion user as far as the blog cares: who they are and what to call them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub full_name: String,
}

impl UserRecord {
    pub fn new(id: UserId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
        }
    }
}

/// Users fetched for one render, keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDirectory {
    users: HashMap<UserId, UserRecord>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user: UserRecord) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn get(&self, id: &UserId) -> Option<&UserRecord> {
        self.users.get(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<UserRecord> for UserDirectory {
    fn from_iter<I: IntoIterator<Item = UserRecord>>(iter: I) -> Self {
        let mut directory = Self::new();
        for user in iter {
            directory.insert(user);
        }
        directory
    }
}
