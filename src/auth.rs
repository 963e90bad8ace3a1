//! S3 Authentication

use std::collections::HashMap;

use async_trait::async_trait;

/// S3 Authentication Provider
#[async_trait]
pub trait S3Auth {
    /// lookup `secret_access_key` by `access_key_id`
    ///
    /// Returns `None` if the access key is not recognised.
    async fn get_secret_access_key(&self, access_key_id: &str) -> Option<String>;
}

/// A simple in-memory authentication provider
#[derive(Debug, Default)]
pub struct SimpleAuth {
    /// key map
    map: HashMap<String, String>,
}

impl SimpleAuth {
    /// Constructs a new `SimpleAuth`
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// register a credential
    pub fn register(&mut self, access_key: String, secret_key: String) {
        let _prev = self.map.insert(access_key, secret_key);
    }
}

#[async_trait]
impl S3Auth for SimpleAuth {
    async fn get_secret_access_key(&self, access_key_id: &str) -> Option<String> {
        self.map.get(access_key_id).cloned()
    }
}
