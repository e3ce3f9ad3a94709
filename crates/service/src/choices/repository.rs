use async_trait::async_trait;

use super::domain::{BuildServiceEntry, TokenEntry};
use crate::errors::ServiceError;

/// Source of the rows behind the dynamic form choices. Every call reads
/// current state; nothing is cached between form constructions.
#[async_trait]
pub trait ChoiceSource: Send + Sync {
    async fn image_types(&self) -> Result<Vec<String>, ServiceError>;
    async fn archs(&self) -> Result<Vec<String>, ServiceError>;
    async fn build_services(&self) -> Result<Vec<BuildServiceEntry>, ServiceError>;
    async fn tokens(&self) -> Result<Vec<TokenEntry>, ServiceError>;
}

/// Simple in-memory choice source for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockChoiceSource {
        image_types: Mutex<Vec<String>>,
        archs: Mutex<Vec<String>>,
        build_services: Mutex<Vec<BuildServiceEntry>>,
        tokens: Mutex<Vec<TokenEntry>>,
    }

    impl MockChoiceSource {
        pub fn with_image_types(self, names: &[&str]) -> Self {
            *self.image_types.lock().unwrap() = names.iter().map(|s| s.to_string()).collect();
            self
        }

        pub fn with_archs(self, names: &[&str]) -> Self {
            *self.archs.lock().unwrap() = names.iter().map(|s| s.to_string()).collect();
            self
        }

        pub fn with_build_service(self, name: &str, apiurl: &str) -> Self {
            self.build_services.lock().unwrap().push(BuildServiceEntry { name: name.into(), apiurl: apiurl.into() });
            self
        }

        pub fn with_token(self, name: &str, default_value: &str, description: &str) -> Self {
            self.tokens.lock().unwrap().push(TokenEntry {
                name: name.into(),
                default_value: default_value.into(),
                description: description.into(),
            });
            self
        }

        /// Add an architecture after construction, as a new row would appear.
        pub fn push_arch(&self, name: &str) {
            self.archs.lock().unwrap().push(name.to_string());
        }
    }

    #[async_trait]
    impl ChoiceSource for MockChoiceSource {
        async fn image_types(&self) -> Result<Vec<String>, ServiceError> {
            Ok(self.image_types.lock().unwrap().clone())
        }

        async fn archs(&self) -> Result<Vec<String>, ServiceError> {
            Ok(self.archs.lock().unwrap().clone())
        }

        async fn build_services(&self) -> Result<Vec<BuildServiceEntry>, ServiceError> {
            Ok(self.build_services.lock().unwrap().clone())
        }

        async fn tokens(&self) -> Result<Vec<TokenEntry>, ServiceError> {
            Ok(self.tokens.lock().unwrap().clone())
        }
    }
}
