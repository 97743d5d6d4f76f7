//! Mock repository implementation for isolating view-models in tests.

use mockall::mock;
use serde_json::Value;

use crate::repository::errors::RepositoryResult;
use crate::repository::{FormSubmission, ResourceReader, ResourceWriter};

mock! {
    pub Repository {}

    impl ResourceReader for Repository {
        fn get_json(&self, url: &str) -> RepositoryResult<Value>;
    }

    impl ResourceWriter for Repository {
        fn post_json(&self, url: &str, body: &Value) -> RepositoryResult<Value>;
        fn patch_json(&self, url: &str, body: &Value) -> RepositoryResult<Value>;
        fn delete(&self, url: &str) -> RepositoryResult<()>;
        fn submit_form(&self, url: &str, form: &FormSubmission) -> RepositoryResult<Value>;
    }
}
