use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::ParameterInfo;
use crate::store::{FetchedParameters, ParameterStore, StoreError};

/// In-memory parameter store. Every batch it serves is recorded.
#[derive(Clone, Default)]
pub struct LocalParameterStore {
    parameters: Arc<RwLock<HashMap<String, ParameterInfo>>>,
    requests: Arc<RwLock<Vec<Vec<String>>>>,
    fail_on_call: Option<usize>,
}

impl LocalParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(parameters: Vec<ParameterInfo>) -> Self {
        let store = Self::new();
        for parameter in parameters {
            store.insert(parameter);
        }
        store
    }

    /// Makes the n-th call (1-based) fail with a transport error.
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn insert(&self, parameter: ParameterInfo) {
        let mut parameters = self
            .parameters
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        parameters.insert(parameter.name().to_string(), parameter);
    }

    /// Batches received so far, in call order.
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl std::fmt::Debug for LocalParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalParameterStore")
            .field("fail_on_call", &self.fail_on_call)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ParameterStore for LocalParameterStore {
    async fn get_parameters(
        &self,
        names: &[String],
        _with_decryption: bool,
    ) -> Result<FetchedParameters, StoreError> {
        let call = {
            let mut requests = self
                .requests
                .write()
                .map_err(|e| StoreError::Transport(e.to_string()))?;
            requests.push(names.to_vec());
            requests.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(StoreError::Transport(format!(
                "Simulated failure on call {}",
                call
            )));
        }

        let parameters = self
            .parameters
            .read()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let mut fetched = FetchedParameters::default();
        for name in names {
            match parameters.get(name) {
                Some(info) => {
                    fetched.parameters.insert(name.clone(), info.clone());
                }
                None => fetched.invalid_parameters.push(name.clone()),
            }
        }

        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParameterType;

    #[tokio::test]
    async fn test_get_parameters_splits_found_and_invalid() {
        let store = LocalParameterStore::with_parameters(vec![ParameterInfo::new(
            "param1",
            ParameterType::String,
            "value_param1",
        )]);

        let fetched = store
            .get_parameters(&["param1".to_string(), "missing".to_string()], true)
            .await
            .unwrap();

        assert_eq!(fetched.parameters["param1"].value(), "value_param1");
        assert_eq!(fetched.invalid_parameters, vec!["missing".to_string()]);
    }

    #[tokio::test]
    async fn test_requests_are_recorded_in_order() {
        let store = LocalParameterStore::new();
        store.get_parameters(&["a".to_string()], true).await.unwrap();
        store
            .get_parameters(&["b".to_string(), "c".to_string()], true)
            .await
            .unwrap();

        assert_eq!(
            store.requests(),
            vec![
                vec!["a".to_string()],
                vec!["b".to_string(), "c".to_string()]
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_on_call() {
        let store = LocalParameterStore::new().failing_on_call(2);
        assert!(store.get_parameters(&["a".to_string()], true).await.is_ok());
        assert!(matches!(
            store.get_parameters(&["b".to_string()], true).await,
            Err(StoreError::Transport(_))
        ));
    }
}
