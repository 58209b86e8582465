use std::collections::HashMap;

use thiserror::Error;

use crate::domain::ParameterInfo;

pub mod adapters;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// One store round trip: what was found, keyed by bare name, and what was not.
#[derive(Debug, Clone, Default)]
pub struct FetchedParameters {
    pub parameters: HashMap<String, ParameterInfo>,
    pub invalid_parameters: Vec<String>,
}

#[async_trait::async_trait]
pub trait ParameterStore: Send + Sync {
    /// Looks up at most one batch of bare parameter names.
    async fn get_parameters(
        &self,
        names: &[String],
        with_decryption: bool,
    ) -> Result<FetchedParameters, StoreError>;
}
