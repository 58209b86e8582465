use std::collections::HashMap;

use anyhow::Result as AnyResult;
use aws_config::{BehaviorVersion, sts::AssumeRoleProvider};
use aws_sdk_ssm::{Client, error::DisplayErrorContext, types::Parameter};
use aws_types::region::Region;
use tracing::{debug, info};

use crate::{
    configs::ParameterStoreConfig,
    domain::{ParameterInfo, ParameterType},
    store::{FetchedParameters, ParameterStore, StoreError},
};

const ASSUMED_ROLE_SESSION_NAME: &str = "parameter-resolver";

#[derive(Clone)]
pub struct AwsParameterStore {
    client: Client,
}

impl AwsParameterStore {
    pub async fn new(config: ParameterStoreConfig) -> AnyResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        // Without an explicit region the default chain falls back to instance metadata.
        if let Some(region) = config.region.clone() {
            loader = loader.region(Region::new(region));
        }

        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url.clone());
        }

        let shared_config = loader.load().await;

        let client = match &config.assume_role_arn {
            Some(role_arn) => {
                info!("Assuming role {} for Parameter Store access", role_arn);
                let provider = AssumeRoleProvider::builder(role_arn.clone())
                    .session_name(ASSUMED_ROLE_SESSION_NAME)
                    .configure(&shared_config)
                    .build()
                    .await;
                let ssm_config = aws_sdk_ssm::config::Builder::from(&shared_config)
                    .credentials_provider(provider)
                    .build();
                Client::from_conf(ssm_config)
            }
            None => Client::new(&shared_config),
        };

        debug!(
            region = ?shared_config.region(),
            "Parameter Store client initialised"
        );

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl std::fmt::Debug for AwsParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsParameterStore").finish_non_exhaustive()
    }
}

fn to_parameter_info(parameter: &Parameter) -> Result<ParameterInfo, StoreError> {
    let name = parameter.name().ok_or_else(|| {
        StoreError::InvalidResponse("Parameter Store returned a parameter without a name".into())
    })?;
    let parameter_type = parameter
        .r#type()
        .map(|t| ParameterType::from(t.as_str()))
        .ok_or_else(|| {
            StoreError::InvalidResponse(format!("Parameter '{}' has no type", name))
        })?;
    let value = parameter
        .value()
        .ok_or_else(|| StoreError::InvalidResponse(format!("Parameter '{}' has no value", name)))?;

    Ok(ParameterInfo::new(name, parameter_type, value))
}

#[async_trait::async_trait]
impl ParameterStore for AwsParameterStore {
    async fn get_parameters(
        &self,
        names: &[String],
        with_decryption: bool,
    ) -> Result<FetchedParameters, StoreError> {
        debug!(
            count = names.len(),
            "Making a call to Parameter Store to fetch parameter(s)"
        );

        let output = self
            .client
            .get_parameters()
            .set_names(Some(names.to_vec()))
            .with_decryption(with_decryption)
            .send()
            .await
            .map_err(|err| {
                StoreError::Transport(format!(
                    "Failed to get parameters from Parameter Store: {}",
                    DisplayErrorContext(&err)
                ))
            })?;

        let mut parameters = HashMap::with_capacity(output.parameters().len());
        for parameter in output.parameters() {
            let info = to_parameter_info(parameter)?;
            parameters.insert(info.name().to_string(), info);
        }

        Ok(FetchedParameters {
            parameters,
            invalid_parameters: output.invalid_parameters().to_vec(),
        })
    }
}
