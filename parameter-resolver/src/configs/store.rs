use super::{
    Configs,
    environment::{first_env, optional_env},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterStoreConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub assume_role_arn: Option<String>,
}

#[async_trait::async_trait]
impl Configs for ParameterStoreConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(ParameterStoreConfig {
            region: optional_env("AWS_REGION"),
            profile: optional_env("AWS_PROFILE"),
            endpoint_url: first_env(&["SSM_ENDPOINT", "AWS_ENDPOINT"]),
            assume_role_arn: optional_env("SSM2ENV_ASSUME_ROLE_ARN"),
        })
    }
}
