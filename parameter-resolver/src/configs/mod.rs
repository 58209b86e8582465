pub mod environment;
pub mod options;
pub mod store;

pub use store::ParameterStoreConfig;

#[async_trait::async_trait]
pub trait Configs: Sized {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub store_config: ParameterStoreConfig,
    pub resolve_options: crate::policy::ResolveOptions,
}

#[async_trait::async_trait]
impl Configs for ResolverConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self {
            store_config: ParameterStoreConfig::load().await?,
            resolve_options: crate::policy::ResolveOptions::load().await?,
        })
    }
}
