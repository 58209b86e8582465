use std::sync::Arc;

use dotenvy::dotenv;
use parameter_resolver::{
    ParameterResolver, ResolveOptions,
    configs::{Configs, ParameterStoreConfig},
    store::adapters::aws_parameter_store::AwsParameterStore,
};
use tracing::info;

const SAMPLE_DOCUMENT: &str =
    "Some text {{ ssm:/a/b/c/param1}}, some more text {{ssm-secure:param2}}";

async fn extract_parameters_from_text(resolver: &ParameterResolver) -> anyhow::Result<()> {
    println!("Example of extract_parameters_from_text API usage");

    let resolved = resolver.extract_parameters_from_text(SAMPLE_DOCUMENT).await?;
    for (reference, info) in &resolved {
        println!(
            "Parameter reference {} -> {} ({})",
            reference,
            info.name(),
            info.parameter_type()
        );
    }
    println!();
    Ok(())
}

async fn resolve_parameter_reference_list(resolver: &ParameterResolver) -> anyhow::Result<()> {
    println!("Example of resolve_parameter_reference_list API usage");

    let resolved = resolver
        .resolve_parameter_reference_list(&["ssm:/a/b/c/param1", "ssm-secure:param2"])
        .await?;
    for (reference, info) in &resolved {
        println!("Parameter reference {} -> {}", reference, info.parameter_type());
    }
    println!();
    Ok(())
}

async fn resolve_parameters_in_text(resolver: &ParameterResolver) -> anyhow::Result<()> {
    println!("Example of resolve_parameters_in_text API usage");

    let resolved = resolver.resolve_parameters_in_text(SAMPLE_DOCUMENT).await?;
    println!("Unresolved doc: {}", SAMPLE_DOCUMENT);
    println!("Resolved doc:   {}\n", resolved);
    Ok(())
}

async fn resolve_parameters_in_file(resolver: &ParameterResolver) -> anyhow::Result<()> {
    println!("Example of resolve_parameters_in_file API usage");

    let input = std::env::var("USAGE_INPUT_FILE").unwrap_or_else(|_| "./test.json".to_string());
    let output = std::env::var("USAGE_OUTPUT_FILE")
        .unwrap_or_else(|_| "./resolved_test.json".to_string());
    let resolved = resolver.resolve_parameters_in_file(&input, &output).await?;
    println!(
        "Resolved {} parameter(s) from {} into {}\n",
        resolved.len(),
        input,
        output
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let store_config = ParameterStoreConfig::load()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    let store = AwsParameterStore::new(store_config).await?;
    let resolver = ParameterResolver::new(Arc::new(store), ResolveOptions::default());
    info!("Running usage examples");

    extract_parameters_from_text(&resolver).await?;
    resolve_parameter_reference_list(&resolver).await?;
    resolve_parameters_in_text(&resolver).await?;
    resolve_parameters_in_file(&resolver).await?;

    Ok(())
}
