use std::{process::ExitCode, sync::Arc};

use clap::Parser;
use dotenvy::dotenv;
use parameter_resolver::{
    NotFoundPolicy, OutputEncoding, ParameterResolver, ResolutionMap, ResolveOptions,
    SecureReferencePolicy,
    configs::{Configs, ResolverConfig},
    store::adapters::aws_parameter_store::AwsParameterStore,
};
use serde::Serialize;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Resolves {{ssm:name}} and {{ssm-secure:name}} placeholders from AWS Parameter Store",
    long_about = None
)]
struct Args {
    /// Input file
    #[arg(long = "in", short = 'i', default_value = "")]
    input: String,

    /// Resolved file, overwritten if present
    #[arg(long = "out", short = 'o', default_value = "")]
    output: String,

    /// Output encoding: txt (default), xml, yml, json
    #[arg(long = "fmt", short = 'f')]
    format: Option<OutputEncoding>,

    /// failonparameternotfound (default) or ignoreparameternotfound
    #[arg(long = "opt")]
    not_found: Option<NotFoundPolicy>,

    /// Leave secure parameters unresolved
    #[arg(long, short = 'x')]
    ignore_secure: bool,

    /// With --ignore-secure: skip secure placeholders or reject the document
    #[arg(long)]
    secure_policy: Option<SecureReferencePolicy>,

    /// Print the resolved references (without values) as JSON
    #[arg(long, short = 'r')]
    report: bool,
}

#[derive(Debug, Serialize)]
struct ReportEntry {
    reference: String,
    name: String,
    #[serde(rename = "type")]
    parameter_type: String,
}

fn setup_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()) // reads RUST_LOG
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn merge_options(args: &Args, defaults: ResolveOptions) -> ResolveOptions {
    ResolveOptions {
        ignore_secure_parameters: args.ignore_secure || defaults.ignore_secure_parameters,
        secure_policy: args.secure_policy.unwrap_or(defaults.secure_policy),
        not_found_policy: args.not_found.unwrap_or(defaults.not_found_policy),
        output_encoding: args.format.unwrap_or(defaults.output_encoding),
    }
}

fn print_report(resolved: &ResolutionMap) -> Result<(), serde_json::Error> {
    let entries: Vec<ReportEntry> = resolved
        .iter()
        .map(|(reference, info)| ReportEntry {
            reference: reference.to_string(),
            name: info.name().to_string(),
            parameter_type: info.parameter_type().to_string(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    setup_logging();

    let args = Args::parse();

    let config = match ResolverConfig::load().await {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configs. Original error is: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let options = merge_options(&args, config.resolve_options);
    debug!("OPTIONS: {:?}", &options);

    let store = match AwsParameterStore::new(config.store_config).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize Parameter Store client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let resolver = ParameterResolver::new(Arc::new(store), options);

    match resolver
        .resolve_parameters_in_file(&args.input, &args.output)
        .await
    {
        Ok(resolved) => {
            info!("Resolved {} parameter reference(s)", resolved.len());
            if args.report
                && let Err(e) = print_report(&resolved)
            {
                error!("Failed to print report: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to resolve parameters: {}", e);
            ExitCode::FAILURE
        }
    }
}
