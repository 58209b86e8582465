use super::{
    Configs,
    environment::{env_flag, parse_env},
};
use crate::{
    encoding::OutputEncoding,
    policy::{NotFoundPolicy, ResolveOptions, SecureReferencePolicy},
};

#[async_trait::async_trait]
impl Configs for ResolveOptions {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(ResolveOptions {
            ignore_secure_parameters: env_flag("RESOLVER_IGNORE_SECURE")?,
            secure_policy: parse_env("RESOLVER_SECURE_POLICY", SecureReferencePolicy::Skip)?,
            not_found_policy: parse_env("RESOLVER_NOT_FOUND_POLICY", NotFoundPolicy::Fail)?,
            output_encoding: parse_env("RESOLVER_OUTPUT_FORMAT", OutputEncoding::Text)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "RESOLVER_IGNORE_SECURE",
        "RESOLVER_SECURE_POLICY",
        "RESOLVER_NOT_FOUND_POLICY",
        "RESOLVER_OUTPUT_FORMAT",
    ];

    fn clear() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_defaults_without_environment() {
        clear();
        let options = ResolveOptions::load().await.unwrap();
        assert_eq!(options, ResolveOptions::default());
    }

    #[tokio::test]
    #[serial]
    async fn test_load_from_environment() {
        clear();
        unsafe {
            std::env::set_var("RESOLVER_IGNORE_SECURE", "true");
            std::env::set_var("RESOLVER_SECURE_POLICY", "reject");
            std::env::set_var("RESOLVER_NOT_FOUND_POLICY", "ignoreparameternotfound");
            std::env::set_var("RESOLVER_OUTPUT_FORMAT", "json");
        }

        let options = ResolveOptions::load().await.unwrap();

        assert!(options.ignore_secure_parameters);
        assert_eq!(options.secure_policy, SecureReferencePolicy::Reject);
        assert_eq!(options.not_found_policy, NotFoundPolicy::Ignore);
        assert_eq!(options.output_encoding, OutputEncoding::Json);
        clear();
    }

    #[tokio::test]
    #[serial]
    async fn test_invalid_format_fails() {
        clear();
        unsafe {
            std::env::set_var("RESOLVER_OUTPUT_FORMAT", "csv");
        }
        assert!(ResolveOptions::load().await.is_err());
        clear();
    }
}
