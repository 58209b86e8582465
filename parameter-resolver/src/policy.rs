use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::{ParameterReference, ResolutionMap, SSM_NON_SECURE_PREFIX, SSM_SECURE_PREFIX};
use crate::encoding::OutputEncoding;
use crate::error::ResolveError;
use crate::fetcher::FetchOutcome;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseOptionError {
    #[error("Invalid output document format '{0}', expected one of txt, xml, yml, json")]
    OutputEncoding(String),
    #[error("Invalid not-found policy '{0}', expected fail or ignore")]
    NotFoundPolicy(String),
    #[error("Invalid secure reference policy '{0}', expected skip or reject")]
    SecurePolicy(String),
}

/// What to do with references the store does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotFoundPolicy {
    #[default]
    Fail,
    Ignore,
}

impl FromStr for NotFoundPolicy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail" | "failonparameternotfound" => Ok(NotFoundPolicy::Fail),
            "ignore" | "ignoreparameternotfound" => Ok(NotFoundPolicy::Ignore),
            other => Err(ParseOptionError::NotFoundPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for NotFoundPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundPolicy::Fail => write!(f, "fail"),
            NotFoundPolicy::Ignore => write!(f, "ignore"),
        }
    }
}

/// What to do with secure references while secure parameters are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecureReferencePolicy {
    /// Leave their placeholders untouched.
    #[default]
    Skip,
    /// Refuse the whole document.
    Reject,
}

impl FromStr for SecureReferencePolicy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(SecureReferencePolicy::Skip),
            "reject" | "fail" => Ok(SecureReferencePolicy::Reject),
            other => Err(ParseOptionError::SecurePolicy(other.to_string())),
        }
    }
}

impl fmt::Display for SecureReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecureReferencePolicy::Skip => write!(f, "skip"),
            SecureReferencePolicy::Reject => write!(f, "reject"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolveOptions {
    pub ignore_secure_parameters: bool,
    pub secure_policy: SecureReferencePolicy,
    pub not_found_policy: NotFoundPolicy,
    pub output_encoding: OutputEncoding,
}

impl ResolveOptions {
    pub fn with_ignore_secure_parameters(mut self, ignore: bool) -> Self {
        self.ignore_secure_parameters = ignore;
        self
    }

    pub fn with_secure_policy(mut self, policy: SecureReferencePolicy) -> Self {
        self.secure_policy = policy;
        self
    }

    pub fn with_not_found_policy(mut self, policy: NotFoundPolicy) -> Self {
        self.not_found_policy = policy;
        self
    }

    pub fn with_output_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.output_encoding = encoding;
        self
    }
}

/// Drops secure references before any store call when secure parameters are
/// ignored, or rejects them under [`SecureReferencePolicy::Reject`].
pub fn select_references(
    references: Vec<ParameterReference>,
    options: &ResolveOptions,
) -> Result<Vec<ParameterReference>, ResolveError> {
    if !options.ignore_secure_parameters {
        return Ok(references);
    }

    let (secure, plain): (Vec<_>, Vec<_>) =
        references.into_iter().partition(ParameterReference::is_secure);

    if secure.is_empty() {
        return Ok(plain);
    }

    match options.secure_policy {
        SecureReferencePolicy::Skip => {
            warn!(
                count = secure.len(),
                "Skipping secure parameter references"
            );
            Ok(plain)
        }
        SecureReferencePolicy::Reject => Err(ResolveError::SecureReferencesRejected(
            sorted_strings(secure.iter()),
        )),
    }
}

/// Every secure reference must resolve to a secure parameter and every plain
/// reference to a non-secure one. All offenders are reported together.
pub fn validate_prefixes(resolved: &ResolutionMap) -> Result<(), ResolveError> {
    let mut violations: Vec<(String, String)> = resolved
        .iter()
        .filter_map(|(reference, info)| {
            let secure_type = info.parameter_type().is_secure();
            if reference.is_secure() && !secure_type {
                Some((reference.to_string(), format!(
                    "for parameter reference {{{{{}}}}} secure prefix {} is used for a non-secure type {}",
                    reference,
                    SSM_SECURE_PREFIX,
                    info.parameter_type()
                )))
            } else if !reference.is_secure() && secure_type {
                Some((reference.to_string(), format!(
                    "for parameter reference {{{{{}}}}} non-secure prefix {} is used for a secure type {}",
                    reference,
                    SSM_NON_SECURE_PREFIX,
                    info.parameter_type()
                )))
            } else {
                None
            }
        })
        .collect();
    // Same order as the other reference listings: by reference text.
    violations.sort_by(|a, b| a.0.cmp(&b.0));

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ResolveError::PolicyViolation(
            violations.into_iter().map(|(_, message)| message).collect(),
        ))
    }
}

/// Removes secure entries when secure parameters are ignored.
pub fn exclude_secure(resolved: ResolutionMap, options: &ResolveOptions) -> ResolutionMap {
    if !options.ignore_secure_parameters {
        return resolved;
    }
    resolved
        .into_iter()
        .filter(|(reference, info)| !reference.is_secure() && !info.parameter_type().is_secure())
        .collect()
}

pub fn check_not_found(
    not_found: &[ParameterReference],
    options: &ResolveOptions,
) -> Result<(), ResolveError> {
    if not_found.is_empty() {
        return Ok(());
    }

    match options.not_found_policy {
        NotFoundPolicy::Fail => Err(ResolveError::NotFound(sorted_strings(not_found.iter()))),
        NotFoundPolicy::Ignore => {
            warn!(
                references = %sorted_strings(not_found.iter()).join(","),
                "Leaving unresolved parameter references in place"
            );
            Ok(())
        }
    }
}

/// Turns a raw fetch result into the map handed to substitution.
pub fn apply(outcome: FetchOutcome, options: &ResolveOptions) -> Result<ResolutionMap, ResolveError> {
    validate_prefixes(&outcome.resolved)?;
    check_not_found(&outcome.not_found, options)?;
    Ok(exclude_secure(outcome.resolved, options))
}

fn sorted_strings<'a>(references: impl Iterator<Item = &'a ParameterReference>) -> Vec<String> {
    let mut names: Vec<String> = references.map(ToString::to_string).collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParameterInfo, ParameterType};

    fn resolved(entries: Vec<(ParameterReference, ParameterType)>) -> ResolutionMap {
        entries
            .into_iter()
            .map(|(reference, parameter_type)| {
                let info = ParameterInfo::new(
                    reference.name(),
                    parameter_type,
                    format!("value_{}", reference.name()),
                );
                (reference, info)
            })
            .collect()
    }

    #[test]
    fn test_not_found_policy_parsing() {
        assert_eq!(
            "FailOnParameterNotFound".parse::<NotFoundPolicy>().unwrap(),
            NotFoundPolicy::Fail
        );
        assert_eq!(
            "ignoreparameternotfound".parse::<NotFoundPolicy>().unwrap(),
            NotFoundPolicy::Ignore
        );
        assert_eq!("ignore".parse::<NotFoundPolicy>().unwrap(), NotFoundPolicy::Ignore);
        assert!("sometimes".parse::<NotFoundPolicy>().is_err());
    }

    #[test]
    fn test_secure_policy_parsing() {
        assert_eq!(
            "reject".parse::<SecureReferencePolicy>().unwrap(),
            SecureReferencePolicy::Reject
        );
        assert_eq!(
            "Skip".parse::<SecureReferencePolicy>().unwrap(),
            SecureReferencePolicy::Skip
        );
        assert!("maybe".parse::<SecureReferencePolicy>().is_err());
    }

    #[test]
    fn test_defaults() {
        let options = ResolveOptions::default();
        assert!(!options.ignore_secure_parameters);
        assert_eq!(options.secure_policy, SecureReferencePolicy::Skip);
        assert_eq!(options.not_found_policy, NotFoundPolicy::Fail);
        assert_eq!(options.output_encoding, OutputEncoding::Text);
    }

    #[test]
    fn test_select_references_keeps_all_by_default() {
        let refs = vec![ParameterReference::plain("a"), ParameterReference::secure("b")];
        let selected = select_references(refs.clone(), &ResolveOptions::default()).unwrap();
        assert_eq!(selected, refs);
    }

    #[test]
    fn test_select_references_skips_secure() {
        let refs = vec![ParameterReference::plain("a"), ParameterReference::secure("b")];
        let options = ResolveOptions::default().with_ignore_secure_parameters(true);

        let selected = select_references(refs, &options).unwrap();

        assert_eq!(selected, vec![ParameterReference::plain("a")]);
    }

    #[test]
    fn test_select_references_rejects_secure() {
        let refs = vec![
            ParameterReference::plain("a"),
            ParameterReference::secure("z"),
            ParameterReference::secure("b"),
        ];
        let options = ResolveOptions::default()
            .with_ignore_secure_parameters(true)
            .with_secure_policy(SecureReferencePolicy::Reject);

        let err = select_references(refs, &options).unwrap_err();

        match err {
            ResolveError::SecureReferencesRejected(refs) => {
                assert_eq!(refs, vec!["ssm-secure:b", "ssm-secure:z"])
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_prefixes_accepts_matching_types() {
        let map = resolved(vec![
            (ParameterReference::plain("a"), ParameterType::String),
            (ParameterReference::plain("l"), ParameterType::StringList),
            (ParameterReference::secure("b"), ParameterType::SecureString),
        ]);
        assert!(validate_prefixes(&map).is_ok());
    }

    #[test]
    fn test_secure_prefix_with_string_type_is_violation() {
        let map = resolved(vec![(ParameterReference::secure("b"), ParameterType::String)]);

        let err = validate_prefixes(&map).unwrap_err();

        match err {
            ResolveError::PolicyViolation(violations) => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].contains("{{ssm-secure:b}}"));
                assert!(violations[0].contains("non-secure type String"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_plain_prefix_with_secure_type_is_violation() {
        let map = resolved(vec![
            (ParameterReference::plain("a"), ParameterType::String),
            (ParameterReference::plain("param2"), ParameterType::SecureString),
        ]);

        let err = validate_prefixes(&map).unwrap_err();

        assert!(matches!(err, ResolveError::PolicyViolation(v) if v.len() == 1 && v[0].contains("{{ssm:param2}}")));
    }

    #[test]
    fn test_secure_prefix_with_unknown_type_is_violation() {
        let map = resolved(vec![(
            ParameterReference::secure("c"),
            ParameterType::Other("Custom".to_string()),
        )]);
        assert!(validate_prefixes(&map).is_err());
    }

    #[test]
    fn test_all_violations_reported_in_order() {
        let map = resolved(vec![
            (ParameterReference::secure("z"), ParameterType::String),
            (ParameterReference::plain("y"), ParameterType::SecureString),
            (ParameterReference::plain("a"), ParameterType::SecureString),
        ]);

        let err = validate_prefixes(&map).unwrap_err();

        match err {
            ResolveError::PolicyViolation(violations) => {
                assert_eq!(violations.len(), 3);
                assert!(violations[0].contains("{{ssm-secure:z}}"));
                assert!(violations[1].contains("{{ssm:a}}"));
                assert!(violations[2].contains("{{ssm:y}}"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_violations_and_not_found_share_ordering() {
        let missing = vec![
            ParameterReference::plain("b/c"),
            ParameterReference::plain("b"),
            ParameterReference::secure("b"),
        ];
        let not_found = match check_not_found(&missing, &ResolveOptions::default()) {
            Err(ResolveError::NotFound(refs)) => refs,
            other => panic!("unexpected result: {other:?}"),
        };

        let map = resolved(vec![
            (ParameterReference::plain("b/c"), ParameterType::SecureString),
            (ParameterReference::plain("b"), ParameterType::SecureString),
            (ParameterReference::secure("b"), ParameterType::String),
        ]);
        let violations = match validate_prefixes(&map) {
            Err(ResolveError::PolicyViolation(v)) => v,
            other => panic!("unexpected result: {other:?}"),
        };

        assert_eq!(not_found, vec!["ssm-secure:b", "ssm:b", "ssm:b/c"]);
        assert_eq!(violations.len(), not_found.len());
        for (violation, reference) in violations.iter().zip(&not_found) {
            assert!(violation.contains(&format!("{{{{{}}}}}", reference)));
        }
    }

    #[test]
    fn test_exclude_secure_only_when_ignoring() {
        let map = resolved(vec![
            (ParameterReference::plain("a"), ParameterType::String),
            (ParameterReference::secure("b"), ParameterType::SecureString),
        ]);

        let kept = exclude_secure(map.clone(), &ResolveOptions::default());
        assert_eq!(kept.len(), 2);

        let options = ResolveOptions::default().with_ignore_secure_parameters(true);
        let filtered = exclude_secure(map, &options);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains_key(&ParameterReference::plain("a")));
    }

    #[test]
    fn test_check_not_found_policies() {
        let missing = vec![ParameterReference::plain("x")];

        let err = check_not_found(&missing, &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(refs) if refs == vec!["ssm:x".to_string()]));

        let options = ResolveOptions::default().with_not_found_policy(NotFoundPolicy::Ignore);
        assert!(check_not_found(&missing, &options).is_ok());
        assert!(check_not_found(&[], &ResolveOptions::default()).is_ok());
    }

    #[test]
    fn test_apply_checks_prefixes_before_excluding() {
        let outcome = FetchOutcome {
            resolved: resolved(vec![(ParameterReference::secure("b"), ParameterType::String)]),
            not_found: Vec::new(),
        };
        let options = ResolveOptions::default().with_ignore_secure_parameters(true);

        assert!(matches!(
            apply(outcome, &options),
            Err(ResolveError::PolicyViolation(_))
        ));
    }
}
