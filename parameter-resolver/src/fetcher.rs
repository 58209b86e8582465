use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::{ParameterReference, ResolutionMap};
use crate::store::{ParameterStore, StoreError};

/// Per-call limit of the Parameter Store `GetParameters` API.
pub const MAX_PARAMETERS_PER_REQUEST: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub resolved: ResolutionMap,
    /// References the store could not resolve, sorted.
    pub not_found: Vec<ParameterReference>,
}

/// Resolves `references` against `store` in batches of at most
/// [`MAX_PARAMETERS_PER_REQUEST`] names, one batch at a time.
///
/// A store failure aborts the whole fetch and no partial result is returned.
pub async fn fetch_parameters(
    store: &dyn ParameterStore,
    references: &[ParameterReference],
) -> Result<FetchOutcome, StoreError> {
    // `ssm:x` and `ssm-secure:x` share a single lookup of `x`.
    let mut references_by_name: BTreeMap<&str, Vec<&ParameterReference>> = BTreeMap::new();
    for reference in references {
        references_by_name
            .entry(reference.name())
            .or_default()
            .push(reference);
    }

    let names: Vec<String> = references_by_name.keys().map(|n| n.to_string()).collect();
    let mut outcome = FetchOutcome::default();

    for (index, batch) in names.chunks(MAX_PARAMETERS_PER_REQUEST).enumerate() {
        debug!(
            batch = index + 1,
            size = batch.len(),
            "Fetching parameter batch"
        );

        let mut fetched = store.get_parameters(batch, true).await?;

        for name in batch {
            let Some(requested_by) = references_by_name.get(name.as_str()) else {
                continue;
            };
            match fetched.parameters.remove(name) {
                Some(info) => {
                    for reference in requested_by {
                        outcome.resolved.insert((*reference).clone(), info.clone());
                    }
                }
                None => {
                    if !fetched.invalid_parameters.contains(name) {
                        warn!(
                            name = name.as_str(),
                            "Parameter neither returned nor reported invalid by the store"
                        );
                    }
                    outcome
                        .not_found
                        .extend(requested_by.iter().map(|r| (*r).clone()));
                }
            }
        }

        if !fetched.parameters.is_empty() {
            warn!(
                count = fetched.parameters.len(),
                "Store returned parameters that were not requested, ignoring them"
            );
        }
    }

    outcome.not_found.sort();
    Ok(outcome)
}
