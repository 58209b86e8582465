use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    dedup::dedup_references,
    domain::{ParameterReference, ResolutionMap},
    error::{InputError, ResolveError},
    fetcher::fetch_parameters,
    files, matcher, policy,
    policy::ResolveOptions,
    store::ParameterStore,
    substitutor::substitute,
};

/// Resolves `{{ssm:...}}` and `{{ssm-secure:...}}` placeholders against a
/// parameter store.
#[derive(Clone)]
pub struct ParameterResolver {
    store: Arc<dyn ParameterStore>,
    options: ResolveOptions,
}

impl ParameterResolver {
    pub fn new(store: Arc<dyn ParameterStore>, options: ResolveOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolves every parameter referenced in `text`, keyed by reference.
    pub async fn extract_parameters_from_text(
        &self,
        text: &str,
    ) -> Result<ResolutionMap, ResolveError> {
        let references = matcher::references(text, true);
        debug!(count = references.len(), "Found parameter references in text");
        self.resolve(references).await
    }

    /// Resolves an explicit list of references such as `ssm:/a/b` or
    /// `ssm-secure:password`. Duplicates are resolved once.
    pub async fn resolve_parameter_reference_list<S: AsRef<str>>(
        &self,
        references: &[S],
    ) -> Result<ResolutionMap, ResolveError> {
        let references = references
            .iter()
            .map(|r| ParameterReference::parse(r.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.resolve(dedup_references(references)).await
    }

    /// Returns `text` with every resolvable placeholder replaced.
    pub async fn resolve_parameters_in_text(&self, text: &str) -> Result<String, ResolveError> {
        let resolved = self.extract_parameters_from_text(text).await?;
        Ok(substitute(text, &resolved, self.options.output_encoding))
    }

    /// Resolves the document at `input_file` into `output_file` and returns the
    /// parameters that were substituted.
    ///
    /// The input is validated before the store is contacted and nothing is
    /// written when resolution fails.
    pub async fn resolve_parameters_in_file(
        &self,
        input_file: &str,
        output_file: &str,
    ) -> Result<ResolutionMap, ResolveError> {
        if input_file.is_empty() {
            return Err(InputError::MissingInputFile.into());
        }
        if output_file.is_empty() {
            return Err(InputError::MissingOutputFile.into());
        }

        files::validate_file_and_size(input_file)?;
        let unresolved = files::read_text_from_file(input_file)?;

        let resolved = self.extract_parameters_from_text(&unresolved).await?;
        let document = substitute(&unresolved, &resolved, self.options.output_encoding);

        files::write_to_file(&document, output_file)?;
        info!(
            input = input_file,
            output = output_file,
            count = resolved.len(),
            "Resolved parameters in file"
        );
        Ok(resolved)
    }

    async fn resolve(
        &self,
        references: Vec<ParameterReference>,
    ) -> Result<ResolutionMap, ResolveError> {
        let references = policy::select_references(references, &self.options)?;
        if references.is_empty() {
            return Ok(ResolutionMap::new());
        }

        let outcome = fetch_parameters(self.store.as_ref(), &references).await?;
        policy::apply(outcome, &self.options)
    }
}

impl std::fmt::Debug for ParameterResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterResolver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
