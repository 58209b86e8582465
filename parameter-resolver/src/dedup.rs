use std::collections::BTreeSet;

use crate::domain::ParameterReference;

/// Collapses duplicate references. The returned list is sorted.
pub fn dedup_references<I>(references: I) -> Vec<ParameterReference>
where
    I: IntoIterator<Item = ParameterReference>,
{
    references
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
