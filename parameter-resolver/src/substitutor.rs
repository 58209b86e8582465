use regex::Captures;

use crate::domain::{ParameterReference, ResolutionMap};
use crate::encoding::OutputEncoding;
use crate::matcher::any_placeholder;

/// Replaces every placeholder whose reference is in `resolved` with its
/// encoded value.
///
/// Runs as a single pass over the input, so inserted values are never scanned
/// for placeholders. Placeholders without an entry are kept byte-for-byte.
pub fn substitute(text: &str, resolved: &ResolutionMap, encoding: OutputEncoding) -> String {
    if resolved.is_empty() {
        return text.to_string();
    }

    any_placeholder()
        .replace_all(text, |caps: &Captures| {
            let placeholder = &caps[0];
            match ParameterReference::parse(&caps[1]) {
                Ok(reference) => match resolved.get(&reference) {
                    Some(info) => encoding.encode(info.value()).to_string(),
                    None => placeholder.to_string(),
                },
                Err(_) => placeholder.to_string(),
            }
        })
        .into_owned()
}
