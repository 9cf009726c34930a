//! Output model naming.

use smallvec::SmallVec;

use crate::{Error, Result};

const SEPARATOR: char = '/';

/// Compose the name of the output model from the source model's name and a
/// prefix, e.g. `("folder/model1", "/bi-ready/")` → `"bi-ready/folder/model1"`.
///
/// Empty segments in the source name are discarded; separators around the
/// prefix are trimmed.
pub fn compose_target_model_name(source_model_name: &str, prefix: &str) -> Result<String> {
    if source_model_name.is_empty() {
        return Err(Error::Validation("Source model name cannot be empty".into()));
    }
    if prefix.is_empty() {
        return Err(Error::Validation("Prefix cannot be empty".into()));
    }

    let prefix = prefix.trim_start_matches(SEPARATOR);
    if prefix.is_empty() {
        return Err(Error::Validation("Prefix cannot be just a forward slash".into()));
    }
    let prefix = prefix.trim_matches(SEPARATOR);

    let segments: SmallVec<[&str; 8]> = source_model_name
        .split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect();

    Ok(format!("{prefix}/{}", segments.join("/")))
}
