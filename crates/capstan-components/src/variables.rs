//! `${VARIABLE}` placeholder scanning and substitution

use capstan_core::VariablesSource;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ComponentsError, Result};

/// Placeholder syntax; whitespace inside the braces is tolerated
static VARIABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{\s*([A-Z0-9_]+)\s*\}").expect("valid regex"));

/// Find the distinct placeholder names referenced in `text`, sorted
pub fn inspect_variables(text: &str) -> Vec<String> {
    VARIABLE_RE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Substitute every placeholder for `variables` with its value from `source`
///
/// All names without a value are reported together. Substitution happens in
/// a single pass, so values that themselves look like placeholders are kept
/// literally.
pub fn replace_variables(
    text: &str,
    variables: &[String],
    source: &dyn VariablesSource,
) -> Result<String> {
    let mut values = BTreeMap::new();
    let mut missing = Vec::new();

    for name in variables {
        match source.get(name) {
            Some(value) => {
                values.insert(name.as_str(), value);
            }
            None => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(ComponentsError::MissingVariables { names: missing });
    }

    let replaced = VARIABLE_RE.replace_all(text, |caps: &Captures| {
        values
            .get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    });

    Ok(replaced.into_owned())
}
