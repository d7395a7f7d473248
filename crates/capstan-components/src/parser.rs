//! Multi-document YAML parsing and rendering

use serde::Deserialize;
use serde_yaml::Value;

use crate::document::ManifestDocument;
use crate::error::{ComponentsError, Result};

/// Parse multi-document YAML text into manifest documents
///
/// Empty documents (e.g. a leading `---` or comment-only sections) are
/// skipped. Any malformed document aborts the whole parse.
pub fn parse_documents(text: &str) -> Result<Vec<ManifestDocument>> {
    let mut documents = Vec::new();

    for (index, de) in serde_yaml::Deserializer::from_str(text).enumerate() {
        let value = Value::deserialize(de).map_err(|e| ComponentsError::Parse {
            index,
            message: e.to_string(),
        })?;

        if value.is_null() {
            continue;
        }

        let document = ManifestDocument::from_value(value).map_err(|e| ComponentsError::Parse {
            index,
            message: e.to_string(),
        })?;
        documents.push(document);
    }

    Ok(documents)
}

/// Render documents as multi-document YAML text
pub fn render_documents(documents: &[ManifestDocument]) -> Result<String> {
    let rendered = documents
        .iter()
        .map(|doc| serde_yaml::to_string(&doc.to_value()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rendered.join("---\n"))
}
