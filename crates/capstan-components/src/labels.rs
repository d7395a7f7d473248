//! Provenance labeling

use capstan_core::provider_labels;

use crate::document::ManifestDocument;

/// Stamp every document with the provider's provenance labels
pub fn add_labels(documents: &mut [ManifestDocument], provider_name: &str) {
    let labels = provider_labels(provider_name);
    for doc in documents.iter_mut() {
        doc.merge_labels(&labels);
    }
}
