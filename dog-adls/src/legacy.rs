//! One-call document read for agent tooling.

use crate::AdlsConnectionBuilder;

/// Extension used by [`legacy_read`]
pub const LEGACY_EXTENSION: &str = "pdf";

/// Read `quant/{document_key}.pdf` through a fresh connection configured from
/// the process environment.
///
/// Nothing escapes: a connection that cannot be built is logged and reported
/// as `None`, the same as a failed read.
#[cfg(feature = "azure")]
pub async fn legacy_read(document_key: &str) -> Option<String> {
    legacy_read_with(crate::AdlsConnection::builder(), document_key).await
}

/// [`legacy_read`] with caller-supplied collaborators.
///
/// Any config set on `builder` is ignored; configuration always comes from its environment source.
pub async fn legacy_read_with(builder: AdlsConnectionBuilder, document_key: &str) -> Option<String> {
    let connection = match builder.without_config().connect() {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!("Error in legacy function: {}", e);
            return None;
        }
    };

    connection
        .read_blob_content(document_key, LEGACY_EXTENSION)
        .await
}
