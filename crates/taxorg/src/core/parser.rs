//! Parser trait, registry, and dispatch.
//!
//! Each supported document family implements [`DocumentParser`]; variants
//! are explicit types in a static, ordered registry rather than discovered
//! plugins. The dispatcher probes `can_parse` in registry order and hands
//! the document to the first parser that claims it.

use crate::core::config::ExtractionConfig;
use crate::error::{Result, TaxorgError};
use crate::types::ExtractionResult;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;

/// A document-family parser with the narrow `can_parse` / `parse` contract.
///
/// # Contract
///
/// - `can_parse` is a low-cost heuristic over a bounded page prefix. It must
///   never panic or error; internal failures are swallowed and yield `false`.
/// - `parse` must never fail for a readable document. A completely
///   unreadable input still yields an [`ExtractionResult`] carrying a single
///   `"unreadable document"` error record. Best-effort data plus a full
///   error ledger, never an error to the caller.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Unique parser name, e.g. `"tax-organizer"`.
    fn name(&self) -> &str;

    /// Cheap probe: does this parser recognize the document?
    fn can_parse(&self, content: &[u8]) -> bool;

    /// Run the full extraction pipeline.
    async fn parse(&self, content: &[u8], config: &ExtractionConfig) -> ExtractionResult;
}

/// Static parser registry, probed in order.
static PARSERS: Lazy<Vec<Arc<dyn DocumentParser>>> =
    Lazy::new(|| vec![Arc::new(crate::organizer::OrganizerParser::new())]);

/// Global runtime backing the synchronous wrappers.
///
/// Runtime creation only fails on system resource exhaustion; failing fast
/// there beats returning errors from every sync call.
static GLOBAL_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create global Tokio runtime - system may be out of resources")
});

/// Find the first registered parser that claims the document.
pub fn find_parser(content: &[u8]) -> Option<Arc<dyn DocumentParser>> {
    PARSERS.iter().find(|p| p.can_parse(content)).cloned()
}

/// Whether any registered parser claims the document.
pub fn can_parse_bytes(content: &[u8]) -> bool {
    find_parser(content).is_some()
}

/// Dispatch the document to the first parser that claims it.
///
/// # Errors
///
/// `UnsupportedFormat` when no registered parser claims the document. The
/// selected parser itself never fails; degradation is recorded inside the
/// returned result.
pub async fn parse_bytes(content: &[u8], config: &ExtractionConfig) -> Result<ExtractionResult> {
    let parser = find_parser(content).ok_or_else(|| {
        TaxorgError::UnsupportedFormat("no registered parser recognizes this document".to_string())
    })?;

    tracing::debug!(parser = parser.name(), bytes = content.len(), "dispatching document");
    Ok(parser.parse(content, config).await)
}

/// Read a file and dispatch it through [`parse_bytes`].
pub async fn parse_file(path: impl AsRef<Path>, config: &ExtractionConfig) -> Result<ExtractionResult> {
    let content = tokio::fs::read(path.as_ref()).await?;
    parse_bytes(&content, config).await
}

/// Synchronous wrapper for [`parse_bytes`].
pub fn parse_bytes_sync(content: &[u8], config: &ExtractionConfig) -> Result<ExtractionResult> {
    GLOBAL_RUNTIME.block_on(parse_bytes(content, config))
}

/// Synchronous wrapper for [`parse_file`].
pub fn parse_file_sync(path: impl AsRef<Path>, config: &ExtractionConfig) -> Result<ExtractionResult> {
    GLOBAL_RUNTIME.block_on(parse_file(path, config))
}
