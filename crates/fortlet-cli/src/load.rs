//! Loading a syntax tree produced by an external front end.

use anyhow::{bail, Context, Result};
use fortlet_ast::ast::Program;

/// Maximum tree file size in bytes (1MB)
pub const MAX_SOURCE_SIZE: usize = 1_000_000;

/// Parse a JSON syntax tree.
pub fn parse_tree(src: &str) -> Result<Program> {
    if src.len() > MAX_SOURCE_SIZE {
        bail!(
            "syntax tree exceeds {}MB limit ({} bytes)",
            MAX_SOURCE_SIZE / 1_000_000,
            src.len()
        );
    }
    serde_json::from_str(src).context("malformed syntax tree")
}

/// Read and parse a JSON syntax tree from `path`.
pub fn load_tree(path: &str) -> Result<Program> {
    let src = std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))?;
    let tree = parse_tree(&src).with_context(|| format!("in `{path}`"))?;
    tracing::debug!(path, methods = tree.methods.len(), fields = tree.fields.len(), "loaded tree");
    Ok(tree)
}
