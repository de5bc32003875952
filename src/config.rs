//! Process-wide tool identification, read once and immutable thereafter.
//!
//! UMBI stamps `tool`, `tool-version`, `format-version` and
//! `format-revision` into `file-data` on every write (see
//! `index::FileData`). By default these come from this crate's own
//! `CARGO_PKG_NAME`/`CARGO_PKG_VERSION`; an embedder can stamp its own name
//! once at startup via [`set_tool_info`].

use std::sync::OnceLock;

pub const FORMAT_VERSION: u64 = 1;
pub const FORMAT_REVISION: u64 = 0;

#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub toolname: String,
    pub version: String,
}

static TOOL_INFO: OnceLock<ToolInfo> = OnceLock::new();

/// Set the process-wide tool identity. Must be called before the first call
/// to [`tool_info`]; later calls after the default has latched are no-ops.
pub fn set_tool_info(toolname: impl Into<String>, version: impl Into<String>) {
    let _ = TOOL_INFO.set(ToolInfo {
        toolname: toolname.into(),
        version: version.into(),
    });
}

/// The process-wide tool identity, defaulting to this crate's own name and
/// version the first time it is read.
pub fn tool_info() -> &'static ToolInfo {
    TOOL_INFO.get_or_init(|| ToolInfo {
        toolname: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
