//! Shared layout and configuration defaults.

/// Default line-height hint in pixels.
pub const DEFAULT_LINE_HEIGHT: f32 = 18.0;

/// Default code language when a document declares none.
pub const DEFAULT_CODE_LANGUAGE: &str = "python";

/// Default render overscan above and below the viewport, in pixels.
pub const DEFAULT_OVERSCAN_PX: f32 = 200.0;

/// Default bound for blocking waits on document resolution.
pub const DEFAULT_RESOLVE_TIMEOUT_MS: u64 = 5_000;

/// Fixed chrome (padding, toolbar gutter) added around a code cell's editor.
pub const CELL_CHROME_MARGIN: f32 = 16.0;

/// Minimum number of line slots reserved for a code cell estimate.
pub const MIN_CODE_CELL_LINES: usize = 5;

/// Placeholder height for a markdown cell that has not been measured.
pub const MARKDOWN_PLACEHOLDER_HEIGHT: f32 = 100.0;
