//! Error types for the sweep.

use thiserror::Error;

/// Errors surfaced by the sweep's checked entry points.
///
/// Contract violations by the caller (rows or columns moving backward,
/// inverted ranges) are not represented here; they trip debug assertions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SweepError {
	/// A decoration provider was invoked while another one was running.
	#[error("decoration provider re-entered while handling row {row}")]
	ProviderReentered {
		/// Row the running provider was invoked for.
		row: u32,
	},

	/// The pass admitted more ranges than the configured limit.
	#[error("decoration range limit of {limit} reached for this render pass")]
	Exhausted {
		/// Configured `max_ranges_per_pass`.
		limit: usize,
	},

	/// A sweep operation needs a line that has not been started.
	#[error("no line is being drawn; call redraw_line first")]
	NoActiveLine,
}

/// Result type for sweep operations.
pub type Result<T> = std::result::Result<T, SweepError>;
