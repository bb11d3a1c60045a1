//! Decoration sweep engine.
//!
//! Turns "which decorations cover `(row, col)`?" into an incremental,
//! left-to-right sweep over a render pass. Ranges are pulled row by row from an
//! external [`IntervalSource`], kept in a single index split into an active
//! zone (ordered by layering priority) and a pending zone (ordered by start
//! position), and stored in a slot arena that recycles freed records without
//! reallocating.

/// Slot storage for in-flight decoration ranges.
mod arena;
/// Sweep configuration.
pub mod config;
/// Error types for the sweep.
pub mod error;
/// Highlight attribute resolution.
pub mod highlight;
/// Active/pending partitions over slot references.
mod partition;
/// Buffer positions.
pub mod pos;
/// Decoration provider callbacks and the reentrancy guard.
pub mod provider;
/// Decoration range records and payloads.
pub mod range;
/// Interval source contract and a sorted reference implementation.
pub mod source;
/// Render-pass state and the sweep driver.
pub mod state;

pub use arena::RangeHandle;
pub use config::{ConfigError, SweepConfig};
pub use error::{Result, SweepError};
pub use highlight::{AttrId, HighlightResolver, HlId, IdentityResolver};
pub use pos::{MAXCOL, Pos};
pub use provider::{DecorProvider, ProviderSink};
pub use range::{
	DEFAULT_PRIORITY, DecorData, DecorFlags, DecorKind, DecorRange, DrawCol, HlMode, ParseNameError, Priority,
	SignHighlight, VirtLines, VirtText, VirtTextChunk, VirtTextPos,
};
pub use source::{IntervalSource, SortedIntervals, SourceRange};
pub use state::{ColumnDecor, Conceal, DecorState, InvariantViolation, RowHandles, TriState};
