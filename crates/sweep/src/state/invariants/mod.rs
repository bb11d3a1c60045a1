//! Consistency checks over the arena, the range index and the scan position.

use std::cmp::Ordering;

use thiserror::Error;

use super::DecorState;
use crate::partition::{cmp_current, cmp_future};
use crate::pos::Pos;

mod catalog;

/// A broken sweep invariant. Always a bug in the sweep or a caller contract
/// violation, never a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
	#[error("range index references a free slot")]
	DanglingSlot,
	#[error("active range {start:?}..{end:?} does not cover scan position {pos:?}")]
	ActiveNotCovering { start: Pos, end: Pos, pos: Pos },
	#[error("pending range starting at {start:?} was not promoted at scan position {pos:?}")]
	PendingStarted { start: Pos, pos: Pos },
	#[error("active zone out of layering order at index {at}")]
	ActiveUnordered { at: usize },
	#[error("pending zone out of start order at index {at}")]
	PendingUnordered { at: usize },
	#[error("parked range is not a row-scoped range reaching row {row}")]
	ParkedForeign { row: u32 },
	#[error("{live} live slots but {referenced} referenced ranges")]
	LiveCountMismatch { live: usize, referenced: usize },
	#[error("free list does not cover every free slot")]
	FreeChainBroken,
}

impl DecorState {
	/// Checks the partition, ordering and arena invariants.
	///
	/// Positional checks apply once a column of the current row has been
	/// decided; they hold after every [`redraw_col`](Self::redraw_col).
	pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
		let current = self.index.current();
		let future = self.index.future();

		let mut ranges = Vec::with_capacity(current.len() + future.len());
		for id in self.index.iter().chain(self.parked.iter().copied()) {
			ranges.push(self.arena.get(id).ok_or(InvariantViolation::DanglingSlot)?);
		}
		let (active, rest) = ranges.split_at(current.len());
		let (pending, parked) = rest.split_at(future.len());

		if let Some(at) = active
			.windows(2)
			.position(|w| cmp_current(w[0], w[1]) != Ordering::Less)
		{
			return Err(InvariantViolation::ActiveUnordered { at });
		}
		if let Some(at) = pending.windows(2).position(|w| cmp_future(w[0], w[1]) != Ordering::Less) {
			return Err(InvariantViolation::PendingUnordered { at });
		}

		if let (Some(row), Some(col)) = (self.row, self.last_col) {
			let pos = Pos::new(row, col);
			if let Some(r) = active.iter().find(|r| !r.covers(pos)) {
				return Err(InvariantViolation::ActiveNotCovering {
					start: r.start,
					end: r.end,
					pos,
				});
			}
			if let Some(r) = pending.iter().find(|r| r.start <= pos) {
				return Err(InvariantViolation::PendingStarted { start: r.start, pos });
			}
			if parked.iter().any(|r| !r.is_row_scoped() || !r.reaches_row(row)) {
				return Err(InvariantViolation::ParkedForeign { row });
			}
		}

		if self.arena.live_count() != ranges.len() {
			return Err(InvariantViolation::LiveCountMismatch {
				live: self.arena.live_count(),
				referenced: ranges.len(),
			});
		}
		if !self.arena.free_chain_complete() {
			return Err(InvariantViolation::FreeChainBroken);
		}
		Ok(())
	}

	/// Asserts [`check_invariants`](Self::check_invariants) in debug builds.
	#[cfg(debug_assertions)]
	pub fn debug_assert_valid_state(&self) {
		if let Err(violation) = self.check_invariants() {
			panic!("decoration sweep invariant violated: {violation}; state={self:?}");
		}
	}

	/// No-op in release builds.
	#[cfg(not(debug_assertions))]
	#[inline]
	pub fn debug_assert_valid_state(&self) {}
}
