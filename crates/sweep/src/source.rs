//! Interval source contract.
//!
//! The sweep does not own the structure that stores decorations against
//! buffer positions. It consumes an [`IntervalSource`] that is positioned once
//! per render pass and then only moves forward.

use std::sync::Arc;

use crate::highlight::HlId;
use crate::pos::Pos;
use crate::range::{DEFAULT_PRIORITY, DecorData, Priority, SignHighlight, VirtLines, VirtText};

/// A decoration range as supplied by an [`IntervalSource`] or a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRange {
	pub start: Pos,
	pub end: Pos,
	pub priority: Priority,
	pub data: DecorData,
	/// Ephemeral record owned by the sweep rather than by external storage.
	pub owned: bool,
}

impl SourceRange {
	pub fn new(start: Pos, end: Pos, data: DecorData) -> Self {
		Self {
			start,
			end,
			priority: DEFAULT_PRIORITY,
			data,
			owned: false,
		}
	}

	/// Plain highlight over `[start, end)`.
	pub fn highlight(start: Pos, end: Pos, hl_id: HlId) -> Self {
		Self::new(start, end, DecorData::Highlight(SignHighlight::hl(hl_id)))
	}

	/// Sign anchored at the start of `row`.
	pub fn sign(row: u32, sign: SignHighlight) -> Self {
		let at = Pos::row_start(row);
		Self::new(at, at, DecorData::Sign(sign))
	}

	/// Virtual text anchored at `at`.
	pub fn virt_text(at: Pos, vt: VirtText) -> Self {
		Self::new(at, at, DecorData::VirtText(Arc::new(vt)))
	}

	/// Virtual lines anchored at `row`.
	pub fn virt_lines(row: u32, lines: VirtLines) -> Self {
		let at = Pos::row_start(row);
		Self::new(at, at, DecorData::VirtLines(Arc::new(lines)))
	}

	pub fn with_priority(mut self, priority: Priority) -> Self {
		self.priority = priority;
		self
	}

	pub fn owned(mut self) -> Self {
		self.owned = true;
		self
	}

	/// First position past the range, treating zero-width ranges as covering
	/// their start column.
	pub fn effective_end(&self) -> Pos {
		if self.end <= self.start { self.start.next_col() } else { self.end }
	}
}

/// Supplies raw decoration ranges row by row.
pub trait IntervalSource {
	/// Positions the source at the start of `row` and yields every range that
	/// begins before `row` and still covers part of it.
	fn seek(&mut self, row: u32, out: &mut Vec<SourceRange>);

	/// Yields every range whose start row is at or before `row` and that has
	/// not been yielded since the last [`seek`](Self::seek).
	///
	/// Rows passed to successive calls never decrease.
	fn advance(&mut self, row: u32, out: &mut Vec<SourceRange>);
}

/// [`IntervalSource`] over a vector of ranges sorted by start position.
#[derive(Debug, Clone, Default)]
pub struct SortedIntervals {
	ranges: Vec<SourceRange>,
	cursor: usize,
}

impl SortedIntervals {
	pub fn new(mut ranges: Vec<SourceRange>) -> Self {
		ranges.sort_by_key(|r| r.start);
		Self { ranges, cursor: 0 }
	}

	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}
}

impl FromIterator<SourceRange> for SortedIntervals {
	fn from_iter<I: IntoIterator<Item = SourceRange>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

impl IntervalSource for SortedIntervals {
	fn seek(&mut self, row: u32, out: &mut Vec<SourceRange>) {
		let row_start = Pos::row_start(row);
		self.cursor = self.ranges.partition_point(|r| r.start < row_start);
		out.extend(
			self.ranges[..self.cursor]
				.iter()
				.filter(|r| r.effective_end() > row_start)
				.cloned(),
		);
	}

	fn advance(&mut self, row: u32, out: &mut Vec<SourceRange>) {
		let rest = &self.ranges[self.cursor..];
		let n = rest.partition_point(|r| r.start.row <= row);
		out.extend_from_slice(&rest[..n]);
		self.cursor += n;
	}
}
