//! Render-pass state and the sweep driver.
//!
//! A [`DecorState`] is driven by the renderer through one pass:
//!
//! 1. [`start`](DecorState::start) installs the interval source at the top row.
//! 2. [`redraw_line`](DecorState::redraw_line) for each drawn row, in order.
//! 3. [`redraw_col`](DecorState::redraw_col) for columns of that row, never
//!    moving left, then [`redraw_eol`](DecorState::redraw_eol).
//! 4. [`finish`](DecorState::finish) releases everything.
//!
//! Row-scoped ranges (virtual text, virtual lines, signs and UI-watched marks)
//! stay reachable for the rest of the row their span ends on, so the renderer
//! can still position or collect them after the sweep has passed. They leave
//! the active zone like any other range and are parked until the next row
//! begins.

use std::mem;

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::arena::{RangeHandle, SlotArena, SlotId};
use crate::config::SweepConfig;
use crate::error::{Result, SweepError};
use crate::highlight::{AttrId, HighlightResolver};
use crate::partition::{RangeIndex, cmp_current};
use crate::pos::{MAXCOL, Pos};
use crate::provider::{DecorProvider, ProviderSink};
use crate::range::{DecorData, DecorFlags, DecorKind, DecorRange, DrawCol, VirtTextPos};
use crate::source::{IntervalSource, SourceRange};

mod column;
mod invariants;

pub use column::{ColumnDecor, Conceal, TriState};
use column::ColumnCache;
pub use invariants::InvariantViolation;

/// Handles collected for one row, top layer first.
pub type RowHandles = SmallVec<[RangeHandle; 4]>;

/// Decoration state for one render pass.
pub struct DecorState {
	config: SweepConfig,
	arena: SlotArena,
	index: RangeIndex,
	/// Row-scoped ranges whose span ended on the current row.
	parked: Vec<SlotId>,
	source: Option<Box<dyn IntervalSource>>,
	pulled: Vec<SourceRange>,
	expired: Vec<SlotId>,
	top_row: Option<u32>,
	row: Option<u32>,
	last_col: Option<u32>,
	cache: ColumnCache,
	eol_col: Option<u32>,
	/// Never reset, so handles from earlier passes cannot match new ranges.
	new_range_ordering: u64,
	admitted: usize,
	running_decor_provider: bool,
}

impl Default for DecorState {
	fn default() -> Self {
		Self::new(SweepConfig::default())
	}
}

impl std::fmt::Debug for DecorState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DecorState")
			.field("top_row", &self.top_row)
			.field("row", &self.row)
			.field("col_until", &self.cache.col_until())
			.field("active", &self.index.current().len())
			.field("pending", &self.index.future().len())
			.field("parked", &self.parked.len())
			.field("slots", &self.arena.len())
			.finish_non_exhaustive()
	}
}

impl DecorState {
	pub fn new(config: SweepConfig) -> Self {
		let capacity = config.initial_capacity;
		Self {
			config,
			arena: SlotArena::with_capacity(capacity),
			index: RangeIndex::with_capacity(capacity),
			parked: Vec::new(),
			source: None,
			pulled: Vec::new(),
			expired: Vec::new(),
			top_row: None,
			row: None,
			last_col: None,
			cache: ColumnCache::default(),
			eol_col: None,
			new_range_ordering: 0,
			admitted: 0,
			running_decor_provider: false,
		}
	}

	pub fn config(&self) -> &SweepConfig {
		&self.config
	}

	/// Empties the state for a new render pass.
	///
	/// Every slot is released and the source dropped; allocations are kept.
	pub fn reset(&mut self) {
		debug_assert!(!self.running_decor_provider, "render pass reset from inside a decoration provider");
		self.release_all();
		self.source = None;
		self.top_row = None;
		self.admitted = 0;
	}

	/// Begins a render pass at `top_row`, pulling every range from `source`
	/// that reaches into that row.
	pub fn start(&mut self, source: Box<dyn IntervalSource>, top_row: u32) -> Result<()> {
		self.reset();
		self.top_row = Some(top_row);
		self.source = Some(source);

		let mut pulled = mem::take(&mut self.pulled);
		if let Some(source) = self.source.as_mut() {
			source.seek(top_row, &mut pulled);
		}
		let count = pulled.len();
		let result = pulled.drain(..).try_for_each(|range| self.admit(range).map(drop));
		self.pulled = pulled;
		result?;

		trace!(top_row, ranges = count, "decor pass start");
		Ok(())
	}

	/// Moves the sweep to `row`.
	///
	/// Rows must increase within a pass. Ranges starting in `row`, or in rows
	/// skipped since the last call, are pulled from the source. Ranges that
	/// ended before `row` are dropped without being admitted.
	pub fn redraw_line(&mut self, row: u32) -> Result<()> {
		debug_assert!(self.row.is_none_or(|prev| row > prev), "rows must increase: {:?} -> {row}", self.row);
		debug_assert!(self.top_row.is_none_or(|top| row >= top), "row {row} above top row {:?}", self.top_row);

		for id in mem::take(&mut self.parked) {
			self.arena.free(id);
		}
		self.row = Some(row);
		self.last_col = None;
		self.eol_col = None;
		self.cache = ColumnCache::default();

		let row_start = Pos::row_start(row);
		let mut pulled = mem::take(&mut self.pulled);
		if let Some(source) = self.source.as_mut() {
			source.advance(row, &mut pulled);
		}
		let count = pulled.len();
		let result = pulled
			.drain(..)
			.filter(|range| range.effective_end() > row_start)
			.try_for_each(|range| self.admit(range).map(drop));
		self.pulled = pulled;
		result?;

		trace!(row, pulled = count, active = self.index.current().len(), "decor line");
		Ok(())
	}

	/// Admits one range mid-pass.
	pub fn add_range(&mut self, range: SourceRange) -> Result<RangeHandle> {
		let id = self.admit(range)?;
		Ok(self.arena.handle(id))
	}

	fn admit(&mut self, range: SourceRange) -> Result<SlotId> {
		if let Some(limit) = self.config.range_limit()
			&& self.admitted >= limit
		{
			debug!(limit, row = ?self.row, "decoration range limit reached");
			return Err(SweepError::Exhausted { limit });
		}
		debug_assert!(range.start <= range.end, "inverted decoration range {:?}..{:?}", range.start, range.end);

		let ordering = self.new_range_ordering;
		self.new_range_ordering += 1;
		self.admitted += 1;

		let id = self.arena.alloc(DecorRange {
			start: range.start,
			end: range.end,
			ordering,
			priority: range.priority,
			owned: range.owned,
			data: range.data,
			attr_id: None,
			draw_col: DrawCol::Unpositioned,
		});
		self.index.push_future(id, &self.arena);
		self.cache.invalidate();
		Ok(id)
	}

	/// Invokes `provider` for the current row and admits what it adds.
	///
	/// Returns the number of ranges the provider added. Fails if no line is
	/// being drawn. Calling it from inside a provider asserts in debug builds
	/// and fails with [`SweepError::ProviderReentered`] otherwise.
	pub fn run_provider(&mut self, provider: &mut dyn DecorProvider) -> Result<usize> {
		let row = self.row.ok_or(SweepError::NoActiveLine)?;
		debug_assert!(!self.running_decor_provider, "decoration provider re-entered on row {row}");
		if self.running_decor_provider {
			warn!(row, "decoration provider re-entered; rejecting nested call");
			return Err(SweepError::ProviderReentered { row });
		}

		self.running_decor_provider = true;
		let mut sink = ProviderSink {
			state: self,
			row,
			added: 0,
		};
		let result = provider.on_line(row, &mut sink);
		let added = sink.added;
		self.running_decor_provider = false;

		trace!(row, added, ok = result.is_ok(), "decoration provider ran");
		result.map(|()| added)
	}

	/// Decides the decoration state at `col` of the current row.
	///
	/// Columns must not decrease within a row. Repeated queries inside a run
	/// with no pending boundary are answered from the column cache.
	pub fn redraw_col(&mut self, col: u32, resolver: &mut dyn HighlightResolver) -> ColumnDecor {
		debug_assert!(self.row.is_some(), "redraw_col({col}) before redraw_line");
		let Some(row) = self.row else {
			return ColumnDecor::default();
		};
		if let Some(hit) = self.cache.lookup(col) {
			return hit;
		}
		debug_assert!(
			self.last_col.is_none_or(|last| col >= last),
			"columns must not decrease: {:?} -> {col}",
			self.last_col
		);
		self.last_col = Some(col);

		let pos = Pos::new(row, col);
		self.advance_to(pos);
		let decor = self.decide(pos, resolver);
		let until = self.run_until(pos, &decor);
		self.cache.store(until, decor);
		self.verify();
		decor
	}

	/// Finishes the current row at `eol_col` and returns the combined
	/// attribute of active highlights that extend past the end of the line.
	pub fn redraw_eol(&mut self, eol_col: u32, resolver: &mut dyn HighlightResolver) -> AttrId {
		self.redraw_col(eol_col, resolver);
		self.eol_col = Some(eol_col);

		let mut attr = AttrId::NONE;
		for &id in self.index.current().iter().rev() {
			let range = self.arena.live_mut(id);
			if range.highlight().is_some_and(|sh| sh.flags.contains(DecorFlags::HL_EOL)) {
				let range_attr = cached_attr(range, resolver);
				if !range_attr.is_none() {
					attr = resolver.combine(attr, range_attr);
				}
			}
		}
		attr
	}

	/// Promotes pending ranges that have started and retires active ranges
	/// that have ended.
	fn advance_to(&mut self, pos: Pos) {
		while let Some(id) = self.index.pop_ready(pos, &self.arena) {
			self.arena.live_mut(id).draw_col = DrawCol::Unpositioned;
			self.index.insert_current(id, &self.arena);
		}

		let arena = &self.arena;
		self.index
			.retain_current(|id| !arena.live(id).expired_at(pos), &mut self.expired);

		let mut expired = mem::take(&mut self.expired);
		for id in expired.drain(..) {
			self.retire(id);
		}
		self.expired = expired;
	}

	fn retire(&mut self, id: SlotId) {
		let range = self.arena.live(id);
		if range.is_row_scoped() && self.row.is_some_and(|row| range.reaches_row(row)) {
			self.parked.push(id);
		} else {
			self.arena.free(id);
		}
	}

	fn decide(&mut self, pos: Pos, resolver: &mut dyn HighlightResolver) -> ColumnDecor {
		let current = self.index.current();
		let mut decor = ColumnDecor::default();
		if let Some(&top) = current.first() {
			decor.winner = Some(self.arena.handle(top));
			decor.winner_kind = Some(self.arena.live(top).kind());
		}

		for &id in current.iter().rev() {
			let range = self.arena.live_mut(id);
			let Some(sh) = range.highlight() else {
				continue;
			};
			let flags = sh.flags;
			let conceal_char = sh.conceal_char;
			let range_attr = cached_attr(range, resolver);
			if !range_attr.is_none() {
				decor.attr = resolver.combine(decor.attr, range_attr);
			}
			if flags.contains(DecorFlags::CONCEAL) {
				decor.conceal = if range.start == pos {
					Conceal::Replace {
						ch: conceal_char,
						attr: range_attr,
					}
				} else {
					Conceal::Hidden
				};
			}
			if flags.contains(DecorFlags::SPELL_ON) {
				decor.spell = TriState::True;
			} else if flags.contains(DecorFlags::SPELL_OFF) {
				decor.spell = TriState::False;
			}
		}
		decor
	}

	/// Last column of the current row on which `decor` stays valid.
	fn run_until(&self, pos: Pos, decor: &ColumnDecor) -> u32 {
		if matches!(decor.conceal, Conceal::Replace { .. }) {
			return pos.col;
		}
		let mut until = MAXCOL;
		if let Some(&next) = self.index.future().first() {
			let start = self.arena.live(next).start;
			if start.row == pos.row {
				until = start.col - 1;
			}
		}
		for &id in self.index.current() {
			let end = self.arena.live(id).effective_end();
			if end.row == pos.row {
				until = until.min(end.col - 1);
			}
		}
		until
	}

	fn verify(&self) {
		if self.config.verify_invariants
			&& let Err(violation) = self.check_invariants()
		{
			panic!("decoration sweep invariant violated: {violation}");
		}
	}

	/// Looks up a range admitted in this pass.
	pub fn range(&self, handle: RangeHandle) -> Option<&DecorRange> {
		self.arena.resolve(handle)
	}

	/// Screen column state of a range, if it is still live.
	pub fn draw_col(&self, handle: RangeHandle) -> Option<DrawCol> {
		self.range(handle).map(|r| r.draw_col)
	}

	/// Records the renderer's positioning decision for a range.
	///
	/// Returns false if the range is no longer live.
	pub fn set_draw_col(&mut self, handle: RangeHandle, draw_col: DrawCol) -> bool {
		match self.arena.resolve_mut(handle) {
			Some(range) => {
				range.draw_col = draw_col;
				true
			}
			None => false,
		}
	}

	/// Active and parked ranges, in layering order, matching `filter`.
	fn row_visible(&self, filter: impl Fn(&DecorRange) -> bool) -> RowHandles {
		let mut ids: SmallVec<[SlotId; 4]> = self
			.index
			.current()
			.iter()
			.chain(&self.parked)
			.copied()
			.filter(|&id| filter(self.arena.live(id)))
			.collect();
		self.sort_layered(&mut ids);
		ids.into_iter().map(|id| self.arena.handle(id)).collect()
	}

	fn sort_layered(&self, ids: &mut [SlotId]) {
		ids.sort_by(|&a, &b| cmp_current(self.arena.live(a), self.arena.live(b)));
	}

	/// Virtual texts visible on the current row, including ones the sweep has
	/// already passed. Suppressed ranges are skipped.
	pub fn row_virt_text(&self) -> RowHandles {
		self.row_visible(|r| r.kind() == DecorKind::VirtText && r.draw_col != DrawCol::Suppressed)
	}

	/// Virtual texts positioned at the end of the current row.
	pub fn eol_virt_text(&self) -> RowHandles {
		self.row_visible(|r| {
			r.virt_text().is_some_and(|vt| vt.pos == VirtTextPos::Eol) && r.draw_col != DrawCol::Suppressed
		})
	}

	/// UI-watched marks visible on the current row.
	pub fn ui_watched(&self) -> RowHandles {
		self.row_visible(|r| r.kind() == DecorKind::UiWatched)
	}

	/// Signs covering `row`, highest priority first.
	///
	/// Only ranges already pulled from the source are considered. For the
	/// current row that is every sign reaching it, before or after the sweep
	/// has passed them.
	pub fn signs_for_row(&self, row: u32) -> RowHandles {
		self.admitted_where(|r| r.kind() == DecorKind::Sign && r.reaches_row(row))
	}

	/// Virtual lines anchored at `row`, highest priority first.
	pub fn virt_lines_for_row(&self, row: u32) -> RowHandles {
		self.admitted_where(|r| matches!(r.data, DecorData::VirtLines(_)) && r.start.row == row)
	}

	fn admitted_where(&self, filter: impl Fn(&DecorRange) -> bool) -> RowHandles {
		let mut ids: SmallVec<[SlotId; 4]> = self
			.index
			.iter()
			.chain(self.parked.iter().copied())
			.filter(|&id| filter(self.arena.live(id)))
			.collect();
		self.sort_layered(&mut ids);
		ids.into_iter().map(|id| self.arena.handle(id)).collect()
	}

	/// Ends the render pass, releasing every range and dropping the source.
	pub fn finish(&mut self) {
		trace!(
			admitted = self.admitted,
			slots = self.arena.len(),
			live = self.arena.live_count(),
			"decor pass finished"
		);
		self.reset();
	}

	fn release_all(&mut self) {
		self.arena.clear();
		self.index.clear();
		self.parked.clear();
		self.pulled.clear();
		self.expired.clear();
		self.row = None;
		self.last_col = None;
		self.eol_col = None;
		self.cache = ColumnCache::default();
	}

	pub fn top_row(&self) -> Option<u32> {
		self.top_row
	}

	/// Row currently being drawn.
	pub fn row(&self) -> Option<u32> {
		self.row
	}

	pub fn eol_col(&self) -> Option<u32> {
		self.eol_col
	}

	/// Last column the cached decision covers, if the cache is valid.
	pub fn col_until(&self) -> Option<u32> {
		self.cache.col_until()
	}

	/// Conceal decision of the last decided column.
	pub fn conceal(&self) -> Conceal {
		self.cache.current().conceal
	}

	/// Spell override of the last decided column.
	pub fn spell(&self) -> TriState {
		self.cache.current().spell
	}

	pub fn is_running_provider(&self) -> bool {
		self.running_decor_provider
	}

	/// Number of active ranges.
	pub fn active_count(&self) -> usize {
		self.index.current().len()
	}

	/// Number of ranges admitted but not yet reached.
	pub fn pending_count(&self) -> usize {
		self.index.future().len()
	}

	/// Number of live slots, including parked ones.
	pub fn live_count(&self) -> usize {
		self.arena.live_count()
	}

	/// Number of slots ever allocated in this pass, live or free.
	pub fn slot_count(&self) -> usize {
		self.arena.len()
	}

	/// Ranges admitted in this pass.
	pub fn admitted(&self) -> usize {
		self.admitted
	}
}

/// Attribute of a highlight range, resolved on first use.
fn cached_attr(range: &mut DecorRange, resolver: &mut dyn HighlightResolver) -> AttrId {
	let Some(hl_id) = range.highlight().map(|sh| sh.hl_id) else {
		return AttrId::NONE;
	};
	if hl_id.is_none() {
		return AttrId::NONE;
	}
	*range.attr_id.get_or_insert_with(|| resolver.resolve(hl_id))
}
