//! Active and pending zones over one sequence of slot references.
//!
//! ```text
//! [0, current_end)            active, by (priority desc, ordering asc)
//! [current_end, future_begin) slack
//! [future_begin, len)         pending, by (start, priority, ordering)
//! ```
//!
//! Promotion takes the head of the pending zone, which frees one slack cell,
//! and shifts the tail of the active zone right into it. Pending insertions
//! consume slack from the left before growing the sequence.

use std::cmp::{Ordering, Reverse};

use crate::arena::{SlotArena, SlotId};
use crate::pos::Pos;
use crate::range::{DecorRange, Priority};


#[inline]
fn current_key(r: &DecorRange) -> (Reverse<Priority>, u64) {
	(Reverse(r.priority), r.ordering)
}

#[inline]
fn future_key(r: &DecorRange) -> (Pos, Priority, u64) {
	(r.start, r.priority, r.ordering)
}

/// Compares two ranges in active-zone order.
pub(crate) fn cmp_current(a: &DecorRange, b: &DecorRange) -> Ordering {
	current_key(a).cmp(&current_key(b))
}

/// Compares two ranges in pending-zone order.
pub(crate) fn cmp_future(a: &DecorRange, b: &DecorRange) -> Ordering {
	future_key(a).cmp(&future_key(b))
}

#[derive(Debug, Default)]
pub(crate) struct RangeIndex {
	ranges_i: Vec<SlotId>,
	current_end: usize,
	future_begin: usize,
}

impl RangeIndex {
	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Self {
			ranges_i: Vec::with_capacity(capacity),
			current_end: 0,
			future_begin: 0,
		}
	}

	/// Active ranges, top layer first.
	#[inline]
	pub(crate) fn current(&self) -> &[SlotId] {
		&self.ranges_i[..self.current_end]
	}

	/// Pending ranges, earliest start first.
	#[inline]
	pub(crate) fn future(&self) -> &[SlotId] {
		&self.ranges_i[self.future_begin..]
	}

	pub(crate) fn slack(&self) -> usize {
		self.future_begin - self.current_end
	}

	#[cfg(test)]
	pub(crate) fn is_empty(&self) -> bool {
		self.current_end == 0 && self.future_begin == self.ranges_i.len()
	}

	pub(crate) fn clear(&mut self) {
		self.ranges_i.clear();
		self.current_end = 0;
		self.future_begin = 0;
	}

	/// Inserts a pending range at its ordered position.
	pub(crate) fn push_future(&mut self, id: SlotId, arena: &SlotArena) {
		let new = arena.live(id);
		let rel = self
			.future()
			.partition_point(|&other| cmp_future(arena.live(other), new) == Ordering::Less);
		let at = self.future_begin + rel;

		if self.slack() > 0 {
			self.ranges_i.copy_within(self.future_begin..at, self.future_begin - 1);
			self.future_begin -= 1;
			self.ranges_i[at - 1] = id;
		} else {
			self.ranges_i.insert(at, id);
		}
	}

	/// Removes and returns the head of the pending zone if it starts at or
	/// before `pos`.
	pub(crate) fn pop_ready(&mut self, pos: Pos, arena: &SlotArena) -> Option<SlotId> {
		let &head = self.future().first()?;
		if arena.live(head).start > pos {
			return None;
		}
		self.future_begin += 1;
		Some(head)
	}

	/// Inserts an active range at its layering position.
	pub(crate) fn insert_current(&mut self, id: SlotId, arena: &SlotArena) {
		if self.slack() == 0 {
			self.ranges_i.insert(self.current_end, id);
			self.future_begin += 1;
		}
		let new = arena.live(id);
		let at = self
			.current()
			.partition_point(|&other| cmp_current(arena.live(other), new) == Ordering::Less);
		self.ranges_i.copy_within(at..self.current_end, at + 1);
		self.ranges_i[at] = id;
		self.current_end += 1;
	}

	/// Compacts the active zone, keeping order, and appends every dropped
	/// entry to `removed`.
	pub(crate) fn retain_current(&mut self, mut keep: impl FnMut(SlotId) -> bool, removed: &mut Vec<SlotId>) {
		let mut write = 0;
		for read in 0..self.current_end {
			let id = self.ranges_i[read];
			if keep(id) {
				self.ranges_i[write] = id;
				write += 1;
			} else {
				removed.push(id);
			}
		}
		self.current_end = write;
	}

	/// Every referenced slot, active zone first.
	pub(crate) fn iter(&self) -> impl Iterator<Item = SlotId> + '_ {
		self.current().iter().chain(self.future()).copied()
	}
}
