//! Slot storage for in-flight decoration ranges.
//!
//! Slots are allocated and freed in O(1) through an intrusive free list: a
//! free slot stores the index of the next free slot. Slot indices stay stable
//! for a slot's lifetime and are never handed out of the crate directly;
//! callers get a [`RangeHandle`] that also pins the range's ordering, so a
//! handle to a freed slot never resolves to whatever reuses it.

use crate::range::DecorRange;


/// Index of a slot in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SlotId(u32);

impl SlotId {
	#[inline]
	fn index(self) -> usize {
		self.0 as usize
	}
}

/// Stable reference to a range that was admitted into the sweep.
///
/// Resolves only while the range it was issued for is still live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RangeHandle {
	slot: SlotId,
	ordering: u64,
}

impl RangeHandle {
	pub(crate) fn slot(self) -> SlotId {
		self.slot
	}

	/// Admission order of the range this handle refers to.
	pub fn ordering(self) -> u64 {
		self.ordering
	}
}

#[derive(Debug)]
enum Slot {
	Live(DecorRange),
	Free { next: Option<SlotId> },
}

/// Growable array of tagged slots with an intrusive free list.
#[derive(Debug, Default)]
pub(crate) struct SlotArena {
	slots: Vec<Slot>,
	free_head: Option<SlotId>,
	live: usize,
}

impl SlotArena {
	pub(crate) fn with_capacity(capacity: usize) -> Self {
		Self {
			slots: Vec::with_capacity(capacity),
			free_head: None,
			live: 0,
		}
	}

	/// Stores `range`, reusing the most recently freed slot if there is one.
	pub(crate) fn alloc(&mut self, range: DecorRange) -> SlotId {
		self.live += 1;
		match self.free_head {
			Some(id) => {
				let slot = &mut self.slots[id.index()];
				let Slot::Free { next } = *slot else {
					unreachable!("free list head {id:?} points at a live slot");
				};
				*slot = Slot::Live(range);
				self.free_head = next;
				id
			}
			None => {
				let id = SlotId(
					u32::try_from(self.slots.len()).unwrap_or_else(|_| panic!("decoration slot arena exhausted")),
				);
				self.slots.push(Slot::Live(range));
				id
			}
		}
	}

	/// Releases a live slot, pushing it onto the free list and returning its
	/// range.
	pub(crate) fn free(&mut self, id: SlotId) -> Option<DecorRange> {
		let slot = self.slots.get_mut(id.index())?;
		let is_live = matches!(slot, Slot::Live(_));
		debug_assert!(is_live, "double free of decoration slot {id:?}");
		if !is_live {
			return None;
		}
		let Slot::Live(range) = std::mem::replace(slot, Slot::Free { next: self.free_head }) else {
			unreachable!();
		};
		self.free_head = Some(id);
		self.live -= 1;
		Some(range)
	}

	pub(crate) fn get(&self, id: SlotId) -> Option<&DecorRange> {
		match self.slots.get(id.index())? {
			Slot::Live(range) => Some(range),
			Slot::Free { .. } => None,
		}
	}

	pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut DecorRange> {
		match self.slots.get_mut(id.index())? {
			Slot::Live(range) => Some(range),
			Slot::Free { .. } => None,
		}
	}

	/// Range behind a live slot the caller already knows to be live.
	///
	/// Slot references held by the range index are always live, so a miss
	/// here is a bookkeeping bug.
	#[inline]
	pub(crate) fn live(&self, id: SlotId) -> &DecorRange {
		match &self.slots[id.index()] {
			Slot::Live(range) => range,
			Slot::Free { .. } => panic!("range index references free slot {id:?}"),
		}
	}

	#[inline]
	pub(crate) fn live_mut(&mut self, id: SlotId) -> &mut DecorRange {
		match &mut self.slots[id.index()] {
			Slot::Live(range) => range,
			Slot::Free { .. } => panic!("range index references free slot {id:?}"),
		}
	}

	pub(crate) fn handle(&self, id: SlotId) -> RangeHandle {
		RangeHandle {
			slot: id,
			ordering: self.live(id).ordering,
		}
	}

	/// Resolves a handle, rejecting it if its slot was freed or reused.
	pub(crate) fn resolve(&self, handle: RangeHandle) -> Option<&DecorRange> {
		self.get(handle.slot).filter(|r| r.ordering == handle.ordering)
	}

	pub(crate) fn resolve_mut(&mut self, handle: RangeHandle) -> Option<&mut DecorRange> {
		self.get_mut(handle.slot).filter(|r| r.ordering == handle.ordering)
	}

	/// Drops every slot and empties the free list, keeping the backing
	/// allocation.
	pub(crate) fn clear(&mut self) {
		self.slots.clear();
		self.free_head = None;
		self.live = 0;
	}

	pub(crate) fn live_count(&self) -> usize {
		self.live
	}

	/// Total number of slots, live and free.
	pub(crate) fn len(&self) -> usize {
		self.slots.len()
	}

	#[cfg(test)]
	pub(crate) fn capacity(&self) -> usize {
		self.slots.capacity()
	}

	/// Walks the free chain from its head.
	///
	/// Stops early if the chain leaves the arena or reaches a live slot, so a
	/// corrupted chain shows up as a short walk instead of a hang. At most
	/// [`len`](Self::len) ids are yielded.
	pub(crate) fn free_chain(&self) -> impl Iterator<Item = SlotId> + '_ {
		let mut cursor = self.free_head;
		let mut remaining = self.slots.len();
		std::iter::from_fn(move || {
			let id = cursor?;
			if remaining == 0 {
				return None;
			}
			remaining -= 1;
			match self.slots.get(id.index())? {
				Slot::Free { next } => {
					cursor = *next;
					Some(id)
				}
				Slot::Live(_) => None,
			}
		})
	}

	/// Returns true if the free chain reaches exactly the slots that are not
	/// live.
	pub(crate) fn free_chain_complete(&self) -> bool {
		self.free_chain().count() == self.slots.len() - self.live
	}
}
