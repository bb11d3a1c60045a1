//! Per-column decision and its memo.

use crate::arena::RangeHandle;
use crate::highlight::AttrId;
use crate::range::DecorKind;

/// Spell checking override requested by active decorations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TriState {
	/// No decoration has an opinion.
	#[default]
	Unset,
	True,
	False,
}

/// Conceal decision for a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Conceal {
	#[default]
	None,
	/// Text is hidden.
	Hidden,
	/// First column of a concealed span, drawn as `ch` (or nothing).
	Replace { ch: Option<char>, attr: AttrId },
}

/// What the sweep decided for one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnDecor {
	/// Top active range: highest priority, earliest admitted on ties.
	pub winner: Option<RangeHandle>,
	pub winner_kind: Option<DecorKind>,
	/// Attributes of every active highlight, layered bottom to top.
	pub attr: AttrId,
	pub conceal: Conceal,
	pub spell: TriState,
}

/// Memo of the last decision and the last column it stays valid for.
#[derive(Debug, Default)]
pub(crate) struct ColumnCache {
	col_until: Option<u32>,
	current: ColumnDecor,
}

impl ColumnCache {
	/// Returns the memoized decision if `col` is still inside its run.
	#[inline]
	pub(crate) fn lookup(&self, col: u32) -> Option<ColumnDecor> {
		match self.col_until {
			Some(until) if col <= until => Some(self.current),
			_ => None,
		}
	}

	pub(crate) fn store(&mut self, col_until: u32, decor: ColumnDecor) {
		self.col_until = Some(col_until);
		self.current = decor;
	}

	pub(crate) fn invalidate(&mut self) {
		self.col_until = None;
	}

	pub(crate) fn col_until(&self) -> Option<u32> {
		self.col_until
	}

	/// Last decision, valid or not.
	pub(crate) fn current(&self) -> &ColumnDecor {
		&self.current
	}
}
