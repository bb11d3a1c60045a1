//! Decoration range records and their payloads.
//!
//! A [`DecorRange`] is one decoration projected into the sweep. Its payload is
//! a [`DecorData`] variant; the variant doubles as the decoration kind.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::highlight::{AttrId, HlId};
use crate::pos::Pos;

#[cfg(test)]
mod tests;

/// Layering priority. Higher values render on top.
pub type Priority = u16;

/// Priority given to decorations that do not ask for one.
pub const DEFAULT_PRIORITY: Priority = 0x1000;

/// Kind of a decoration, selecting its payload and rendering behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorKind {
	Highlight,
	Sign,
	VirtText,
	VirtLines,
	UiWatched,
}

bitflags::bitflags! {
	/// Behavior flags of a highlight or sign decoration.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct DecorFlags: u16 {
		/// Highlight continues past the end of the line.
		const HL_EOL = 1 << 0;
		/// Covered text is concealed.
		const CONCEAL = 1 << 1;
		/// Force spell checking on.
		const SPELL_ON = 1 << 2;
		/// Force spell checking off.
		const SPELL_OFF = 1 << 3;
		/// Position is reported to UI watchers.
		const UI_WATCHED = 1 << 4;
	}
}

/// Where a virtual text is placed relative to the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VirtTextPos {
	#[default]
	Eol,
	Overlay,
	WinCol,
	RightAlign,
	Inline,
}

impl VirtTextPos {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Eol => "eol",
			Self::Overlay => "overlay",
			Self::WinCol => "win_col",
			Self::RightAlign => "right_align",
			Self::Inline => "inline",
		}
	}
}

/// How a virtual text's highlight interacts with the text below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HlMode {
	#[default]
	Unknown,
	Replace,
	Combine,
	Blend,
}

impl HlMode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Unknown => "",
			Self::Replace => "replace",
			Self::Combine => "combine",
			Self::Blend => "blend",
		}
	}
}

/// Error returned when parsing [`VirtTextPos`] or [`HlMode`] from a name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {name:?}")]
pub struct ParseNameError {
	what: &'static str,
	name: String,
}

impl FromStr for VirtTextPos {
	type Err = ParseNameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		[Self::Eol, Self::Overlay, Self::WinCol, Self::RightAlign, Self::Inline]
			.into_iter()
			.find(|pos| pos.as_str() == s)
			.ok_or_else(|| ParseNameError {
				what: "virtual text position",
				name: s.to_string(),
			})
	}
}

impl FromStr for HlMode {
	type Err = ParseNameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		[Self::Unknown, Self::Replace, Self::Combine, Self::Blend]
			.into_iter()
			.find(|mode| mode.as_str() == s)
			.ok_or_else(|| ParseNameError {
				what: "highlight mode",
				name: s.to_string(),
			})
	}
}

/// Payload shared by highlight and sign decorations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignHighlight {
	/// Highlight group applied to covered text.
	pub hl_id: HlId,
	pub flags: DecorFlags,
	/// Replacement drawn in place of concealed text.
	pub conceal_char: Option<char>,
	/// Text shown in the sign column.
	pub sign_text: Option<String>,
	pub sign_hl_id: HlId,
	pub number_hl_id: HlId,
	pub line_hl_id: HlId,
}

impl SignHighlight {
	/// A plain highlight with no flags.
	pub fn hl(hl_id: HlId) -> Self {
		Self {
			hl_id,
			..Self::default()
		}
	}
}

/// One highlighted piece of a virtual text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtTextChunk {
	pub text: String,
	pub hl_id: Option<HlId>,
}

impl VirtTextChunk {
	pub fn new(text: impl Into<String>, hl_id: Option<HlId>) -> Self {
		Self {
			text: text.into(),
			hl_id,
		}
	}
}

/// Virtual text descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtText {
	pub chunks: Vec<VirtTextChunk>,
	pub pos: VirtTextPos,
	pub hl_mode: HlMode,
	/// Fixed window column for [`VirtTextPos::WinCol`].
	pub win_col: Option<u32>,
	/// Display width of all chunks.
	pub width: u32,
}

impl VirtText {
	pub fn new(chunks: Vec<VirtTextChunk>, pos: VirtTextPos) -> Self {
		let width = chunks.iter().map(|c| c.text.width() as u32).sum();
		Self {
			chunks,
			pos,
			hl_mode: HlMode::default(),
			win_col: None,
			width,
		}
	}

	pub fn with_hl_mode(mut self, hl_mode: HlMode) -> Self {
		self.hl_mode = hl_mode;
		self
	}

	pub fn at_win_col(mut self, col: u32) -> Self {
		self.pos = VirtTextPos::WinCol;
		self.win_col = Some(col);
		self
	}
}

/// Virtual lines attached above or below a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtLines {
	pub lines: Vec<Vec<VirtTextChunk>>,
	pub above: bool,
	/// Lines start at the window's left edge instead of the text area.
	pub left_col: bool,
}

/// Payload of a decoration; the variant selects the [`DecorKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorData {
	Highlight(SignHighlight),
	Sign(SignHighlight),
	VirtText(Arc<VirtText>),
	VirtLines(Arc<VirtLines>),
	UiWatched {
		ns_id: u32,
		mark_id: u32,
		pos: VirtTextPos,
	},
}

impl DecorData {
	pub fn kind(&self) -> DecorKind {
		match self {
			Self::Highlight(_) => DecorKind::Highlight,
			Self::Sign(_) => DecorKind::Sign,
			Self::VirtText(_) => DecorKind::VirtText,
			Self::VirtLines(_) => DecorKind::VirtLines,
			Self::UiWatched { .. } => DecorKind::UiWatched,
		}
	}
}

const RAW_UNPOSITIONED: i32 = -10;
const RAW_PENDING_ASSIGNMENT: i32 = -3;
const RAW_PENDING_LINE_END: i32 = -1;

/// Screen column state of a virtual text.
///
/// Only the renderer moves a range through these states; the sweep sets
/// [`DrawCol::Unpositioned`] when the range becomes active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DrawCol {
	/// Just activated, not yet looked at by the renderer.
	#[default]
	Unpositioned,
	/// May still be assigned a column later in this pass.
	PendingAssignment,
	/// Drawn on the current screen line once its position is decided.
	PendingLineEnd,
	/// Drawn at this screen column.
	Fixed(u32),
	/// Must not be drawn.
	Suppressed,
}

impl DrawCol {
	/// Decodes the sentinel integer form. Unknown negative values yield `None`.
	pub fn from_raw(raw: i32) -> Option<Self> {
		match raw {
			i32::MIN => Some(Self::Suppressed),
			RAW_UNPOSITIONED => Some(Self::Unpositioned),
			RAW_PENDING_ASSIGNMENT => Some(Self::PendingAssignment),
			RAW_PENDING_LINE_END => Some(Self::PendingLineEnd),
			col if col >= 0 => Some(Self::Fixed(col as u32)),
			_ => None,
		}
	}

	/// Encodes to the sentinel integer form. Columns past `i32::MAX` clamp.
	pub fn to_raw(self) -> i32 {
		match self {
			Self::Unpositioned => RAW_UNPOSITIONED,
			Self::PendingAssignment => RAW_PENDING_ASSIGNMENT,
			Self::PendingLineEnd => RAW_PENDING_LINE_END,
			Self::Fixed(col) => i32::try_from(col).unwrap_or(i32::MAX),
			Self::Suppressed => i32::MIN,
		}
	}

	/// Returns the fixed column, if one has been assigned.
	pub fn col(self) -> Option<u32> {
		match self {
			Self::Fixed(col) => Some(col),
			_ => None,
		}
	}
}

impl fmt::Display for DrawCol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Unpositioned => f.write_str("unpositioned"),
			Self::PendingAssignment => f.write_str("pending"),
			Self::PendingLineEnd => f.write_str("eol"),
			Self::Fixed(col) => write!(f, "{col}"),
			Self::Suppressed => f.write_str("suppressed"),
		}
	}
}

/// One decoration instance in flight during a render pass.
///
/// Ranges are independent entries. Two ranges sharing storage history (a
/// reused slot, a shared payload) are not linked in any way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorRange {
	pub start: Pos,
	pub end: Pos,
	/// Admission counter; the only insertion-order tie-break.
	pub ordering: u64,
	pub priority: Priority,
	/// Created by a decoration provider for this pass only.
	///
	/// The sweep frees every slot the same way once the range is done, owned
	/// or not. Payloads of stored ranges are `Arc`s shared with the
	/// interval source, so freeing the slot drops only this pass's reference.
	pub owned: bool,
	pub data: DecorData,
	/// Cached attribute of the range's highlight group.
	pub attr_id: Option<AttrId>,
	pub draw_col: DrawCol,
}

impl DecorRange {
	pub fn kind(&self) -> DecorKind {
		self.data.kind()
	}

	/// First position past the range.
	///
	/// Zero-width ranges cover their start column.
	#[inline]
	pub fn effective_end(&self) -> Pos {
		if self.end <= self.start {
			self.start.next_col()
		} else {
			self.end
		}
	}

	/// Returns true if the range covers `pos`.
	#[inline]
	pub fn covers(&self, pos: Pos) -> bool {
		self.start <= pos && pos < self.effective_end()
	}

	/// Returns true once the sweep has moved past the range.
	#[inline]
	pub fn expired_at(&self, pos: Pos) -> bool {
		pos >= self.effective_end()
	}

	/// Highlight payload, for highlight decorations only.
	pub fn highlight(&self) -> Option<&SignHighlight> {
		match &self.data {
			DecorData::Highlight(sh) => Some(sh),
			_ => None,
		}
	}

	pub fn virt_text(&self) -> Option<&VirtText> {
		match &self.data {
			DecorData::VirtText(vt) => Some(vt),
			_ => None,
		}
	}

	/// Returns true if the span touches any column of `row`.
	#[inline]
	pub fn reaches_row(&self, row: u32) -> bool {
		self.start.row <= row && self.effective_end() > Pos::row_start(row)
	}

	/// Returns true for kinds the renderer reads per row rather than per
	/// column. They stay reachable for the rest of the row their span ends on.
	pub fn is_row_scoped(&self) -> bool {
		matches!(
			self.kind(),
			DecorKind::VirtText | DecorKind::UiWatched | DecorKind::Sign | DecorKind::VirtLines
		)
	}
}
