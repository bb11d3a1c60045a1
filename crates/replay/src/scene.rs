//! Scene files: a window size plus the decorations to sweep over it.
//!
//! ```toml
//! rows = 2
//! cols = 12
//!
//! [[range]]
//! kind = "highlight"
//! start = [0, 0]
//! end = [0, 11]
//! hl = 1
//! priority = 1
//!
//! [[range]]
//! kind = "virt_text"
//! start = [0, 4]
//! text = "hint"
//! pos = "eol"
//! ephemeral = true
//! ```
//!
//! Ephemeral ranges are not stored in the interval source. A decoration
//! provider adds them when the sweep reaches their start row.

use std::path::Path;

use anyhow::{Context, bail, ensure};
use serde::Deserialize;
use strata_sweep::{
	DecorData, DecorFlags, HlId, HlMode, Pos, Priority, SignHighlight, SourceRange, SweepConfig, VirtLines, VirtText,
	VirtTextChunk, VirtTextPos,
};

#[cfg(test)]
mod tests;

/// A window and its decorations.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
	/// First row drawn.
	#[serde(default)]
	pub top_row: u32,
	/// Number of rows drawn.
	pub rows: u32,
	/// Text width of every row.
	pub cols: u32,
	/// Sweep settings; overridden by `--config`.
	#[serde(default)]
	pub sweep: SweepConfig,
	#[serde(default, rename = "range")]
	pub ranges: Vec<RangeSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindSpec {
	Highlight,
	Sign,
	VirtText,
	VirtLines,
	UiWatched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSpec {
	HlEol,
	Conceal,
	SpellOn,
	SpellOff,
	UiWatched,
}

impl From<FlagSpec> for DecorFlags {
	fn from(flag: FlagSpec) -> Self {
		match flag {
			FlagSpec::HlEol => DecorFlags::HL_EOL,
			FlagSpec::Conceal => DecorFlags::CONCEAL,
			FlagSpec::SpellOn => DecorFlags::SPELL_ON,
			FlagSpec::SpellOff => DecorFlags::SPELL_OFF,
			FlagSpec::UiWatched => DecorFlags::UI_WATCHED,
		}
	}
}

/// One decoration as written in a scene file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeSpec {
	pub kind: KindSpec,
	/// `[row, col]` of the first covered position.
	pub start: [u32; 2],
	/// `[row, col]` one past the last covered position; defaults to `start`.
	pub end: Option<[u32; 2]>,
	pub priority: Option<Priority>,
	#[serde(default)]
	pub hl: u32,
	#[serde(default)]
	pub flags: Vec<FlagSpec>,
	pub conceal_char: Option<char>,
	pub sign_text: Option<String>,
	/// Virtual text contents.
	pub text: Option<String>,
	#[serde(default)]
	pub pos: VirtTextPos,
	#[serde(default)]
	pub hl_mode: HlMode,
	pub win_col: Option<u32>,
	/// Virtual line contents, one entry per line.
	#[serde(default)]
	pub lines: Vec<String>,
	#[serde(default)]
	pub above: bool,
	/// Added by a decoration provider instead of the interval source.
	#[serde(default)]
	pub ephemeral: bool,
}

impl Scene {
	pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
		let scene: Self = toml::from_str(s).context("invalid scene")?;
		ensure!(scene.cols > 0, "scene has no columns");
		Ok(scene)
	}

	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let text = std::fs::read_to_string(path).with_context(|| format!("reading scene {}", path.display()))?;
		Self::from_toml_str(&text).with_context(|| format!("loading scene {}", path.display()))
	}

	/// Rows drawn by a pass over this scene.
	pub fn row_span(&self) -> std::ops::Range<u32> {
		self.top_row..self.top_row.saturating_add(self.rows)
	}

	/// Splits the scene into stored and ephemeral ranges.
	pub fn sources(&self) -> anyhow::Result<(Vec<SourceRange>, Vec<SourceRange>)> {
		let mut stored = Vec::new();
		let mut ephemeral = Vec::new();
		for (i, spec) in self.ranges.iter().enumerate() {
			let range = spec.to_source(i as u32).with_context(|| format!("range #{i}"))?;
			if spec.ephemeral {
				ephemeral.push(range.owned());
			} else {
				stored.push(range);
			}
		}
		Ok((stored, ephemeral))
	}
}

impl RangeSpec {
	/// Builds the sweep input for this decoration. `mark_id` names UI-watched
	/// marks.
	pub fn to_source(&self, mark_id: u32) -> anyhow::Result<SourceRange> {
		let start = Pos::new(self.start[0], self.start[1]);
		let end = self.end.map_or(start, |[row, col]| Pos::new(row, col));
		if end < start {
			bail!("end {end:?} before start {start:?}");
		}

		let flags = self.flags.iter().fold(DecorFlags::empty(), |acc, &f| acc | DecorFlags::from(f));
		let sign_highlight = || SignHighlight {
			hl_id: HlId(self.hl),
			flags,
			conceal_char: self.conceal_char,
			sign_text: self.sign_text.clone(),
			..SignHighlight::default()
		};

		let data = match self.kind {
			KindSpec::Highlight => DecorData::Highlight(sign_highlight()),
			KindSpec::Sign => {
				ensure!(self.sign_text.is_some(), "sign without sign_text");
				DecorData::Sign(sign_highlight())
			}
			KindSpec::VirtText => {
				let Some(text) = &self.text else {
					bail!("virt_text without text");
				};
				let hl_id = (self.hl != 0).then_some(HlId(self.hl));
				let mut vt = VirtText::new(vec![VirtTextChunk::new(text.as_str(), hl_id)], self.pos)
					.with_hl_mode(self.hl_mode);
				if let Some(col) = self.win_col {
					vt = vt.at_win_col(col);
				}
				DecorData::VirtText(vt.into())
			}
			KindSpec::VirtLines => {
				ensure!(!self.lines.is_empty(), "virt_lines without lines");
				let hl_id = (self.hl != 0).then_some(HlId(self.hl));
				let lines = self
					.lines
					.iter()
					.map(|line| vec![VirtTextChunk::new(line.as_str(), hl_id)])
					.collect();
				DecorData::VirtLines(
					VirtLines {
						lines,
						above: self.above,
						left_col: false,
					}
					.into(),
				)
			}
			KindSpec::UiWatched => DecorData::UiWatched {
				ns_id: 1,
				mark_id,
				pos: self.pos,
			},
		};

		let range = SourceRange::new(start, end, data);
		Ok(match self.priority {
			Some(priority) => range.with_priority(priority),
			None => range,
		})
	}
}
