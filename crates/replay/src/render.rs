//! Drives one render pass over a [`Scene`] and records what a renderer would
//! draw on every row.

use std::fmt;

use strata_sweep::{
	AttrId, Conceal, DecorData, DecorState, DrawCol, HighlightResolver, ProviderSink, SortedIntervals, SweepConfig,
	VirtTextPos,
};
use tracing::{debug, info};

use crate::scene::Scene;


/// Decisions for one drawn row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
	pub row: u32,
	/// One character per column: the layered attribute as a base-36 digit,
	/// the conceal replacement, `_` for hidden text, `.` for none.
	pub cells: String,
	/// Combined attribute past the end of the line.
	pub eol_attr: AttrId,
	/// Placed virtual texts as `(text, column)`, top layer first.
	pub virt_text: Vec<(String, DrawCol)>,
	/// Sign texts, highest priority first.
	pub signs: Vec<String>,
	/// Number of virtual lines anchored at the row.
	pub virt_lines: usize,
	/// UI-watched marks as `(mark_id, column)`.
	pub watched: Vec<(u32, u32)>,
	/// Ranges the decoration provider added on this row.
	pub provided: usize,
}

impl fmt::Display for RowReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:>4} |{}|", self.row, self.cells)?;
		if !self.eol_attr.is_none() {
			write!(f, " eol={}", self.eol_attr.0)?;
		}
		for sign in &self.signs {
			write!(f, " sign={sign}")?;
		}
		for (text, col) in &self.virt_text {
			write!(f, " vt={text:?}@{col}")?;
		}
		if self.virt_lines > 0 {
			write!(f, " lines={}", self.virt_lines)?;
		}
		for (mark, col) in &self.watched {
			write!(f, " mark={mark}@{col}")?;
		}
		Ok(())
	}
}

/// Runs a full pass over `scene` with `config`.
pub fn replay(scene: &Scene, config: SweepConfig, resolver: &mut dyn HighlightResolver) -> anyhow::Result<Vec<RowReport>> {
	let (stored, ephemeral) = scene.sources()?;
	info!(stored = stored.len(), ephemeral = ephemeral.len(), "replaying scene");

	let mut state = DecorState::new(config);
	state.start(Box::new(SortedIntervals::new(stored)), scene.top_row)?;

	let mut provider = |row: u32, sink: &mut ProviderSink<'_>| -> strata_sweep::Result<()> {
		for range in ephemeral.iter().filter(|r| r.start.row == row) {
			sink.add(range.clone())?;
		}
		Ok(())
	};

	let mut reports = Vec::with_capacity(scene.rows as usize);
	for row in scene.row_span() {
		state.redraw_line(row)?;
		let provided = state.run_provider(&mut provider)?;

		let mut cells = String::with_capacity(scene.cols as usize);
		for col in 0..scene.cols {
			let decor = state.redraw_col(col, resolver);
			cells.push(match decor.conceal {
				Conceal::Replace { ch, .. } => ch.unwrap_or(' '),
				Conceal::Hidden => '_',
				Conceal::None => attr_char(decor.attr),
			});
		}

		let eol_attr = state.redraw_eol(scene.cols, resolver);
		let signs = state
			.signs_for_row(row)
			.into_iter()
			.filter_map(|h| match &state.range(h)?.data {
				DecorData::Sign(sh) => sh.sign_text.clone(),
				_ => None,
			})
			.collect();
		let virt_lines = state.virt_lines_for_row(row).len();
		place_virt_text(&mut state, scene.cols);
		place_eol_virt_text(&mut state, scene.cols);

		let report = RowReport {
			row,
			cells,
			eol_attr,
			virt_text: row_virt_text(&state),
			signs,
			virt_lines,
			watched: state
				.ui_watched()
				.into_iter()
				.filter_map(|h| {
					let range = state.range(h)?;
					match range.data {
						DecorData::UiWatched { mark_id, .. } => Some((mark_id, range.start.col)),
						_ => None,
					}
				})
				.collect(),
			provided,
		};
		debug!(row, active = state.active_count(), live = state.live_count(), "row replayed");
		reports.push(report);
	}

	info!(admitted = state.admitted(), slots = state.slot_count(), "pass finished");
	state.finish();
	Ok(reports)
}

fn attr_char(attr: AttrId) -> char {
	if attr.is_none() {
		'.'
	} else {
		char::from_digit(attr.0 % 36, 36).unwrap_or('?')
	}
}

/// Assigns a column to every virtual text the renderer has not looked at yet.
/// Overlays competing for a column keep only the top layer.
fn place_virt_text(state: &mut DecorState, cols: u32) {
	let mut taken = Vec::new();
	for handle in state.row_virt_text() {
		let Some(range) = state.range(handle) else {
			continue;
		};
		if range.draw_col != DrawCol::Unpositioned {
			continue;
		}
		let Some(vt) = range.virt_text() else {
			continue;
		};
		let draw_col = match vt.pos {
			VirtTextPos::Eol => DrawCol::PendingLineEnd,
			VirtTextPos::Overlay | VirtTextPos::Inline => {
				let col = range.start.col;
				if vt.pos == VirtTextPos::Overlay && taken.contains(&col) {
					DrawCol::Suppressed
				} else {
					taken.push(col);
					DrawCol::Fixed(col)
				}
			}
			VirtTextPos::WinCol => DrawCol::Fixed(vt.win_col.unwrap_or(range.start.col)),
			VirtTextPos::RightAlign => DrawCol::Fixed(cols.saturating_sub(vt.width)),
		};
		state.set_draw_col(handle, draw_col);
	}
}

/// Lays end-of-line virtual texts out after the line, one column apart.
fn place_eol_virt_text(state: &mut DecorState, eol_col: u32) {
	let mut col = eol_col + 1;
	for handle in state.eol_virt_text() {
		let Some(width) = state.range(handle).and_then(|r| r.virt_text()).map(|vt| vt.width) else {
			continue;
		};
		if state.set_draw_col(handle, DrawCol::Fixed(col)) {
			col += width + 1;
		}
	}
}

fn row_virt_text(state: &DecorState) -> Vec<(String, DrawCol)> {
	state
		.row_virt_text()
		.into_iter()
		.filter_map(|h| {
			let range = state.range(h)?;
			let text = range.virt_text()?.chunks.iter().map(|c| c.text.as_str()).collect();
			Some((text, range.draw_col))
		})
		.collect()
}
