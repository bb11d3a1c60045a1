use std::sync::Arc;

use super::*;

fn highlight(start: (u32, u32), end: (u32, u32)) -> DecorRange {
	DecorRange {
		start: start.into(),
		end: end.into(),
		ordering: 0,
		priority: DEFAULT_PRIORITY,
		owned: false,
		data: DecorData::Highlight(SignHighlight::hl(HlId(1))),
		attr_id: None,
		draw_col: DrawCol::default(),
	}
}

#[test]
fn test_covers_half_open() {
	let r = highlight((0, 2), (0, 5));
	assert!(!r.covers(Pos::new(0, 1)));
	assert!(r.covers(Pos::new(0, 2)));
	assert!(r.covers(Pos::new(0, 4)));
	assert!(!r.covers(Pos::new(0, 5)));
	assert!(r.expired_at(Pos::new(0, 5)));
}

#[test]
fn test_zero_width_covers_start_column() {
	let r = highlight((3, 7), (3, 7));
	assert_eq!(r.effective_end(), Pos::new(3, 8));
	assert!(r.covers(Pos::new(3, 7)));
	assert!(!r.covers(Pos::new(3, 8)));
}

#[test]
fn test_multi_row_span() {
	let r = highlight((1, 10), (3, 0));
	assert!(r.covers(Pos::new(1, 50)));
	assert!(r.covers(Pos::new(2, 0)));
	assert!(!r.covers(Pos::new(3, 0)));
}

#[test]
fn test_kind_follows_payload() {
	let vt = Arc::new(VirtText::new(vec![VirtTextChunk::new("note", None)], VirtTextPos::Eol));
	assert_eq!(DecorData::VirtText(vt).kind(), DecorKind::VirtText);
	assert_eq!(
		DecorData::UiWatched {
			ns_id: 1,
			mark_id: 2,
			pos: VirtTextPos::Overlay
		}
		.kind(),
		DecorKind::UiWatched
	);
	assert_eq!(DecorData::Sign(SignHighlight::default()).kind(), DecorKind::Sign);
}

#[test]
fn test_draw_col_sentinels() {
	assert_eq!(DrawCol::from_raw(-10), Some(DrawCol::Unpositioned));
	assert_eq!(DrawCol::from_raw(-3), Some(DrawCol::PendingAssignment));
	assert_eq!(DrawCol::from_raw(-1), Some(DrawCol::PendingLineEnd));
	assert_eq!(DrawCol::from_raw(42), Some(DrawCol::Fixed(42)));
	assert_eq!(DrawCol::from_raw(i32::MIN), Some(DrawCol::Suppressed));
	assert_eq!(DrawCol::from_raw(-2), None);

	for state in [
		DrawCol::Unpositioned,
		DrawCol::PendingAssignment,
		DrawCol::PendingLineEnd,
		DrawCol::Fixed(0),
		DrawCol::Suppressed,
	] {
		assert_eq!(DrawCol::from_raw(state.to_raw()), Some(state));
	}
	assert_eq!(DrawCol::Fixed(9).col(), Some(9));
	assert_eq!(DrawCol::PendingLineEnd.col(), None);
}

#[test]
fn test_pos_and_mode_names() {
	assert_eq!("right_align".parse::<VirtTextPos>(), Ok(VirtTextPos::RightAlign));
	assert_eq!(VirtTextPos::WinCol.as_str(), "win_col");
	assert_eq!("".parse::<HlMode>(), Ok(HlMode::Unknown));
	assert_eq!("blend".parse::<HlMode>(), Ok(HlMode::Blend));
	assert!("sideways".parse::<VirtTextPos>().is_err());
}

#[test]
fn test_virt_text_width() {
	let vt = VirtText::new(
		vec![VirtTextChunk::new("ab", None), VirtTextChunk::new("界", Some(HlId(3)))],
		VirtTextPos::Inline,
	);
	assert_eq!(vt.width, 4);
	let vt = vt.at_win_col(12);
	assert_eq!(vt.pos, VirtTextPos::WinCol);
	assert_eq!(vt.win_col, Some(12));
}
