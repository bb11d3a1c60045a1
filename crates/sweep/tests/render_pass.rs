//! Drives whole render passes through the public API with a custom interval
//! source and a decoration provider.

use std::cell::RefCell;
use std::rc::Rc;

use strata_sweep::{
	AttrId, DecorKind, DecorState, HlId, IdentityResolver, IntervalSource, ProviderSink, SortedIntervals, SourceRange,
	SweepConfig,
};

#[derive(Debug, PartialEq, Eq)]
enum Call {
	Seek(u32),
	Advance(u32),
}

/// Source that records how the sweep positions it.
struct Recording {
	inner: SortedIntervals,
	calls: Rc<RefCell<Vec<Call>>>,
}

impl IntervalSource for Recording {
	fn seek(&mut self, row: u32, out: &mut Vec<SourceRange>) {
		self.calls.borrow_mut().push(Call::Seek(row));
		self.inner.seek(row, out);
	}

	fn advance(&mut self, row: u32, out: &mut Vec<SourceRange>) {
		self.calls.borrow_mut().push(Call::Advance(row));
		self.inner.advance(row, out);
	}
}

fn config() -> SweepConfig {
	SweepConfig {
		verify_invariants: true,
		..SweepConfig::default()
	}
}

fn attrs(state: &mut DecorState, cols: std::ops::Range<u32>) -> Vec<u32> {
	cols.map(|col| state.redraw_col(col, &mut IdentityResolver).attr.0).collect()
}

#[test]
fn pass_with_provider_and_long_range() {
	let calls = Rc::new(RefCell::new(Vec::new()));
	let source = Recording {
		inner: SortedIntervals::new(vec![
			SourceRange::highlight((0, 5).into(), (2, 2).into(), HlId(3)),
			SourceRange::highlight((0, 0).into(), (0, 3).into(), HlId(4)),
		]),
		calls: Rc::clone(&calls),
	};

	let mut state = DecorState::new(config());
	state.start(Box::new(source), 1).unwrap();

	let mut provider = |row: u32, sink: &mut ProviderSink<'_>| -> strata_sweep::Result<()> {
		let at = (row, 0).into();
		sink.add(SourceRange::highlight(at, (row, 1).into(), HlId(9)).with_priority(9000))?;
		Ok(())
	};

	state.redraw_line(1).unwrap();
	assert_eq!(state.run_provider(&mut provider), Ok(1));
	let first = state.redraw_col(0, &mut IdentityResolver);
	assert_eq!(first.attr, AttrId(9));
	assert_eq!(first.winner_kind, Some(DecorKind::Highlight));
	let winner = first.winner.unwrap();
	assert!(state.range(winner).unwrap().owned);
	assert_eq!(attrs(&mut state, 1..4), vec![3, 3, 3]);
	assert!(state.range(winner).is_none(), "provider range released once passed");

	state.redraw_line(2).unwrap();
	assert_eq!(state.run_provider(&mut provider), Ok(1));
	assert_eq!(attrs(&mut state, 0..4), vec![9, 3, 0, 0]);
	assert_eq!(state.active_count(), 0);

	state.finish();
	assert_eq!(state.live_count(), 0);
	assert_eq!(*calls.borrow(), vec![Call::Seek(1), Call::Advance(1), Call::Advance(2)]);
}

#[test]
fn config_file_drives_range_limit() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("sweep.toml");
	std::fs::write(&path, "max_ranges_per_pass = 1\nverify_invariants = true\n").unwrap();

	let mut state = DecorState::new(SweepConfig::load(&path).unwrap());
	state.start(Box::new(SortedIntervals::default()), 0).unwrap();
	state.redraw_line(0).unwrap();

	let range = SourceRange::highlight((0, 0).into(), (0, 1).into(), HlId(1));
	assert!(state.add_range(range.clone()).is_ok());
	assert_eq!(
		state.add_range(range),
		Err(strata_sweep::SweepError::Exhausted { limit: 1 })
	);
}
