//! Decoration provider callbacks.
//!
//! A provider is external code asked, once per drawn line, to contribute
//! ephemeral decorations. It runs in the middle of the sweep and may add
//! ranges or inspect the sweep through a [`ProviderSink`]. Providers may not
//! invoke providers: [`DecorState::run_provider`] guards the call with the
//! `running_decor_provider` flag and rejects nested entry.

use crate::arena::RangeHandle;
use crate::error::Result;
use crate::range::DecorRange;
use crate::source::SourceRange;
use crate::state::DecorState;

/// External hook invoked for each drawn line.
pub trait DecorProvider {
	/// Contributes decorations for `row`.
	fn on_line(&mut self, row: u32, sink: &mut ProviderSink<'_>) -> Result<()>;
}

impl<F> DecorProvider for F
where
	F: FnMut(u32, &mut ProviderSink<'_>) -> Result<()>,
{
	fn on_line(&mut self, row: u32, sink: &mut ProviderSink<'_>) -> Result<()> {
		self(row, sink)
	}
}

/// Access to the sweep handed to a running provider.
pub struct ProviderSink<'a> {
	pub(crate) state: &'a mut DecorState,
	pub(crate) row: u32,
	pub(crate) added: usize,
}

impl ProviderSink<'_> {
	/// Row the provider was invoked for.
	pub fn row(&self) -> u32 {
		self.row
	}

	/// Admits an ephemeral range. The sweep owns it and releases it as soon as
	/// the range is passed.
	pub fn add(&mut self, range: SourceRange) -> Result<RangeHandle> {
		let handle = self.state.add_range(range.owned())?;
		self.added += 1;
		Ok(handle)
	}

	/// Looks up a range admitted earlier in the pass.
	pub fn range(&self, handle: RangeHandle) -> Option<&DecorRange> {
		self.state.range(handle)
	}

	/// Number of ranges currently active.
	pub fn active_count(&self) -> usize {
		self.state.active_count()
	}

	/// Invokes another provider from inside this one.
	///
	/// Always fails with [`SweepError::ProviderReentered`](crate::SweepError::ProviderReentered).
	pub fn run_provider(&mut self, provider: &mut dyn DecorProvider) -> Result<usize> {
		self.state.run_provider(provider)
	}
}
