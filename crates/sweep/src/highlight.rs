//! Highlight attribute resolution.
//!
//! The sweep never interprets highlight groups itself. It asks a
//! [`HighlightResolver`] once per range for the attribute of the range's
//! highlight group, caches the answer on the range, and layers the cached
//! attributes of all active ranges with [`HighlightResolver::combine`].

use serde::{Deserialize, Serialize};

/// Identifier of a highlight group, as understood by the resolver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HlId(pub u32);

impl HlId {
	/// No highlight group.
	pub const NONE: Self = Self(0);

	pub fn is_none(self) -> bool {
		self.0 == 0
	}
}

/// Resolved screen attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrId(pub u32);

impl AttrId {
	/// No attribute; combining with it is the identity.
	pub const NONE: Self = Self(0);

	pub fn is_none(self) -> bool {
		self.0 == 0
	}
}

/// Maps highlight groups to screen attributes.
pub trait HighlightResolver {
	/// Resolves a highlight group to its attribute.
	fn resolve(&mut self, hl_id: HlId) -> AttrId;

	/// Layers `above` on top of `below`.
	fn combine(&mut self, below: AttrId, above: AttrId) -> AttrId;
}

/// Resolver that maps every group to the attribute with the same number and
/// lets the upper layer win outright.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl HighlightResolver for IdentityResolver {
	fn resolve(&mut self, hl_id: HlId) -> AttrId {
		AttrId(hl_id.0)
	}

	fn combine(&mut self, below: AttrId, above: AttrId) -> AttrId {
		if above.is_none() { below } else { above }
	}
}
