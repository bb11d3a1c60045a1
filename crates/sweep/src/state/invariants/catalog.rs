//! Invariant catalog for [`crate::state::DecorState`].
#![allow(dead_code)]

/// Must keep every active range covering the scan position and every pending
/// range starting after it.
///
/// - Enforced in: `DecorState::advance_to` (promote, then retire)
/// - Tested by: [`crate::state::tests::prop_partition_tracks_scan_position`]
/// - Failure symptom: decorations drawn outside their span, or skipped at their start.
pub(crate) const ZONES_MATCH_SCAN_POSITION: () = ();

/// Must order the active zone by priority descending, then admission order.
///
/// - Enforced in: `RangeIndex::insert_current`
/// - Tested by: [`crate::state::tests::test_equal_priority_earliest_wins`], [`crate::state::tests::prop_winner_matches_brute_force`]
/// - Failure symptom: lower-priority decorations shadow higher ones, or ties flicker between passes.
pub(crate) const ACTIVE_LAYERING_ORDER: () = ();

/// Must never let a handle resolve to a range admitted after the handle's
/// range was released.
///
/// - Enforced in: `SlotArena::resolve` (ordering check), `DecorState::new_range_ordering` (never reset)
/// - Tested by: [`crate::state::tests::test_stale_handle_after_slot_reuse`], [`crate::state::tests::test_handles_do_not_survive_pass`]
/// - Failure symptom: the renderer repositions or reads a decoration it never saw.
pub(crate) const NO_STALE_RESURRECTION: () = ();

/// Must answer a cached column exactly as a fresh sweep step would.
///
/// - Enforced in: `DecorState::run_until` (stops at the next boundary and at conceal starts), `DecorState::admit` (invalidates)
/// - Tested by: [`crate::state::tests::test_requery_same_column_is_identical`], [`crate::state::tests::prop_winner_matches_brute_force`]
/// - Failure symptom: highlights bleed one or more columns past their end.
pub(crate) const CACHE_IS_TRANSPARENT: () = ();

/// Must not run a decoration provider while another one is running.
///
/// - Enforced in: [`crate::state::DecorState::run_provider`]
/// - Tested by: [`crate::state::tests::test_nested_provider_rejected`]
/// - Failure symptom: providers observe a half-updated sweep and admit duplicate ranges.
pub(crate) const PROVIDER_NOT_REENTRANT: () = ();
