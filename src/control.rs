//! The management message shared by the reference stages.
//!
//! The length-prefix framer and the tick generator are illustrative
//! consumers of the composition core, not part of it. Both are driven with
//! the same out-of-band message type so they can be composed together
//! (e.g. `Vertical::new(framer, tick)`) without a mismatched `Management`
//! associated type.

/// Out-of-band control messages the reference stages understand.
///
/// Neither stage panics on a variant it doesn't care about: an irrelevant
/// message simply yields an empty emission, per the management path's
/// partiality rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Emitted by [`crate::stages::tick::TickStage`] at (approximately)
    /// its configured interval, and by a host re-delivering a scheduled
    /// wakeup back into the pipeline.
    Tick,
}
