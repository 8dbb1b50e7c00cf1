//! Stage factories.
//!
//! A `Stage` is polymorphic over its four port types (command-above,
//! command-below, event-above, event-below) plus the management message
//! type it is driven with, and exposes one operation: produce exactly one
//! [`PipePair`] per pipeline instantiation. The factory is where
//! stage-local state (e.g. a receive buffer) is allocated; calling
//! `apply` twice against two different [`Context`]s produces two
//! independent pipelines.

use crate::context::Context;
use crate::pipe_pair::PipePair;

/// A factory for one protocol layer.
///
/// Stage authors typically implement this on a small, `Clone`-free
/// configuration struct (e.g. the reference framer stage holds only its
/// maximum frame length) and put actual per-pipeline state on the
/// [`PipePair`] returned by `apply`.
pub trait Stage {
    type CmdAbove;
    type CmdBelow;
    type EvtAbove;
    type EvtBelow;
    type Management;

    /// The `PipePair` this stage instantiates.
    type Pipe: PipePair<
        CmdAbove = Self::CmdAbove,
        CmdBelow = Self::CmdBelow,
        EvtAbove = Self::EvtAbove,
        EvtBelow = Self::EvtBelow,
        Management = Self::Management,
    >;

    /// Instantiate this stage against `ctx`. Called exactly once per
    /// pipeline instantiation.
    fn apply(&self, ctx: &mut Context) -> Self::Pipe;
}
