//! The instantiated, stateful runtime of a stage.
//!
//! A `PipePair` is produced once per pipeline by a [`crate::Stage`]
//! factory and may freely mutate its own state, but must not mutate state
//! owned by another stage; it is driven by one logical thread at a time.

use anyhow::Result;

use crate::context::Context;
use crate::emission::Emission;

/// The operational surface of one instantiated stage.
///
/// This crate carries no error taxonomy of its own: `anyhow::Result` is
/// the uniform currency through which a stage's own error type (typically
/// a small `thiserror` enum) reaches the [`crate::Injector`]'s sinks
/// intact.
pub trait PipePair {
    /// Command type accepted from the stage above (or from the Injector,
    /// for a root stage).
    type CmdAbove;
    /// Command type emitted to the stage below (or to the command sink,
    /// for a root stage).
    type CmdBelow;
    /// Event type emitted to the stage above (or to the event sink, for a
    /// root stage).
    type EvtAbove;
    /// Event type accepted from the stage below (or from the Injector,
    /// for a root stage).
    type EvtBelow;
    /// The out-of-band management message type this stage (and every
    /// other stage composed with it) is driven with.
    type Management;

    /// Transform a command arriving from above.
    fn on_command(
        &mut self,
        ctx: &mut Context,
        cmd: Self::CmdAbove,
    ) -> Result<Emission<Self::EvtAbove, Self::CmdBelow>>;

    /// Transform an event arriving from below.
    fn on_event(
        &mut self,
        ctx: &mut Context,
        evt: Self::EvtBelow,
    ) -> Result<Emission<Self::EvtAbove, Self::CmdBelow>>;

    /// Handle an out-of-band management message. A total function: a
    /// stage that has nothing to say about `msg` returns an empty
    /// emission.
    fn on_management(
        &mut self,
        ctx: &mut Context,
        msg: &Self::Management,
    ) -> Result<Emission<Self::EvtAbove, Self::CmdBelow>>;
}
