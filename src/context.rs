//! Per-pipeline mutable scratch and capability injection point.
//!
//! A `Context` is created once per pipeline instance and mutated only by
//! the single logical thread driving injections; sharing one across
//! pipelines or threads is a usage error this crate does not detect.
//!
//! An earlier design routed a stage's "emit exactly one command/event"
//! case through a pair of reference-identity-compared slots on the
//! context. This crate instead lets [`Emission`] carry the value directly
//! in its `OneCommand`/`OneEvent` variants, so `single_command`/
//! `single_event`/`nothing`/`dealias` are plain, stateless constructors.
//! They stay methods on `Context` so stage authors write the documented
//! call shape (`ctx.single_command(c)`), even though no mutable slot
//! backs them.

use std::sync::Arc;

use crate::emission::Emission;

/// Per-pipeline state: the fast-path emission constructors plus any
/// capabilities ("extensions") a stage needs from its host.
///
/// A composed pipeline uses exactly one `Context`, built with whichever
/// capabilities the union of its stages require, instead of
/// parameterizing the type per stage.
pub struct Context {
    scheduler: Option<Arc<dyn Scheduler + Send + Sync>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// A context with no capabilities attached.
    pub fn new() -> Self {
        Self { scheduler: None }
    }

    /// A context carrying a scheduler capability, for stages (like the
    /// reference tick stage) that need to request redelivery of a message
    /// after a delay.
    pub fn with_scheduler(scheduler: Arc<dyn Scheduler + Send + Sync>) -> Self {
        Self {
            scheduler: Some(scheduler),
        }
    }

    /// Attach (or replace) the scheduler capability on an existing context.
    pub fn set_scheduler(&mut self, scheduler: Arc<dyn Scheduler + Send + Sync>) {
        self.scheduler = Some(scheduler);
    }

    /// The scheduler capability, if this pipeline was built with one.
    pub fn scheduler(&self) -> Option<&(dyn Scheduler + Send + Sync)> {
        self.scheduler.as_deref()
    }

    /// Emit exactly one downward command, via the allocation-free fast
    /// path.
    pub fn single_command<EA, CB>(&self, cmd: CB) -> Emission<EA, CB> {
        Emission::OneCommand(cmd)
    }

    /// Emit exactly one upward event, via the allocation-free fast path.
    pub fn single_event<EA, CB>(&self, evt: EA) -> Emission<EA, CB> {
        Emission::OneEvent(evt)
    }

    /// The shared empty-emission value.
    pub fn nothing<EA, CB>(&self) -> Emission<EA, CB> {
        Emission::Empty
    }

    /// Materialize `em` into an emission independent of any fast-path
    /// slot. A no-op under this crate's enum-based `Emission`
    /// representation: there is no slot to read, so the value passed in is
    /// already materialized. Kept so dispatch-core call sites read the
    /// same regardless of which representation backs `Emission`.
    pub fn dealias<EA, CB>(&self, em: Emission<EA, CB>) -> Emission<EA, CB> {
        em
    }
}

/// A capability a [`Context`] can carry for stages that need to be
/// re-delivered a message after a delay (the reference tick stage).
///
/// Scheduling the actual delivery (threads, timers, an event loop) is an
/// external collaborator's job; this crate only defines the capability
/// shape a stage can depend on. [`crate::scheduler`] supplies a
/// tokio-backed implementation for hosts that want one.
pub trait Scheduler {
    /// Request that `msg` be redelivered as a management message after
    /// approximately `delay`. The concrete redelivery path (e.g. back
    /// into an [`crate::Injector`]) is up to the implementor.
    fn schedule_after(&self, delay: std::time::Duration, msg: Box<dyn std::any::Any + Send>);
}
