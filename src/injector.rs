//! External injection handle and terminal sinks.
//!
//! An [`Injector`] is built from a root [`Stage`], a [`Context`], and a
//! sink that receives whatever terminal commands exit the bottom of the
//! composed pipeline and whatever terminal events exit the top. Nothing
//! requires two separate sink values; a single type implementing both
//! [`CommandSink`] and [`EventSink`] works fine, and the reference demo
//! uses exactly that.

use anyhow::Result;
use tracing::trace;

use crate::context::Context;
use crate::emission::{Emission, EmissionItem};
use crate::pipe_pair::PipePair;
use crate::stage::Stage;

/// Receives terminal downward commands exiting the bottom of a pipeline.
pub trait CommandSink<CB> {
    /// A command reached the bottom of the pipeline.
    fn on_command(&mut self, cmd: CB);

    /// A stage raised while processing a command injection. The default
    /// behavior is to panic with the error's chain; override to log or
    /// swallow instead.
    fn on_command_failure(&mut self, err: anyhow::Error) {
        panic!("unhandled command-path failure: {err:#}");
    }
}

/// Receives terminal upward events exiting the top of a pipeline.
pub trait EventSink<EA> {
    /// An event reached the top of the pipeline.
    fn on_event(&mut self, evt: EA);

    /// Symmetric to [`CommandSink::on_command_failure`].
    fn on_event_failure(&mut self, err: anyhow::Error) {
        panic!("unhandled event-path failure: {err:#}");
    }
}

/// An external handle for feeding commands, events, and management
/// messages into a built pipeline.
///
/// Holds the root stage's instantiated [`PipePair`], a reference to the
/// [`Context`] driving it, and the sink terminal items are dispatched to.
pub struct Injector<'ctx, P: PipePair, S> {
    pipe: P,
    ctx: &'ctx mut Context,
    sink: S,
}

/// Build an [`Injector`] for `stage`, instantiating it against `ctx` and
/// routing terminal items to `sink`.
pub fn build<'ctx, T, S>(stage: &T, ctx: &'ctx mut Context, sink: S) -> Injector<'ctx, T::Pipe, S>
where
    T: Stage,
    S: CommandSink<T::CmdBelow> + EventSink<T::EvtAbove>,
{
    let pipe = stage.apply(ctx);
    Injector { pipe, ctx, sink }
}

impl<'ctx, P, S> Injector<'ctx, P, S>
where
    P: PipePair,
    S: CommandSink<P::CmdBelow> + EventSink<P::EvtAbove>,
{
    /// Inject a command from outside the pipeline (as if from "above" the
    /// root stage). On success, terminal items are dispatched to the
    /// matching sink in emission order; on failure, the error is routed to
    /// the command sink and no items from this injection are delivered.
    pub fn inject_command(&mut self, cmd: P::CmdAbove) {
        trace!("inject_command");
        match self.pipe.on_command(self.ctx, cmd) {
            Ok(em) => self.dispatch_terminal(em),
            Err(err) => self.sink.on_command_failure(err),
        }
    }

    /// Inject an event from outside the pipeline (as if from "below" the
    /// root stage). Symmetric to [`Self::inject_command`]; failures route
    /// to the event sink.
    pub fn inject_event(&mut self, evt: P::EvtBelow) {
        trace!("inject_event");
        match self.pipe.on_event(self.ctx, evt) {
            Ok(em) => self.dispatch_terminal(em),
            Err(err) => self.sink.on_event_failure(err),
        }
    }

    /// Submit a management message. Unlike the command/event paths,
    /// failures here are **not** caught; they propagate to the caller.
    pub fn management(&mut self, msg: &P::Management) -> Result<()> {
        trace!("management");
        let em = self.pipe.on_management(self.ctx, msg)?;
        self.dispatch_terminal(em);
        Ok(())
    }

    /// Access the sink, e.g. to drain what a test or host collaborator
    /// recorded across a batch of injections.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably access the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn dispatch_terminal(&mut self, em: Emission<P::EvtAbove, P::CmdBelow>) {
        // Recognizes the fast-path variants directly rather than routing
        // through `into_items`, avoiding a container for the 1-item case
        // even at the Injector boundary.
        match em {
            Emission::Empty => {}
            Emission::OneCommand(c) => self.sink.on_command(c),
            Emission::OneEvent(e) => self.sink.on_event(e),
            Emission::Many(items) => {
                for item in items {
                    match item {
                        EmissionItem::UpEvent(e) => self.sink.on_event(e),
                        EmissionItem::DownCommand(c) => self.sink.on_command(c),
                    }
                }
            }
        }
    }
}
