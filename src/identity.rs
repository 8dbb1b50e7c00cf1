//! The passthrough stage: commands and events cross unchanged.
//!
//! Useful on its own as the simplest possible [`Stage`] and, composed
//! vertically or in parallel with anything else, as a no-op unit for the
//! composition algebra: stacking `Identity` over `S` behaves exactly like
//! `S` alone, which is what the test suite here and in `compose::vertical`
//! leans on. Also the vehicle for the "identity-over-passthrough" and
//! "fast-path equivalence" tests below.

use std::marker::PhantomData;

use anyhow::Result;

use crate::context::Context;
use crate::emission::Emission;
use crate::pipe_pair::PipePair;
use crate::stage::Stage;

/// A stage that forwards every command and event unchanged and declines
/// every management message.
///
/// `T` is the shared command/event type; `M` is the management message
/// type this instance is driven with.
pub struct Identity<T, M> {
    _marker: PhantomData<fn() -> (T, M)>,
}

impl<T, M> Identity<T, M> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T, M> Default for Identity<T, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, M> Stage for Identity<T, M> {
    type CmdAbove = T;
    type CmdBelow = T;
    type EvtAbove = T;
    type EvtBelow = T;
    type Management = M;
    type Pipe = IdentityPipe<T, M>;

    fn apply(&self, _ctx: &mut Context) -> Self::Pipe {
        IdentityPipe {
            _marker: PhantomData,
        }
    }
}

/// The instantiated runtime of [`Identity`]. Carries no state.
pub struct IdentityPipe<T, M> {
    _marker: PhantomData<fn() -> (T, M)>,
}

impl<T, M> PipePair for IdentityPipe<T, M> {
    type CmdAbove = T;
    type CmdBelow = T;
    type EvtAbove = T;
    type EvtBelow = T;
    type Management = M;

    fn on_command(&mut self, ctx: &mut Context, cmd: T) -> Result<Emission<T, T>> {
        Ok(ctx.single_command(cmd))
    }

    fn on_event(&mut self, ctx: &mut Context, evt: T) -> Result<Emission<T, T>> {
        Ok(ctx.single_event(evt))
    }

    fn on_management(&mut self, ctx: &mut Context, _msg: &M) -> Result<Emission<T, T>> {
        Ok(ctx.nothing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::injector::{build, CommandSink, EventSink};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct VecSinks {
        commands: Rc<RefCell<Vec<String>>>,
        events: Rc<RefCell<Vec<String>>>,
    }

    impl CommandSink<String> for VecSinks {
        fn on_command(&mut self, cmd: String) {
            self.commands.borrow_mut().push(cmd);
        }
    }
    impl EventSink<String> for VecSinks {
        fn on_event(&mut self, evt: String) {
            self.events.borrow_mut().push(evt);
        }
    }

    #[test]
    fn forwards_command_unchanged() {
        let mut ctx = Context::new();
        let sink = VecSinks::default();
        let commands_seen = sink.commands.clone();
        let mut injector = build(&Identity::<String, ()>::new(), &mut ctx, sink);
        injector.inject_command("payload".to_string());
        assert_eq!(*commands_seen.borrow(), vec!["payload".to_string()]);
    }

    #[test]
    fn forwards_event_unchanged() {
        let mut ctx = Context::new();
        let sink = VecSinks::default();
        let events_seen = sink.events.clone();
        let mut injector = build(&Identity::<String, ()>::new(), &mut ctx, sink);
        injector.inject_event("payload".to_string());
        assert_eq!(*events_seen.borrow(), vec!["payload".to_string()]);
    }

    #[test]
    fn declines_every_management_message() {
        let stage = Identity::<String, &'static str>::new();
        let mut ctx = Context::new();
        let mut pipe = stage.apply(&mut ctx);
        let em = pipe.on_management(&mut ctx, &"tick").unwrap();
        assert!(em.is_empty());
    }

    #[test]
    fn fast_path_equivalent_to_materialized_many() {
        // Replacing single_command/single_event with an equivalent
        // materialized Emission must be observationally identical at the
        // sink.
        struct MaterializedIdentity;
        struct MaterializedIdentityPipe;
        impl Stage for MaterializedIdentity {
            type CmdAbove = String;
            type CmdBelow = String;
            type EvtAbove = String;
            type EvtBelow = String;
            type Management = ();
            type Pipe = MaterializedIdentityPipe;
            fn apply(&self, _ctx: &mut Context) -> MaterializedIdentityPipe {
                MaterializedIdentityPipe
            }
        }
        impl PipePair for MaterializedIdentityPipe {
            type CmdAbove = String;
            type CmdBelow = String;
            type EvtAbove = String;
            type EvtBelow = String;
            type Management = ();
            fn on_command(
                &mut self,
                _ctx: &mut Context,
                cmd: String,
            ) -> Result<Emission<String, String>> {
                Ok(Emission::Many(vec![crate::emission::EmissionItem::DownCommand(cmd)]))
            }
            fn on_event(
                &mut self,
                _ctx: &mut Context,
                evt: String,
            ) -> Result<Emission<String, String>> {
                Ok(Emission::Many(vec![crate::emission::EmissionItem::UpEvent(evt)]))
            }
            fn on_management(
                &mut self,
                ctx: &mut Context,
                _msg: &(),
            ) -> Result<Emission<String, String>> {
                Ok(ctx.nothing())
            }
        }

        let mut ctx_fast = Context::new();
        let sink_fast = VecSinks::default();
        let commands_fast = sink_fast.commands.clone();
        let mut injector_fast =
            build(&Identity::<String, ()>::new(), &mut ctx_fast, sink_fast);
        injector_fast.inject_command("x".to_string());

        let mut ctx_many = Context::new();
        let sink_many = VecSinks::default();
        let commands_many = sink_many.commands.clone();
        let mut injector_many = build(&MaterializedIdentity, &mut ctx_many, sink_many);
        injector_many.inject_command("x".to_string());

        assert_eq!(*commands_fast.borrow(), *commands_many.borrow());
    }
}
