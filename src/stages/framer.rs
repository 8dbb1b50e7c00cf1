//! Length-prefix framing: the reference illustration of this crate's
//! composition model over a concrete wire codec.
//!
//! This stage is illustrative, not part of the core: it exists to give
//! the composition algebra something real to compose. Downward, a
//! complete payload is prefixed with a 4-byte big-endian `u32` carrying
//! the length of the *whole* frame, prefix included (payload + 4), and
//! emitted as one outgoing buffer. Upward, arbitrary (possibly partial,
//! possibly multi-frame) chunks of incoming bytes are buffered until
//! complete frames can be peeled off using that same convention.

use anyhow::Result;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;
use tracing::{trace, warn};

use crate::context::Context;
use crate::emission::{Emission, EmissionItem};
use crate::pipe_pair::PipePair;
use crate::stage::Stage;

const LENGTH_PREFIX_LEN: usize = 4;

/// Errors local to the framer. Converted to `anyhow::Error` at the
/// `PipePair` boundary; the core carries no error taxonomy of its own.
#[derive(Debug, Error)]
pub enum FramerError {
    /// A length prefix on the read side claimed a frame larger than
    /// `max_frame_len`. Fatal: an oversize frame on read is a protocol
    /// violation the stage cannot recover from, unlike the write side's
    /// silent drop.
    #[error("incoming frame length {len} exceeds maximum {max}")]
    FrameTooLarge { len: usize, max: usize },

    /// A length prefix read back less than `LENGTH_PREFIX_LEN`, which
    /// cannot encode a valid frame (the prefix alone already accounts for
    /// 4 of those bytes). Always a protocol violation, never a sizing
    /// choice, so it is not gated behind `max_frame_len`.
    #[error("frame length {len} is smaller than the length prefix itself")]
    FrameTooShort { len: usize },
}

/// A stage that length-prefix frames commands flowing down and
/// de-frames bytes flowing up.
#[derive(Debug, Clone, Copy)]
pub struct LengthPrefixFramer {
    max_frame_len: usize,
}

impl LengthPrefixFramer {
    /// A framer that silently drops (on write) or fails (on read) any
    /// frame whose payload exceeds `max_frame_len` bytes.
    pub fn new(max_frame_len: usize) -> Self {
        Self { max_frame_len }
    }
}

impl Stage for LengthPrefixFramer {
    type CmdAbove = Bytes;
    type CmdBelow = Bytes;
    type EvtAbove = Bytes;
    type EvtBelow = Bytes;
    type Management = crate::control::Control;
    type Pipe = FramerPipe;

    fn apply(&self, _ctx: &mut Context) -> Self::Pipe {
        FramerPipe {
            max_frame_len: self.max_frame_len,
            incoming: BytesMut::new(),
        }
    }
}

/// The instantiated runtime of [`LengthPrefixFramer`]. Owns the partial
/// receive buffer; nothing else about the stage is stateful.
pub struct FramerPipe {
    max_frame_len: usize,
    incoming: BytesMut,
}

impl PipePair for FramerPipe {
    type CmdAbove = Bytes;
    type CmdBelow = Bytes;
    type EvtAbove = Bytes;
    type EvtBelow = Bytes;
    type Management = crate::control::Control;

    fn on_command(&mut self, ctx: &mut Context, cmd: Bytes) -> Result<Emission<Bytes, Bytes>> {
        let total_len = LENGTH_PREFIX_LEN + cmd.len();
        if total_len > self.max_frame_len {
            warn!(
                len = total_len,
                max = self.max_frame_len,
                "dropping oversize outgoing frame"
            );
            return Ok(ctx.nothing());
        }
        let mut out = BytesMut::with_capacity(total_len);
        out.put_u32(total_len as u32);
        out.extend_from_slice(&cmd);
        Ok(ctx.single_command(out.freeze()))
    }

    fn on_event(&mut self, ctx: &mut Context, evt: Bytes) -> Result<Emission<Bytes, Bytes>> {
        self.incoming.extend_from_slice(&evt);

        let mut frames = Vec::new();
        loop {
            if self.incoming.len() < LENGTH_PREFIX_LEN {
                break;
            }
            let mut prefix = &self.incoming[..LENGTH_PREFIX_LEN];
            let total_len = prefix.get_u32() as usize;
            if total_len > self.max_frame_len {
                return Err(FramerError::FrameTooLarge {
                    len: total_len,
                    max: self.max_frame_len,
                }
                .into());
            }
            if total_len < LENGTH_PREFIX_LEN {
                return Err(FramerError::FrameTooShort { len: total_len }.into());
            }
            if self.incoming.len() < total_len {
                break;
            }
            self.incoming.advance(LENGTH_PREFIX_LEN);
            let frame = self.incoming.split_to(total_len - LENGTH_PREFIX_LEN).freeze();
            trace!(total_len, "decoded complete frame");
            frames.push(EmissionItem::UpEvent(frame));
        }
        Ok(Emission::from_items(frames))
    }

    fn on_management(
        &mut self,
        ctx: &mut Context,
        _msg: &crate::control::Control,
    ) -> Result<Emission<Bytes, Bytes>> {
        Ok(ctx.nothing())
    }
}
