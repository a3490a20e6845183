//! Line-oriented TCP channel transport.
//!
//! The feed daemon speaks a text protocol over several independent TCP
//! connections. This crate provides the per-channel plumbing shared by
//! all of them:
//! - `TcpChannel`: owns one socket, an asynchronous read loop, and an
//!   outbound write queue
//! - `LineBuffer`: carry-over framing that turns a byte stream into
//!   complete lines
//! - `ChannelHandle`: clonable fire-and-forget sender with access to
//!   the channel lifecycle state

pub mod channel;
pub mod error;
pub mod framing;
pub mod state;

pub use channel::{ChannelHandle, ChunkHandler, TcpChannel, READ_BUFFER_SIZE};
pub use error::{NetError, NetResult};
pub use framing::LineBuffer;
pub use state::ChannelState;
