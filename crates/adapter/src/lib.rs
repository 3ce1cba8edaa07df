//! Headless adapter: drive the game over line-delimited JSON.
//!
//! Intended for bots and automated agents. The adapter talks over any
//! `AsyncBufRead`/`AsyncWrite` pair; the `snake-headless` binary wires it to
//! stdin/stdout.
//!
//! # Protocol Overview
//!
//! 1. **Handshake**: client sends `hello`, server replies `welcome` followed
//!    by an initial `observation`. Anything else before `hello` gets a
//!    `handshake_required` error.
//! 2. **Commanding**: `command` steers or restarts; the server replies `ack`
//!    with `accepted: false` when a direction was ignored as a reversal.
//! 3. **Realtime mode**: the game ticks on its own and an `observation` is
//!    streamed after each tick that changed the game.
//! 4. **Lockstep mode** (`SNAKE_LOCKSTEP=1`): the game only advances on
//!    `step`, which is answered with exactly one `observation`.
//! 5. **Shutdown**: `quit` or EOF ends the session.
//!
//! Malformed lines are answered with an `invalid_message` error and the
//! session continues.
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":{"name":"bot","version":"0.1"}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000000,"protocol_version":"1.0.0","board_size":16,"tick_ms":130,"lockstep":true}
//! Server -> Client: {"type":"observation","seq":1,"ts":1700000000000,"episode_id":0,"step":0,...}
//! Client -> Server: {"type":"command","seq":2,"action":"up"}
//! Server -> Client: {"type":"ack","seq":2,"ts":1700000000001,"status":"ok","accepted":true}
//! Client -> Server: {"type":"step","seq":3,"ticks":1}
//! Server -> Client: {"type":"observation","seq":2,"ts":1700000000002,"episode_id":0,"step":1,...}
//! ```

pub mod protocol;
pub mod session;

pub use tui_snake_core as core;
pub use tui_snake_types as types;

pub use protocol::*;
pub use session::{
    build_observation, run_session, state_hash, Flow, Replies, Session, SessionSummary,
};
