//! Protocol module - JSON message types for the headless adapter
//!
//! Line-delimited JSON. Every message carries a `type` tag and a `seq`;
//! outbound messages also carry `ts` (milliseconds since the Unix epoch).

use serde::{Deserialize, Serialize};

use arrayvec::ArrayVec;

use crate::types::{GameAction, TickOutcome, BOARD_CELLS, BOARD_SIZE};

pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Upper bound on ticks requested by a single `step` message.
pub const MAX_STEP_TICKS: u32 = 1000;

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Hello {
        seq: u64,
        #[serde(default)]
        client: Option<ClientInfo>,
    },
    Command {
        seq: u64,
        action: ActionName,
    },
    Step {
        seq: u64,
        #[serde(default = "default_step_ticks")]
        ticks: u32,
    },
    Observe {
        seq: u64,
    },
    Quit {
        #[serde(default)]
        seq: u64,
    },
}

impl ClientMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ClientMessage::Hello { seq, .. }
            | ClientMessage::Command { seq, .. }
            | ClientMessage::Step { seq, .. }
            | ClientMessage::Observe { seq }
            | ClientMessage::Quit { seq } => *seq,
        }
    }
}

fn default_step_ticks() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Action string accepted by `command` (`up|down|left|right|restart`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionName(pub GameAction);

impl<'de> Deserialize<'de> for ActionName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        GameAction::from_str(&s)
            .map(ActionName)
            .ok_or_else(|| serde::de::Error::custom("unknown action"))
    }
}

pub fn parse_message(line: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(line)
}

/// Pull `seq` out of a line that failed to parse, so errors can echo it.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

/// Response to `hello`
#[derive(Debug, Clone, Serialize)]
pub struct WelcomeMessage {
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: &'static str,
    pub board_size: u8,
    pub tick_ms: u32,
    pub lockstep: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Ok,
}

/// Acknowledgment for a `command`; `accepted` is false for ignored reversals.
#[derive(Debug, Clone, Serialize)]
pub struct AckMessage {
    pub seq: u64,
    pub ts: u64,
    pub status: AckStatus,
    pub accepted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    InvalidMessage,
    InvalidCommand,
    LockstepRequired,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub size: u8,
    /// Row-major cell codes: 0 empty, 1 head, 2 body, 3 food.
    pub cells: [[u8; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LastEvent {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collision: Option<&'static str>,
}

impl From<TickOutcome> for LastEvent {
    fn from(value: TickOutcome) -> Self {
        Self {
            kind: value.as_str(),
            collision: match value {
                TickOutcome::Collided(c) => Some(c.as_str()),
                _ => None,
            },
        }
    }
}

/// Stable 64-bit state digest, serialized as 16 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

/// Full game state pushed to the client
#[derive(Debug, Clone, Serialize)]
pub struct ObservationMessage {
    pub seq: u64,
    pub ts: u64,
    pub episode_id: u32,
    pub step: u32,
    pub running: bool,
    pub game_over: bool,
    pub score: u32,
    pub length: u16,
    pub direction: &'static str,
    pub pending_direction: &'static str,
    /// Head first, `[x, y]` pairs.
    pub snake: ArrayVec<[i8; 2], BOARD_CELLS>,
    pub food: Option<[i8; 2]>,
    pub board: BoardSnapshot,
    pub last_event: Option<LastEvent>,
    pub state_hash: StateHash,
}
