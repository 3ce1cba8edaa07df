//! One adapter session over a line-oriented reader/writer pair.
//!
//! [`Session`] is the synchronous protocol state machine; [`run_session`]
//! drives it from async I/O and, in realtime mode, from a tick interval.

use std::hash::{Hash, Hasher};
use std::time::Duration;

use anyhow::Result;
use arrayvec::ArrayVec;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::core::{GameState, RunConfig};
use crate::protocol::*;
use crate::types::{TickOutcome, BOARD_CELLS, BOARD_SIZE, MIN_TICK_MS};

/// Stable 64-bit FNV-1a hasher for deterministic `state_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Digest of everything an observation reports about the game.
pub fn state_hash(game: &GameState) -> StateHash {
    let mut hasher = Fnv1aHasher::new();
    game.snake().segments().hash(&mut hasher);
    game.food().hash(&mut hasher);
    game.direction().hash(&mut hasher);
    game.pending_direction().hash(&mut hasher);
    game.running().hash(&mut hasher);
    game.game_over().hash(&mut hasher);
    game.episode_id().hash(&mut hasher);
    game.step().hash(&mut hasher);
    game.seed().hash(&mut hasher);
    game.last_event().hash(&mut hasher);
    StateHash(hasher.finish())
}

/// Build a full observation of `game` (no heap beyond the message itself).
pub fn build_observation(seq: u64, game: &GameState) -> ObservationMessage {
    let grid = game.render_cells();
    let mut cells = [[0u8; BOARD_SIZE as usize]; BOARD_SIZE as usize];
    for (dst, src) in cells.iter_mut().zip(grid.iter()) {
        for (d, kind) in dst.iter_mut().zip(src.iter()) {
            *d = kind.code();
        }
    }

    let snake: ArrayVec<[i8; 2], BOARD_CELLS> = game
        .snake()
        .segments()
        .iter()
        .map(|p| [p.x, p.y])
        .collect();

    ObservationMessage {
        seq,
        ts: current_timestamp_ms(),
        episode_id: game.episode_id(),
        step: game.step(),
        running: game.running(),
        game_over: game.game_over(),
        score: game.score(),
        length: game.length() as u16,
        direction: game.direction().as_str(),
        pending_direction: game.pending_direction().as_str(),
        snake,
        food: game.food().map(|p| [p.x, p.y]),
        board: BoardSnapshot {
            size: BOARD_SIZE as u8,
            cells,
        },
        last_event: game.last_event().map(LastEvent::from),
        state_hash: state_hash(game),
    }
}

/// Replies produced by one inbound line. `hello` yields two; everything else one.
pub type Replies = ArrayVec<ServerMessage, 2>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Totals reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub lines: u64,
    pub ticks: u64,
    pub episodes: u32,
    pub final_score: u32,
}

pub struct Session {
    config: RunConfig,
    game: GameState,
    greeted: bool,
    next_obs_seq: u64,
    summary: SessionSummary,
}

impl Session {
    pub fn new(config: RunConfig) -> Self {
        let game = GameState::new(config.seed);
        Self {
            config,
            game,
            greeted: false,
            next_obs_seq: 1,
            summary: SessionSummary::default(),
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn greeted(&self) -> bool {
        self.greeted
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            episodes: self.game.episode_id() + 1,
            final_score: self.game.score(),
            ..self.summary
        }
    }

    /// Handle one inbound line, pushing any replies into `out`.
    pub fn handle_line(&mut self, line: &str, out: &mut Replies) -> Flow {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }
        self.summary.lines += 1;

        let msg = match parse_message(line) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "invalid message");
                let seq = extract_seq_best_effort(line).unwrap_or(0);
                out.push(error(seq, ErrorCode::InvalidMessage, e.to_string()));
                return Flow::Continue;
            }
        };

        match msg {
            ClientMessage::Quit { seq } => {
                info!(seq, "client quit");
                return Flow::Quit;
            }
            ClientMessage::Hello { seq, client } => {
                match &client {
                    Some(c) => info!(seq, name = %c.name, version = %c.version, "hello"),
                    None => info!(seq, "hello"),
                }
                self.greeted = true;
                out.push(ServerMessage::Welcome(WelcomeMessage {
                    seq,
                    ts: current_timestamp_ms(),
                    protocol_version: PROTOCOL_VERSION,
                    board_size: BOARD_SIZE as u8,
                    tick_ms: self.config.tick_ms,
                    lockstep: self.config.lockstep,
                }));
                out.push(self.observation());
            }
            other if !self.greeted => {
                out.push(error(
                    other.seq(),
                    ErrorCode::HandshakeRequired,
                    "send hello first".to_string(),
                ));
            }
            ClientMessage::Command { seq, action } => {
                let accepted = self.game.apply_action(action.0);
                debug!(seq, action = action.0.as_str(), accepted, "command");
                out.push(ServerMessage::Ack(AckMessage {
                    seq,
                    ts: current_timestamp_ms(),
                    status: AckStatus::Ok,
                    accepted,
                }));
            }
            ClientMessage::Step { seq, ticks } => {
                if !self.config.lockstep {
                    out.push(error(
                        seq,
                        ErrorCode::LockstepRequired,
                        "step is only available in lockstep mode".to_string(),
                    ));
                } else if ticks == 0 || ticks > MAX_STEP_TICKS {
                    out.push(error(
                        seq,
                        ErrorCode::InvalidCommand,
                        format!("ticks must be in 1..={MAX_STEP_TICKS}"),
                    ));
                } else {
                    for _ in 0..ticks {
                        self.game.tick();
                    }
                    self.summary.ticks += ticks as u64;
                    out.push(self.observation());
                }
            }
            ClientMessage::Observe { .. } => out.push(self.observation()),
        }
        Flow::Continue
    }

    /// Realtime tick. Returns an observation when the game changed.
    pub fn on_tick(&mut self) -> Option<ServerMessage> {
        if !self.greeted {
            return None;
        }
        self.summary.ticks += 1;
        match self.game.tick() {
            TickOutcome::Idle => None,
            _ => Some(self.observation()),
        }
    }

    fn observation(&mut self) -> ServerMessage {
        let seq = self.next_obs_seq;
        self.next_obs_seq += 1;
        ServerMessage::Observation(build_observation(seq, &self.game))
    }
}

fn error(seq: u64, code: ErrorCode, message: String) -> ServerMessage {
    ServerMessage::Error(ErrorMessage {
        seq,
        ts: current_timestamp_ms(),
        code,
        message,
    })
}

/// Run one session until `quit` or EOF on `reader`.
///
/// In realtime mode the game ticks every `tick_ms` and an observation is
/// written after each tick that changed something. In lockstep mode the game
/// only advances on `step`.
pub async fn run_session<R, W>(config: RunConfig, reader: R, mut writer: W) -> Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let lockstep = config.lockstep;
    let period = config
        .tick_duration()
        .max(Duration::from_millis(MIN_TICK_MS as u64));
    info!(tick_ms = config.tick_ms, seed = config.seed, lockstep, "session start");

    let mut session = Session::new(config);
    let mut lines = reader.lines();
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut buf = Vec::with_capacity(4096);
    let mut replies = Replies::new();

    loop {
        tokio::select! {
            biased;

            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed");
                    break;
                };
                replies.clear();
                let flow = session.handle_line(&line, &mut replies);
                for msg in &replies {
                    send(&mut writer, msg, &mut buf).await?;
                }
                if flow == Flow::Quit {
                    break;
                }
            }
            _ = interval.tick(), if !lockstep => {
                if let Some(msg) = session.on_tick() {
                    send(&mut writer, &msg, &mut buf).await?;
                }
            }
        }
    }

    let summary = session.summary();
    info!(
        lines = summary.lines,
        ticks = summary.ticks,
        episodes = summary.episodes,
        final_score = summary.final_score,
        "session end"
    );
    Ok(summary)
}

async fn send<W: AsyncWrite + Unpin>(
    writer: &mut W,
    msg: &ServerMessage,
    buf: &mut Vec<u8>,
) -> Result<()> {
    buf.clear();
    serde_json::to_writer(&mut *buf, msg)?;
    buf.push(b'\n');
    writer.write_all(buf).await?;
    writer.flush().await?;
    Ok(())
}

fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, GameAction};

    fn lockstep() -> RunConfig {
        RunConfig {
            tick_ms: 130,
            seed: 7,
            lockstep: true,
        }
    }

    fn handle(session: &mut Session, line: &str) -> (Flow, Replies) {
        let mut out = Replies::new();
        let flow = session.handle_line(line, &mut out);
        (flow, out)
    }

    #[test]
    fn commands_before_hello_are_rejected() {
        let mut s = Session::new(lockstep());
        let (flow, out) = handle(&mut s, r#"{"type":"step","seq":3}"#);
        assert_eq!(flow, Flow::Continue);
        match &out[0] {
            ServerMessage::Error(e) => {
                assert_eq!(e.code, ErrorCode::HandshakeRequired);
                assert_eq!(e.seq, 3);
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert_eq!(s.game().step(), 0);
    }

    #[test]
    fn hello_yields_welcome_then_observation() {
        let mut s = Session::new(lockstep());
        let (_, out) = handle(&mut s, r#"{"type":"hello","seq":1}"#);
        assert_eq!(out.len(), 2);
        assert!(matches!(&out[0], ServerMessage::Welcome(w) if w.seq == 1 && w.lockstep));
        match &out[1] {
            ServerMessage::Observation(o) => {
                assert_eq!(o.seq, 1);
                assert_eq!(o.length, 3);
                assert_eq!(o.snake[0], [8, 8]);
                assert_eq!(o.board.cells[8][8], 1);
            }
            other => panic!("expected observation, got {other:?}"),
        }
    }

    #[test]
    fn step_advances_and_observation_seq_increases() {
        let mut s = Session::new(lockstep());
        handle(&mut s, r#"{"type":"hello","seq":1}"#);
        let (_, out) = handle(&mut s, r#"{"type":"command","seq":2,"action":"down"}"#);
        assert!(matches!(&out[0], ServerMessage::Ack(a) if a.seq == 2 && a.accepted));

        let (_, out) = handle(&mut s, r#"{"type":"step","seq":3,"ticks":2}"#);
        match &out[0] {
            ServerMessage::Observation(o) => {
                assert_eq!(o.seq, 2);
                assert_eq!(o.step, 2);
                assert_eq!(o.direction, "down");
                assert_eq!(o.snake[0], [8, 10]);
            }
            other => panic!("expected observation, got {other:?}"),
        }
    }

    #[test]
    fn reversal_is_acked_but_not_accepted() {
        let mut s = Session::new(lockstep());
        handle(&mut s, r#"{"type":"hello","seq":1}"#);
        let (_, out) = handle(&mut s, r#"{"type":"command","seq":2,"action":"left"}"#);
        assert!(matches!(&out[0], ServerMessage::Ack(a) if !a.accepted));
        assert_eq!(s.game().pending_direction(), Direction::Right);
    }

    #[test]
    fn step_bounds_and_mode_are_checked() {
        let mut s = Session::new(lockstep());
        handle(&mut s, r#"{"type":"hello","seq":1}"#);
        let (_, out) = handle(&mut s, r#"{"type":"step","seq":2,"ticks":0}"#);
        assert!(matches!(&out[0], ServerMessage::Error(e) if e.code == ErrorCode::InvalidCommand));

        let mut rt = Session::new(RunConfig {
            lockstep: false,
            ..lockstep()
        });
        handle(&mut rt, r#"{"type":"hello","seq":1}"#);
        let (_, out) = handle(&mut rt, r#"{"type":"step","seq":2}"#);
        assert!(matches!(&out[0], ServerMessage::Error(e) if e.code == ErrorCode::LockstepRequired));
    }

    #[test]
    fn malformed_line_keeps_session_alive() {
        let mut s = Session::new(lockstep());
        let (flow, out) = handle(&mut s, r#"{"seq": 9, "type": "#);
        assert_eq!(flow, Flow::Continue);
        assert!(matches!(&out[0], ServerMessage::Error(e)
            if e.code == ErrorCode::InvalidMessage && e.seq == 9));

        let (flow, out) = handle(&mut s, "   ");
        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
    }

    #[test]
    fn quit_ends_session() {
        let mut s = Session::new(lockstep());
        let (flow, out) = handle(&mut s, r#"{"type":"quit","seq":1}"#);
        assert_eq!(flow, Flow::Quit);
        assert!(out.is_empty());
    }

    #[test]
    fn on_tick_is_silent_until_greeted_and_after_game_over() {
        let mut s = Session::new(RunConfig {
            lockstep: false,
            ..lockstep()
        });
        assert!(s.on_tick().is_none());
        handle(&mut s, r#"{"type":"hello","seq":1}"#);
        assert!(s.on_tick().is_some());

        // Run into the right wall.
        while !s.game().game_over() {
            s.on_tick();
        }
        assert!(s.on_tick().is_none());
    }

    #[test]
    fn state_hash_tracks_state() {
        let a = GameState::new(3);
        let b = GameState::new(3);
        assert_eq!(state_hash(&a), state_hash(&b));

        let mut c = GameState::new(3);
        c.apply_action(GameAction::Steer(Direction::Up));
        assert_ne!(state_hash(&a), state_hash(&c));

        c.tick();
        let obs = build_observation(1, &c);
        assert_eq!(obs.snake[0], [8, 7]);
        assert_eq!(obs.state_hash, state_hash(&c));
        assert_eq!(obs.last_event.map(|e| e.kind), Some("moved"));
    }

    #[test]
    fn observation_marks_food_cell() {
        let game = GameState::new(11);
        let obs = build_observation(1, &game);
        let food = game.food().unwrap();
        assert_eq!(obs.food, Some([food.x, food.y]));
        assert_eq!(obs.board.cells[food.y as usize][food.x as usize], 3);
        assert!(!game.snake().occupies(food));
    }
}
