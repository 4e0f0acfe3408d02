#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The authoritative Gridlock level simulation.
//!
//! A [`LevelState`] is built once from a static level description and then
//! stepped forward exclusively through [`LevelState::tick`], 60 calls per
//! logical second, three subticks per 20 Hz move tick. Each call advances
//! the counters, pulls input (live or from a recorded solution), delivers
//! edge-triggered wire pulses, runs the decision phase over every deciding
//! actor, runs the move phase, propagates circuit power, and evaluates the
//! win condition. Given the same description and the same per-subtick
//! inputs the resulting state is byte-identical across runs and platforms;
//! recorded solutions depend on that.

mod actor;
mod behavior;
mod kind;
mod rng;
mod tile;
mod wires;

pub use actor::CollisionResult;

use gridlock_core::{
    ActorId, BlobMode, CameraType, Connection, Direction, GameState, GlitchEvent, KeyInputs,
    LevelData, LevelOutcome, PlayablesRequired, Position, SolutionData, SolutionStep,
    unpack_wire_byte,
};
use thiserror::Error;

use actor::Actor;
use kind::ActorKind;
use rng::{BlobPrng, Prng};
use tile::Field;
use wires::Circuit;

/// Subticks per logical game tick.
pub const SUBTICKS_PER_TICK: u32 = 3;
/// Tick calls per second of game time.
pub const SUBTICKS_PER_SECOND: u32 = 60;

/// Errors raised while constructing a level or starting a playback.
///
/// These are fail-fast: no partially built level is ever returned.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The description declared a zero-sized field.
    #[error("level dimensions must be nonzero")]
    ZeroDimension,
    /// The field array does not match the declared dimensions.
    #[error("field shape does not match the declared {width}x{height} size")]
    FieldShape {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// An actor seed used an id the engine does not know.
    #[error("cannot find actor with id {0:?}")]
    UnknownActorKind(String),
    /// A solution without steps cannot be played back.
    #[error("the solution must have steps")]
    EmptySolution,
}

/// Latches tracking which one-shot keys have been released since their
/// last use; a held key only acts once until it is let go.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ReleasedKeys {
    pub(crate) drop: bool,
    pub(crate) rotate_inv: bool,
    pub(crate) switch_playable: bool,
}

impl Default for ReleasedKeys {
    fn default() -> Self {
        Self {
            drop: true,
            rotate_inv: true,
            switch_playable: true,
        }
    }
}

/// Cursor into a recorded solution's `(input, hold)` steps.
#[derive(Clone, Debug)]
pub(crate) struct SolutionPlayback {
    steps: Vec<SolutionStep>,
    index: usize,
    subticks_left: i64,
}

/// The complete mutable state of one level attempt.
#[derive(Clone, Debug)]
pub struct LevelState {
    pub(crate) field: Field,
    pub(crate) arena: Vec<Actor>,
    pub(crate) actors: Vec<ActorId>,
    pub(crate) deciding_actors: Vec<ActorId>,
    pub(crate) despawned_actors: Vec<ActorId>,
    pub(crate) playables: Vec<ActorId>,
    pub(crate) selected_playable: Option<ActorId>,
    pub(crate) playables_to_swap: bool,
    pub(crate) playables_left: u32,
    pub(crate) playables_required_all: bool,
    pub(crate) subtick: u8,
    pub(crate) current_tick: u32,
    pub(crate) global_subtick: u64,
    pub(crate) level_started: bool,
    pub(crate) game_state: GameState,
    pub(crate) game_input: KeyInputs,
    pub(crate) released_keys: ReleasedKeys,
    pub(crate) chips_left: u32,
    pub(crate) chips_total: u32,
    pub(crate) chips_required: u32,
    pub(crate) time_left: u32,
    pub(crate) timer_frozen: bool,
    pub(crate) bonus_points: u32,
    pub(crate) hints: Vec<String>,
    pub(crate) default_hint: Option<String>,
    pub(crate) rff_direction: Direction,
    pub(crate) prng: Prng,
    pub(crate) blob_prng: BlobPrng,
    pub(crate) connections: Vec<Connection>,
    pub(crate) camera: CameraType,
    pub(crate) circuits: Vec<Circuit>,
    pub(crate) circuit_inputs: Vec<ActorId>,
    pub(crate) circuit_outputs: Vec<ActorId>,
    pub(crate) circuit_output_states: Vec<bool>,
    pub(crate) glitches: Vec<GlitchEvent>,
    pub(crate) playback: Option<SolutionPlayback>,
    pub(crate) created_n: u32,
}

/// Builds a level from its description with the default blob seed.
pub fn build_level(data: &LevelData) -> Result<LevelState, LevelError> {
    build_level_seeded(data, None)
}

/// Builds a level from its description.
///
/// `blob_seed` overrides the blob RNG seed; levels using the randomized
/// blob mode expect the driver to supply one (the engine itself never
/// reaches for ambient randomness).
pub fn build_level_seeded(
    data: &LevelData,
    blob_seed: Option<u8>,
) -> Result<LevelState, LevelError> {
    if data.width == 0 || data.height == 0 {
        return Err(LevelError::ZeroDimension);
    }
    if data.field.len() != data.width as usize
        || data
            .field
            .iter()
            .any(|column| column.len() != data.height as usize)
    {
        return Err(LevelError::FieldShape {
            width: data.width,
            height: data.height,
        });
    }

    let four_pattern = data.blob_mode == BlobMode::FourPattern;
    let seed = blob_seed.unwrap_or(BlobPrng::DEFAULT_SEED);
    let mut level = LevelState {
        field: Field::new(data.width, data.height),
        arena: Vec::new(),
        actors: Vec::new(),
        deciding_actors: Vec::new(),
        despawned_actors: Vec::new(),
        playables: Vec::new(),
        selected_playable: None,
        playables_to_swap: false,
        playables_left: match data.playables_required {
            PlayablesRequired::All => 0,
            PlayablesRequired::Count(count) => count,
        },
        playables_required_all: data.playables_required == PlayablesRequired::All,
        subtick: 0,
        current_tick: 0,
        global_subtick: 0,
        level_started: false,
        game_state: GameState::Playing,
        game_input: KeyInputs::NONE,
        released_keys: ReleasedKeys::default(),
        chips_left: 0,
        chips_total: 0,
        chips_required: data.extra_chips_required,
        time_left: data.time_limit * SUBTICKS_PER_SECOND,
        timer_frozen: false,
        bonus_points: 0,
        hints: data.hints.clone(),
        default_hint: data.default_hint.clone(),
        rff_direction: Direction::Up,
        prng: Prng::new(),
        blob_prng: BlobPrng::new(seed, four_pattern),
        connections: data.connections.clone(),
        camera: data.camera,
        circuits: Vec::new(),
        circuit_inputs: Vec::new(),
        circuit_outputs: Vec::new(),
        circuit_output_states: Vec::new(),
        glitches: Vec::new(),
        playback: None,
        created_n: 0,
    };

    // Seeds are instantiated in reverse reading order and the lists are
    // reversed afterwards, reproducing the emulated game's construction
    // order (including which actor survives a build-time layer conflict).
    for y in (0..data.height).rev() {
        for x in (0..data.width).rev() {
            for seed in &data.field[x as usize][y as usize] {
                let custom = seed.custom_data.clone().unwrap_or_default();
                let Some(kind) = ActorKind::from_seed(&seed.kind, &custom) else {
                    return Err(LevelError::UnknownActorKind(seed.kind.clone()));
                };
                let direction = seed.direction.unwrap_or(Direction::Up);
                let id = level.spawn_actor(kind, Position::new(x, y), direction, custom);
                if let Some(byte) = seed.wire_byte {
                    let (wires, tunnels) = unpack_wire_byte(byte);
                    let actor = level.actor_mut(id);
                    actor.wires = wires;
                    actor.wire_tunnels = tunnels;
                }
            }
        }
    }
    level.actors.reverse();
    level.deciding_actors.reverse();
    level.playables.reverse();
    Ok(level)
}

impl LevelState {
    /// Field width in tiles.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.field.width()
    }

    /// Field height in tiles.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.field.height()
    }

    /// Supplies the key state the next subticks will act on. Ignored
    /// while a solution playback is active.
    pub fn set_input(&mut self, input: KeyInputs) {
        self.game_input = input;
    }

    /// Starts replaying a recorded solution; every subsequent [`tick`]
    /// pulls its input from the recording.
    ///
    /// [`tick`]: LevelState::tick
    pub fn play_solution(&mut self, solution: &SolutionData) -> Result<(), LevelError> {
        let steps: Vec<SolutionStep> = solution
            .steps
            .iter()
            .copied()
            .filter(|step| step.hold != 0)
            .collect();
        let Some(first) = steps.first().copied() else {
            return Err(LevelError::EmptySolution);
        };
        let subticks_left = if first.hold == SolutionStep::HOLD_FOREVER {
            i64::MAX
        } else {
            i64::from(first.hold) + 1
        };
        self.playback = Some(SolutionPlayback {
            steps,
            index: 0,
            subticks_left,
        });
        if let Some(seed) = solution.blob_mod_seed {
            self.blob_prng.reseed(seed);
        }
        if let Some(direction) = solution.rff_direction {
            self.rff_direction = direction;
        }
        Ok(())
    }

    /// Advances the simulation by one subtick.
    pub fn tick(&mut self) {
        if !self.level_started {
            self.initialize_level();
        } else if self.subtick == 2 {
            self.subtick = 0;
            self.current_tick += 1;
        } else {
            self.subtick += 1;
        }
        self.global_subtick += 1;

        if self.time_left > 0 && !self.timer_frozen {
            self.time_left -= 1;
            if self.time_left == 0 && self.game_state == GameState::Playing {
                self.game_state = GameState::Timeout;
            }
        }

        self.apply_playback_input();
        self.wire_pretick();

        let forced_only = self.subtick != 2;
        let deciding = self.deciding_actors.clone();
        for id in deciding {
            self.internal_decide(id, forced_only);
        }
        let moving = self.deciding_actors.clone();
        for id in moving {
            self.internal_move(id);
            self.internal_do_cooldown(id);
        }

        self.wire_tick();

        if self.game_state == GameState::Playing && self.playables_left == 0 {
            self.game_state = GameState::Won;
        }

        if !self.game_input.drop {
            self.released_keys.drop = true;
        }
        if !self.game_input.rotate_inv {
            self.released_keys.rotate_inv = true;
        }
        if !self.game_input.switch_playable {
            self.released_keys.switch_playable = true;
        }

        if self.playables_to_swap {
            if let Some(selected) = self.selected_playable {
                if self.playables.is_empty() {
                    self.selected_playable = None;
                } else {
                    let index = self.playables.iter().position(|&other| other == selected);
                    let next = index.map_or(0, |found| (found + 1) % self.playables.len());
                    self.selected_playable = Some(self.playables[next]);
                }
            }
            self.playables_to_swap = false;
        }
    }

    /// The outcome record for external reporting.
    #[must_use]
    pub fn outcome(&self) -> LevelOutcome {
        LevelOutcome {
            game_state: self.game_state,
            time_left: self.time_left,
            bonus_points: self.bonus_points,
            total_score: self.bonus_points + (self.time_left / SUBTICKS_PER_SECOND) * 10,
            glitches: self.glitches.clone(),
        }
    }

    fn initialize_level(&mut self) {
        self.level_started = true;
        self.build_circuits();
        self.compute_wired_flags();
        self.resolve_hints();
        let actors = self.actors.clone();
        for id in actors {
            behavior::level_started(self, id);
        }
        // The initial on-tile pass: actors standing on force floors,
        // traps, clone machines or bombs get their sliding state (or
        // their fate) before the first decision.
        let actors = self.actors.clone();
        for id in actors {
            if !self.actor(id).exists || !self.actor(id).kind.has_level_start_on_tile() {
                continue;
            }
            let position = self.actor(id).position;
            for other in self.tile_actor_ids(position) {
                if other != id && self.actor(other).exists && !self.ignores(id, other) {
                    behavior::actor_completely_joined(self, id, other);
                }
            }
        }
    }

    /// Hint tiles receive their text in reading order; tiles beyond the
    /// explicit list fall back to the default hint.
    fn resolve_hints(&mut self) {
        let mut next = 0usize;
        let actors = self.actors.clone();
        for id in actors {
            if !matches!(self.actor(id).kind, ActorKind::Hint { .. }) {
                continue;
            }
            let resolved = self
                .hints
                .get(next)
                .cloned()
                .or_else(|| self.default_hint.clone());
            next += 1;
            if let ActorKind::Hint { text } = &mut self.actor_mut(id).kind {
                *text = resolved;
            }
        }
    }

    fn apply_playback_input(&mut self) {
        let Some(playback) = &mut self.playback else {
            return;
        };
        let mut step = playback.steps.get(playback.index).copied();
        playback.subticks_left -= 1;
        if playback.subticks_left <= 0 {
            playback.index += 1;
            step = playback.steps.get(playback.index).copied();
            playback.subticks_left = match step {
                Some(next) if next.hold == SolutionStep::HOLD_FOREVER => i64::MAX,
                Some(next) => i64::from(next.hold),
                None => i64::MAX,
            };
        }
        if let Some(step) = step {
            self.game_input = KeyInputs::from_byte(step.input);
        }
    }
}

/// Read-only access to a running level.
pub mod query {
    use super::{ActorKind, LevelState};
    use gridlock_core::{
        ActorId, CameraType, GameState, GlitchEvent, KeyInputs, Layer, Position,
    };

    /// Immutable representation of a single actor's state.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ActorSnapshot {
        /// Arena identifier.
        pub id: ActorId,
        /// Kind id string, e.g. `"chip"`.
        pub kind_id: &'static str,
        /// Occupied layer.
        pub layer: Layer,
        /// Current tile.
        pub position: Position,
        /// Tile the current move started from, if mid-move.
        pub old_position: Option<Position>,
        /// Facing.
        pub direction: gridlock_core::Direction,
        /// Subticks left in the current move.
        pub cooldown: u32,
        /// Length of the current move in subticks.
        pub current_move_speed: Option<u32>,
        /// False once destroyed.
        pub exists: bool,
        /// True while removed from the grid by a layer conflict.
        pub despawned: bool,
        /// True if the last movement attempt failed.
        pub bonked: bool,
        /// True if the actor is visibly attached to a wire network.
        pub wired: bool,
    }

    /// Current game state.
    #[must_use]
    pub fn game_state(level: &LevelState) -> GameState {
        level.game_state
    }

    /// Chips still required.
    #[must_use]
    pub fn chips_left(level: &LevelState) -> u32 {
        level.chips_left
    }

    /// Total chips the level started with.
    #[must_use]
    pub fn chips_total(level: &LevelState) -> u32 {
        level.chips_total
    }

    /// Chips required to open the chip gates, including any extra the
    /// description demands.
    #[must_use]
    pub fn chips_required(level: &LevelState) -> u32 {
        level.chips_required
    }

    /// Number of circuits currently carrying power.
    #[must_use]
    pub fn powered_circuits(level: &LevelState) -> usize {
        level
            .circuits
            .iter()
            .filter(|circuit| circuit.powered)
            .count()
    }

    /// Subticks left on the clock.
    #[must_use]
    pub fn time_left(level: &LevelState) -> u32 {
        level.time_left
    }

    /// Current bonus points.
    #[must_use]
    pub fn bonus_points(level: &LevelState) -> u32 {
        level.bonus_points
    }

    /// The camera viewport the description requested.
    #[must_use]
    pub fn camera(level: &LevelState) -> CameraType {
        level.camera
    }

    /// The ordered glitch event log.
    #[must_use]
    pub fn glitches(level: &LevelState) -> &[GlitchEvent] {
        &level.glitches
    }

    /// The key state the level acted on this subtick.
    #[must_use]
    pub fn game_input(level: &LevelState) -> KeyInputs {
        level.game_input
    }

    /// The currently controlled playable.
    #[must_use]
    pub fn selected_playable(level: &LevelState) -> Option<ActorId> {
        level.selected_playable
    }

    /// The playables still in the level, in list order.
    #[must_use]
    pub fn playables(level: &LevelState) -> Vec<ActorId> {
        level.playables.clone()
    }

    /// The actor occupying a layer of a tile, if any.
    #[must_use]
    pub fn actor_at(level: &LevelState, position: Position, layer: Layer) -> Option<ActorId> {
        if position.x() >= level.width() || position.y() >= level.height() {
            return None;
        }
        level.field.tile(position).actor_on(layer)
    }

    /// Snapshot of one actor.
    #[must_use]
    pub fn actor_snapshot(level: &LevelState, id: ActorId) -> Option<ActorSnapshot> {
        if id.index() >= level.arena.len() {
            return None;
        }
        let actor = level.actor(id);
        Some(ActorSnapshot {
            id,
            kind_id: actor.kind.id(),
            layer: actor.layer,
            position: actor.position,
            old_position: actor.old_position,
            direction: actor.direction,
            cooldown: actor.cooldown,
            current_move_speed: actor.current_move_speed,
            exists: actor.exists,
            despawned: actor.despawned,
            bonked: actor.bonked,
            wired: actor.wired,
        })
    }

    /// Snapshots of every live actor in deterministic list order.
    #[must_use]
    pub fn actor_snapshots(level: &LevelState) -> Vec<ActorSnapshot> {
        level
            .actors
            .iter()
            .filter_map(|&id| actor_snapshot(level, id))
            .collect()
    }

    /// Total subticks simulated so far.
    #[must_use]
    pub fn elapsed_subticks(level: &LevelState) -> u64 {
        level.global_subtick
    }

    /// The RNG registers `(prng1, prng2, blob)`, exposed for determinism
    /// fingerprints.
    #[must_use]
    pub fn rng_registers(level: &LevelState) -> (u8, u8, u8) {
        let (value1, value2) = level.prng.registers();
        (value1, value2, level.blob_prng.value())
    }

    /// Interpolated visual position derived from the cooldown ratio.
    #[must_use]
    pub fn visual_position(level: &LevelState, id: ActorId) -> Option<(f64, f64)> {
        if id.index() >= level.arena.len() {
            return None;
        }
        let actor = level.actor(id);
        let (Some(old), Some(speed)) = (actor.old_position, actor.current_move_speed) else {
            return Some((f64::from(actor.position.x()), f64::from(actor.position.y())));
        };
        if actor.cooldown == 0 || speed == 0 {
            return Some((f64::from(actor.position.x()), f64::from(actor.position.y())));
        }
        let progress = 1.0 - f64::from(actor.cooldown) / f64::from(speed);
        Some((
            f64::from(old.x()) * (1.0 - progress) + f64::from(actor.position.x()) * progress,
            f64::from(old.y()) * (1.0 - progress) + f64::from(actor.position.y()) * progress,
        ))
    }

    /// The stateful bit of a stateful terrain variant, for presentation:
    /// toggle walls report whether they are solid, switch walls whether
    /// they are open, flame jets whether they burn, traps whether they
    /// are held open, clone machines whether a clone step is in flight,
    /// blue/green walls whether they are real, invisible walls whether a
    /// bump made them visible. Stateless kinds report `None`.
    #[must_use]
    pub fn terrain_active(level: &LevelState, id: ActorId) -> Option<bool> {
        if id.index() >= level.arena.len() {
            return None;
        }
        match level.actor(id).kind {
            ActorKind::ToggleWall { closed } => Some(closed),
            ActorKind::SwitchWall { open } => Some(open),
            ActorKind::FlameJet { on } => Some(on),
            ActorKind::Trap { open_requests } => Some(open_requests > 0),
            ActorKind::CloneMachine { cloning } => Some(cloning),
            ActorKind::BlueWall { real } | ActorKind::GreenWall { real } => Some(real),
            ActorKind::InvisibleWall { visible_for } => Some(visible_for > 0),
            _ => None,
        }
    }

    /// Whether a hint tile at the given position resolved to any text.
    #[must_use]
    pub fn hint_text(level: &LevelState, position: Position) -> Option<String> {
        let id = actor_at(level, position, Layer::Stationary)?;
        match &level.actor(id).kind {
            ActorKind::Hint { text } => text.clone(),
            _ => None,
        }
    }
}
