#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridlock engine.
//!
//! This crate defines the vocabulary that connects the authoritative level
//! simulation, the pure input-provider systems, and the driver adapters:
//! directions and grid positions, tile layers, actor identifiers, the tag
//! vocabulary used by collision rules, wire masks, per-tick key input
//! records and their packed byte form, the recorded-solution step format,
//! and the serde-facing level-description and outcome types produced and
//! consumed by external tooling.

use serde::{Deserialize, Serialize};

/// Cardinal movement directions, clockwise starting from up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing column indices.
    Right,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
}

impl Direction {
    /// All directions in clockwise order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Zero-based clockwise index of the direction.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Recovers a direction from a clockwise index, wrapping modulo four.
    #[must_use]
    pub const fn from_index(value: u8) -> Direction {
        match value % 4 {
            0 => Direction::Up,
            1 => Direction::Right,
            2 => Direction::Down,
            _ => Direction::Left,
        }
    }

    /// Rotates the direction clockwise by the given number of quarter turns.
    #[must_use]
    pub const fn rotated(self, quarter_turns: u8) -> Direction {
        Direction::from_index(self.index() + quarter_turns % 4)
    }

    /// The direction one quarter turn clockwise of this one.
    #[must_use]
    pub const fn right(self) -> Direction {
        self.rotated(1)
    }

    /// The opposite direction.
    #[must_use]
    pub const fn back(self) -> Direction {
        self.rotated(2)
    }

    /// The direction one quarter turn counter-clockwise of this one.
    #[must_use]
    pub const fn left(self) -> Direction {
        self.rotated(3)
    }

    /// Column/row delta produced by one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// The wire bit corresponding to this direction.
    #[must_use]
    pub const fn wire(self) -> WireSet {
        WireSet::new(1 << self.index())
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Steps one tile in the given direction, refusing to leave the
    /// `width` x `height` field.
    #[must_use]
    pub fn neighbor(self, direction: Direction, width: u32, height: u32) -> Option<Position> {
        let (dx, dy) = direction.offset();
        let x = i64::from(self.x) + i64::from(dx);
        let y = i64::from(self.y) + i64::from(dy);
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            return None;
        }
        Some(Position::new(x as u32, y as u32))
    }
}

/// Occupancy layers stacked on every tile, bottom to top.
///
/// At most one actor occupies a given (tile, layer) pair at a time; a
/// second actor entering an occupied layer despawns the resident.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Terrain: floors, walls, force floors, buttons.
    Stationary,
    /// Items and item-like hazards such as bombs.
    Item,
    /// Item qualifiers that alter the item below them.
    ItemSuffix,
    /// Blocks, monsters and playables.
    Movable,
    /// Overlays such as thin walls.
    Special,
}

impl Layer {
    /// Number of layers stacked on a tile.
    pub const COUNT: usize = 5;

    /// All layers, bottom to top.
    pub const ALL: [Layer; Layer::COUNT] = [
        Layer::Stationary,
        Layer::Item,
        Layer::ItemSuffix,
        Layer::Movable,
        Layer::Special,
    ];

    /// Dense index of the layer within a tile's slot array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Stable identifier of an actor slot within a level's actor arena.
///
/// Identifiers are never reused within a level; destroyed actors keep
/// their slot with `exists` cleared so that in-flight iteration stays
/// valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Dense arena index of the identifier.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Per-tick key state consumed by the simulation.
///
/// The packed byte form is the one used by the recorded-solution codec:
/// `up=0x1, right=0x2, down=0x4, left=0x8, drop=0x10, rotate_inv=0x20,
/// switch_playable=0x40`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyInputs {
    /// Move up.
    pub up: bool,
    /// Move right.
    pub right: bool,
    /// Move down.
    pub down: bool,
    /// Move left.
    pub left: bool,
    /// Drop the most recently acquired inventory item.
    pub drop: bool,
    /// Rotate the inventory.
    pub rotate_inv: bool,
    /// Switch to the next playable.
    pub switch_playable: bool,
}

impl KeyInputs {
    /// The all-released input record.
    pub const NONE: KeyInputs = KeyInputs {
        up: false,
        right: false,
        down: false,
        left: false,
        drop: false,
        rotate_inv: false,
        switch_playable: false,
    };

    /// Packs the record into the solution-codec byte.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        (self.up as u8)
            | (self.right as u8) << 1
            | (self.down as u8) << 2
            | (self.left as u8) << 3
            | (self.drop as u8) << 4
            | (self.rotate_inv as u8) << 5
            | (self.switch_playable as u8) << 6
    }

    /// Unpacks a solution-codec byte into a key record.
    #[must_use]
    pub const fn from_byte(byte: u8) -> KeyInputs {
        KeyInputs {
            up: byte & 0x01 != 0,
            right: byte & 0x02 != 0,
            down: byte & 0x04 != 0,
            left: byte & 0x08 != 0,
            drop: byte & 0x10 != 0,
            rotate_inv: byte & 0x20 != 0,
            switch_playable: byte & 0x40 != 0,
        }
    }

    /// Reports whether any movement key is held.
    #[must_use]
    pub const fn wants_movement(&self) -> bool {
        self.up || self.right || self.down || self.left
    }
}

/// One entry of a recorded solution: an input byte held for a number of
/// subticks.
///
/// A hold of [`SolutionStep::HOLD_FOREVER`] keeps the input applied until
/// the level ends; a hold of zero is zero-length padding and is skipped by
/// decoders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolutionStep {
    /// Packed [`KeyInputs`] byte.
    pub input: u8,
    /// Number of subticks the input stays applied.
    pub hold: u8,
}

impl SolutionStep {
    /// Sentinel hold value meaning "hold this input until level end".
    pub const HOLD_FOREVER: u8 = 0xFF;

    /// Creates a new solution step.
    #[must_use]
    pub const fn new(input: u8, hold: u8) -> Self {
        Self { input, hold }
    }
}

/// Top-level outcome state of a running level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// The level is still being played.
    Playing,
    /// The selected playable was destroyed.
    Lost,
    /// The level timer ran out.
    Timeout,
    /// Enough playables reached an exit.
    Won,
}

/// Kinds of emergent glitches the simulation records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlitchKind {
    /// Two actors contended for one tile layer and the resident was
    /// silently removed from the grid.
    Despawn,
}

/// A recorded glitch occurrence, part of the observable outcome contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlitchEvent {
    /// What happened.
    pub kind: GlitchKind,
    /// Tile the glitch occurred on.
    pub location: Position,
    /// Global subtick index at which the glitch happened.
    pub happens_at: u64,
    /// Free-form detail, e.g. the despawned actor's kind id.
    pub specifier: String,
}

/// Closed vocabulary of collision/interaction tags.
///
/// Tags are matched through [`TagRules`], which implement the OR-of-rules
/// semantics used throughout blocking, ignoring and immunity logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Player-controllable actors.
    Playable,
    /// The Chip playable variant.
    Chip,
    /// The Melinda playable variant.
    Melinda,
    /// Pushable blocks.
    Block,
    /// First-generation blocks.
    Cc1Block,
    /// Second-generation blocks.
    Cc2Block,
    /// Anything that moves on the movable layer.
    Movable,
    /// Pickup items.
    Item,
    /// Key doors.
    Door,
    /// Solid walls.
    Wall,
    /// Edge overlays on the special layer.
    ThinWall,
    /// Slippery terrain that forces strong sliding.
    Ice,
    /// Terrain that forces weak sliding.
    ForceFloor,
    /// Drowning hazard.
    Water,
    /// Burning hazard.
    Fire,
    /// Heat sources that melt ice blocks.
    Melting,
    /// Soft ground monsters refuse to enter.
    Filth,
    /// Slime hazard.
    Slime,
    /// Explosive hazards.
    Bomb,
    /// Monsters that roam on their own.
    AutonomousMonster,
    /// Monsters subject to standard terrain blocking.
    NormalMonster,
    /// Actors that pick items up.
    CanPickupItems,
    /// Actors that rest on items without collecting them.
    CanStandOnItems,
    /// May reuse red keys.
    CanReuseKeyRed,
    /// May reuse blue keys.
    CanReuseKeyBlue,
    /// May reuse yellow keys.
    CanReuseKeyYellow,
    /// May reuse green keys.
    CanReuseKeyGreen,
    /// Frightens red teeth.
    ScaresTeethRed,
    /// Frightens blue teeth.
    ScaresTeethBlue,
    /// Dissolves in slime despite being a block.
    DiesInSlime,
    /// Wipes slime clean instead of dying.
    ClearsSlime,
    /// Explosive charges.
    Tnt,
    /// Drags the movable behind it while walking.
    Pulling,
    /// Suppresses the default monster-contact kill.
    IgnoreDefaultMonsterKill,
}

impl Tag {
    /// The bit representing this tag inside a [`TagSet`].
    #[must_use]
    pub const fn bit(self) -> u64 {
        1u64 << (self as u64)
    }
}

/// A set of [`Tag`]s packed into a bit field for O(1) matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagSet(u64);

impl TagSet {
    /// The empty tag set.
    pub const EMPTY: TagSet = TagSet(0);

    /// Builds a set from a list of tags.
    #[must_use]
    pub const fn of(tags: &[Tag]) -> TagSet {
        let mut bits = 0u64;
        let mut i = 0;
        while i < tags.len() {
            bits |= tags[i].bit();
            i += 1;
        }
        TagSet(bits)
    }

    /// Raw bit representation of the set.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Reports whether the set contains the tag.
    #[must_use]
    pub const fn contains(self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// Reports whether the two sets share any tag.
    #[must_use]
    pub const fn intersects(self, other: TagSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the set with the tag added.
    #[must_use]
    pub const fn with(self, tag: Tag) -> TagSet {
        TagSet(self.0 | tag.bit())
    }

    /// Returns the union of the two sets.
    #[must_use]
    pub const fn union(self, other: TagSet) -> TagSet {
        TagSet(self.0 | other.0)
    }

    /// Reports whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A rule list matched against an actor's tag set.
///
/// A rule list matches if *any* rule is satisfied: a positive rule is
/// satisfied by the tag's presence, a negated rule by its absence. An
/// empty rule list never matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagRules {
    present: TagSet,
    absent: TagSet,
}

impl TagRules {
    /// The rule list that matches nothing.
    pub const EMPTY: TagRules = TagRules {
        present: TagSet::EMPTY,
        absent: TagSet::EMPTY,
    };

    /// Builds a rule list from positive and negated tags.
    #[must_use]
    pub const fn new(present: &[Tag], absent: &[Tag]) -> TagRules {
        TagRules {
            present: TagSet::of(present),
            absent: TagSet::of(absent),
        }
    }

    /// Applies the OR-of-rules match against an actor's tags.
    #[must_use]
    pub const fn matches(self, tags: TagSet) -> bool {
        tags.intersects(self.present) || self.absent.bits() & !tags.bits() != 0
    }

    /// Reports whether no rules are present.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.present.is_empty() && self.absent.is_empty()
    }

    /// Returns the rules merged with another rule list.
    #[must_use]
    pub const fn union(self, other: TagRules) -> TagRules {
        TagRules {
            present: self.present.union(other.present),
            absent: self.absent.union(other.absent),
        }
    }
}

/// A 4-bit mask of wire connections, one bit per direction.
///
/// Bit order follows the wiring byte encoding: `UP=1, RIGHT=2, DOWN=4,
/// LEFT=8`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireSet(u8);

impl WireSet {
    /// No wires.
    pub const EMPTY: WireSet = WireSet(0);
    /// Wires in all four directions.
    pub const FULL: WireSet = WireSet(0b1111);

    /// Creates a mask from raw bits, discarding anything above bit 3.
    #[must_use]
    pub const fn new(bits: u8) -> WireSet {
        WireSet(bits & 0b1111)
    }

    /// Raw bit representation of the mask.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Reports whether the mask is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Reports whether the two masks share any direction.
    #[must_use]
    pub const fn intersects(self, other: WireSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the union of the two masks.
    #[must_use]
    pub const fn union(self, other: WireSet) -> WireSet {
        WireSet(self.0 | other.0)
    }

    /// Returns the intersection of the two masks.
    #[must_use]
    pub const fn intersection(self, other: WireSet) -> WireSet {
        WireSet(self.0 & other.0)
    }

    /// Returns the mask with the other mask's directions removed.
    #[must_use]
    pub const fn without(self, other: WireSet) -> WireSet {
        WireSet(self.0 & !other.0)
    }

    /// Iterates the directions present in the mask, clockwise.
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .iter()
            .copied()
            .filter(move |direction| self.intersects(direction.wire()))
    }
}

/// The wire bits of a direction and its opposite, as used by crossing
/// overlap modes.
#[must_use]
pub const fn opposing_pair(direction: Direction) -> WireSet {
    direction.wire().union(direction.back().wire())
}

/// How a wirable treats a four-way wire crossing when circuits are traced.
///
/// This changes circuit topology, not just rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireOverlapMode {
    /// All four directions always connect.
    #[default]
    Overlap,
    /// Opposing pairs stay separate when all four bits are present,
    /// otherwise behaves like [`WireOverlapMode::Overlap`].
    Cross,
    /// Opposing pairs always stay separate.
    AlwaysCross,
    /// The literal mask, no widening.
    None,
}

/// Packs wire and tunnel masks into the single-byte wiring encoding:
/// wires in the low nibble, tunnels in the high nibble.
#[must_use]
pub const fn pack_wire_byte(wires: WireSet, tunnels: WireSet) -> u8 {
    wires.bits() | tunnels.bits() << 4
}

/// Unpacks the single-byte wiring encoding into wire and tunnel masks.
#[must_use]
pub const fn unpack_wire_byte(byte: u8) -> (WireSet, WireSet) {
    (WireSet::new(byte & 0b1111), WireSet::new(byte >> 4))
}

/// Camera viewport dimensions carried by a level description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CameraType {
    /// Viewport width in tiles.
    pub width: u32,
    /// Viewport height in tiles.
    pub height: u32,
    /// Number of simultaneously visible screens.
    pub screens: u32,
}

/// How many playables must reach an exit before the level is won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayablesRequired {
    /// Every playable present in the level must exit.
    All,
    /// A fixed number of playables must exit.
    Count(u32),
}

/// The blob-randomness setting of a level description.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlobMode {
    /// Blob movement follows the fixed seed (mode 1).
    #[default]
    Deterministic,
    /// Blob movement cycles one of four patterns (mode 4).
    FourPattern,
    /// Blob movement is seeded randomly at level creation (mode 256).
    Randomized,
}

/// One actor to place on a tile when the level is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorSeed {
    /// Actor kind identifier, e.g. `"chip"` or `"toggleWall"`.
    pub kind: String,
    /// Initial facing; defaults to up.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Kind-specific configuration string.
    #[serde(default)]
    pub custom_data: Option<String>,
    /// Packed wiring byte (wires low nibble, tunnels high nibble).
    #[serde(default)]
    pub wire_byte: Option<u8>,
}

/// An explicit two-tile connection, used by red/brown button wiring in
/// first-generation levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// The controlling tile (e.g. the button).
    pub from: Position,
    /// The controlled tile (e.g. the trap or clone machine).
    pub to: Position,
}

/// The level-description input produced by external parsers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Level name, if any.
    #[serde(default)]
    pub name: Option<String>,
    /// Access password, if any.
    #[serde(default)]
    pub password: Option<String>,
    /// Field width in tiles.
    pub width: u32,
    /// Field height in tiles.
    pub height: u32,
    /// Actor seeds per tile, indexed by column then row.
    pub field: Vec<Vec<Vec<ActorSeed>>>,
    /// Exit requirement for winning the level.
    pub playables_required: PlayablesRequired,
    /// Camera viewport description.
    pub camera: CameraType,
    /// Time limit in seconds; zero means untimed.
    pub time_limit: u32,
    /// Blob-randomness mode.
    #[serde(default)]
    pub blob_mode: BlobMode,
    /// Hint texts consumed by hint tiles in reading order.
    #[serde(default)]
    pub hints: Vec<String>,
    /// Fallback hint for hint tiles beyond the explicit list.
    #[serde(default)]
    pub default_hint: Option<String>,
    /// Chips required beyond the number of chips present.
    #[serde(default)]
    pub extra_chips_required: u32,
    /// Explicit button connections.
    #[serde(default)]
    pub connections: Vec<Connection>,
}

/// The outcome record consumed by external reporting.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelOutcome {
    /// Final game state.
    pub game_state: GameState,
    /// Subticks left on the clock; zero if untimed or expired.
    pub time_left: u32,
    /// Score from bonus flags.
    pub bonus_points: u32,
    /// Total score including the time bonus.
    pub total_score: u32,
    /// Ordered glitch events observed during the attempt.
    pub glitches: Vec<GlitchEvent>,
}

/// A recorded solution together with the RNG state it assumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolutionData {
    /// The recorded `(input, hold)` steps.
    pub steps: Vec<SolutionStep>,
    /// Blob RNG seed the recording was made with.
    #[serde(default)]
    pub blob_mod_seed: Option<u8>,
    /// Initial random-force-floor direction.
    #[serde(default)]
    pub rff_direction: Option<Direction>,
    /// The outcome the recording is expected to reproduce.
    #[serde(default)]
    pub expected_outcome: Option<LevelOutcome>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    #[test]
    fn direction_rotation_is_clockwise() {
        assert_eq!(Direction::Up.right(), Direction::Right);
        assert_eq!(Direction::Up.back(), Direction::Down);
        assert_eq!(Direction::Up.left(), Direction::Left);
        assert_eq!(Direction::Left.right(), Direction::Up);
        for direction in Direction::ALL {
            assert_eq!(direction.rotated(4), direction);
        }
    }

    #[test]
    fn position_neighbor_respects_bounds() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.neighbor(Direction::Up, 3, 3), None);
        assert_eq!(origin.neighbor(Direction::Left, 3, 3), None);
        assert_eq!(
            origin.neighbor(Direction::Right, 3, 3),
            Some(Position::new(1, 0))
        );
        assert_eq!(
            Position::new(2, 2).neighbor(Direction::Down, 3, 3),
            None
        );
    }

    #[test]
    fn tag_rules_match_any_rule() {
        let tags = TagSet::of(&[Tag::Playable, Tag::Chip]);
        let rules = TagRules::new(&[Tag::Block], &[Tag::Fire]);
        // "fire" is absent, so the negated rule alone satisfies the match.
        assert!(rules.matches(tags));
    }

    #[test]
    fn tag_rules_negation_fails_when_tag_present() {
        let tags = TagSet::of(&[Tag::Playable, Tag::Fire]);
        let rules = TagRules::new(&[], &[Tag::Fire]);
        assert!(!rules.matches(tags));
    }

    #[test]
    fn empty_tag_rules_never_match() {
        assert!(!TagRules::EMPTY.matches(TagSet::EMPTY));
        assert!(!TagRules::EMPTY.matches(TagSet::of(&[Tag::Playable])));
    }

    #[test]
    fn key_inputs_byte_round_trip() {
        for byte in 0..0x80u8 {
            assert_eq!(KeyInputs::from_byte(byte).to_byte(), byte);
        }
        let inputs = KeyInputs {
            up: true,
            drop: true,
            switch_playable: true,
            ..KeyInputs::NONE
        };
        assert_eq!(inputs.to_byte(), 0x51);
    }

    #[test]
    fn wire_byte_packs_tunnels_high() {
        let wires = Direction::Up.wire().union(Direction::Left.wire());
        let tunnels = Direction::Right.wire();
        let byte = pack_wire_byte(wires, tunnels);
        assert_eq!(byte, 0b0010_1001);
        assert_eq!(unpack_wire_byte(byte), (wires, tunnels));
    }

    #[test]
    fn wire_set_direction_iteration_is_clockwise() {
        let collected: Vec<Direction> = WireSet::FULL.directions().collect();
        assert_eq!(collected, Direction::ALL.to_vec());
        assert_eq!(
            opposing_pair(Direction::Right),
            Direction::Right.wire().union(Direction::Left.wire())
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: serde::Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn glitch_event_round_trips_through_bincode() {
        let event = GlitchEvent {
            kind: GlitchKind::Despawn,
            location: Position::new(4, 9),
            happens_at: 117,
            specifier: "dirtBlock".to_owned(),
        };
        assert_round_trip(&event);
    }

    #[test]
    fn solution_step_round_trips_through_bincode() {
        assert_round_trip(&SolutionStep::new(0x0a, SolutionStep::HOLD_FOREVER));
    }

    #[test]
    fn level_outcome_round_trips_through_bincode() {
        let outcome = LevelOutcome {
            game_state: GameState::Won,
            time_left: 540,
            bonus_points: 200,
            total_score: 380,
            glitches: Vec::new(),
        };
        assert_round_trip(&outcome);
    }

    #[test]
    fn actor_seed_round_trips_through_bincode() {
        let seed = ActorSeed {
            kind: "toggleWall".to_owned(),
            direction: Some(Direction::Left),
            custom_data: Some("on".to_owned()),
            wire_byte: Some(0b0011_0101),
        };
        assert_round_trip(&seed);
    }
}
