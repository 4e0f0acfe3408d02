//! The closed roster of actor variants and their static capability tables.
//!
//! The emulated game dispatches behavior through per-class method probing;
//! here every variant is a case of one enum and each capability is a match
//! table, so "does this actor do X" is a static question. Mutable
//! per-variant state (a tank's queued turn, a trap's open count) lives in
//! the variant payload.

use gridlock_core::{Direction, Layer, Tag, TagRules, TagSet, WireOverlapMode};

/// The four key/door colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum KeyColor {
    /// Red keys; only playables interact with them.
    Red,
    /// Blue keys; never block anything.
    Blue,
    /// Yellow keys.
    Yellow,
    /// Green keys.
    Green,
}

impl KeyColor {
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub(crate) const fn reuse_tag(self) -> Tag {
        match self {
            KeyColor::Red => Tag::CanReuseKeyRed,
            KeyColor::Blue => Tag::CanReuseKeyBlue,
            KeyColor::Yellow => Tag::CanReuseKeyYellow,
            KeyColor::Green => Tag::CanReuseKeyGreen,
        }
    }
}

/// Button channels actors can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ButtonColor {
    /// Toggle walls.
    Green,
    /// Blue tanks.
    Blue,
    /// Clone machines.
    Red,
    /// Traps.
    Brown,
    /// Flame jets.
    Orange,
}

/// Death animation variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum AnimKind {
    /// Generic explosion.
    Explosion,
    /// Water splash.
    Splash,
}

impl AnimKind {
    pub(crate) const fn id(self) -> &'static str {
        match self {
            AnimKind::Explosion => "explosionAnim",
            AnimKind::Splash => "splashAnim",
        }
    }
}

/// Straight and curved railroad track pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum RailSegment {
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
    NorthSouth,
    EastWest,
}

impl RailSegment {
    pub(crate) const fn ends(self) -> (Direction, Direction) {
        match self {
            RailSegment::NorthEast => (Direction::Up, Direction::Right),
            RailSegment::SouthEast => (Direction::Down, Direction::Right),
            RailSegment::SouthWest => (Direction::Down, Direction::Left),
            RailSegment::NorthWest => (Direction::Up, Direction::Left),
            RailSegment::NorthSouth => (Direction::Up, Direction::Down),
            RailSegment::EastWest => (Direction::Right, Direction::Left),
        }
    }

    fn from_token(token: &str) -> Option<RailSegment> {
        match token {
            "ne" => Some(RailSegment::NorthEast),
            "se" => Some(RailSegment::SouthEast),
            "sw" => Some(RailSegment::SouthWest),
            "nw" => Some(RailSegment::NorthWest),
            "ns" => Some(RailSegment::NorthSouth),
            "ew" => Some(RailSegment::EastWest),
            _ => None,
        }
    }
}

/// Parses a railroad custom-data string such as `"ne,ew"` into segments.
/// Unknown tokens are dropped with a warning; rails without any valid
/// segment refuse all movement.
pub(crate) fn parse_rail_segments(custom_data: &str) -> Vec<RailSegment> {
    let mut segments = Vec::new();
    for token in custom_data.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match RailSegment::from_token(token) {
            Some(segment) => segments.push(segment),
            None => log::warn!("ignoring unknown railroad segment token {token:?}"),
        }
    }
    segments
}

/// Every actor variant the engine knows, with its mutable per-variant
/// state in the payload.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ActorKind {
    /// The Chip playable.
    Chip,
    /// The Melinda playable.
    Melinda,
    /// First-generation pushable block.
    DirtBlock,
    /// Second-generation pushable block; melts, floats into ice.
    IceBlock,
    /// Bounces back and forth.
    Ball,
    /// Wall-follower preferring left turns.
    Ant,
    /// Wall-follower preferring right turns.
    Centipede,
    /// Keeps going, prefers right turns; immune to fire.
    Fireball,
    /// Keeps going, prefers left turns; flies over water.
    Glider,
    /// Walks straight, picks a random turn on collision.
    Walker,
    /// Fully random walker with its own pattern stream.
    Blob,
    /// Chases the selected playable every other four ticks.
    TeethRed,
    /// Drives straight until a blue button flips it.
    TankBlue {
        /// A blue button was pressed since the last decision.
        turn_pending: bool,
    },
    /// A chip to collect.
    EChip,
    /// A chip that counts toward the total but not the requirement.
    EChipPlus,
    /// A colored key.
    Key(KeyColor),
    /// Water protection.
    BootWater,
    /// Fire protection.
    BootFire,
    /// Ice grip.
    BootIce,
    /// Force-floor grip.
    BootForceFloor,
    /// Lets the carrier walk over dirt and gravel.
    BootDirt,
    /// Doubles the carrier's movement speed.
    BootSpeed,
    /// Suppresses monster contact kills.
    Helmet,
    /// Adds (or multiplies) bonus points when collected.
    BonusFlag,
    /// A hooked tow cable; the carrier drags blocks behind it.
    Hook,
    /// Plain floor, the wire-carrying terrain.
    Floor,
    /// Strong-sliding terrain.
    Ice,
    /// A curved ice corner.
    IceCorner,
    /// Weak-sliding directed terrain.
    ForceFloor,
    /// Weak-sliding terrain with the shared random direction.
    ForceFloorRandom,
    /// Drowns movables; blocks become terrain.
    Water,
    /// Burns movables.
    Fire,
    /// Diggable ground that monsters refuse.
    Dirt,
    /// Rough ground that monsters refuse.
    Gravel,
    /// The level exit.
    Exit,
    /// Opens once every required chip is collected.
    EChipGate,
    /// Shows a hint to playables.
    Hint {
        /// Resolved hint text, assigned when the level starts.
        text: Option<String>,
    },
    /// Turns into a wall when stepped off.
    RecessedWall,
    /// Deletes anything that settles on it.
    Void,
    /// Dissolves non-block movables.
    Slime,
    /// Explodes when a movable settles on it.
    Bomb,
    /// Turns into water when stepped off.
    Turtle,
    /// Confiscates carried items.
    ThiefTool,
    /// Confiscates carried keys.
    ThiefKey,
    /// Holds movables until a brown button opens it.
    Trap {
        /// Number of currently held-down linked brown buttons.
        open_requests: u32,
    },
    /// Duplicates its occupant on a red button press.
    CloneMachine {
        /// A clone step is in progress, so exits are allowed.
        cloning: bool,
    },
    /// Plain wall.
    Wall,
    /// Indestructible wall.
    SteelWall,
    /// Wall that briefly reveals itself when bumped.
    InvisibleWall {
        /// Ticks of visibility left after a bump.
        visible_for: u32,
    },
    /// Becomes a real wall when bumped by a playable.
    AppearingWall,
    /// Probeable wall that may be real or dissolve on a bump.
    BlueWall {
        /// Real blue walls become plain walls when probed.
        real: bool,
    },
    /// Wall that only blocks playables when fake.
    GreenWall {
        /// Real green walls block everything.
        real: bool,
    },
    /// Wall toggled by green buttons.
    ToggleWall {
        /// Whether the wall is currently solid.
        closed: bool,
    },
    /// Wall driven by wire power.
    SwitchWall {
        /// Whether the wall is currently passable.
        open: bool,
    },
    /// A colored key door.
    Door(KeyColor),
    /// An edge wall on the special layer.
    ThinWall,
    /// A jet of flame toggled by orange buttons or wire pulses.
    FlameJet {
        /// Whether the jet is burning.
        on: bool,
    },
    /// A track piece that redirects movement along its segments.
    Railroad,
    /// Global toggle-wall button.
    ButtonGreen,
    /// Global tank button.
    ButtonBlue,
    /// Clone-machine button, wired by reading order or connection.
    ButtonRed {
        /// The resolved clone machine, if any.
        connected: Option<gridlock_core::ActorId>,
    },
    /// Trap button, wired by reading order or connection.
    ButtonBrown {
        /// The resolved trap, if any.
        connected: Option<gridlock_core::ActorId>,
    },
    /// Flame-jet button, wired by diamond search or connection.
    ButtonOrange {
        /// The resolved flame jet, if any.
        connected: Option<gridlock_core::ActorId>,
    },
    /// Pressure plate that powers its wires while held down.
    ButtonPink,
    /// A transient death animation.
    Animation {
        /// Which animation is playing.
        kind: AnimKind,
        /// Decisions left before the animation expires.
        ticks_left: u32,
    },
}

/// Subticks an animation actor lingers before expiring.
const ANIMATION_LENGTH: u32 = 16;

impl ActorKind {
    /// Constructs a variant from its level-description kind id.
    pub(crate) fn from_seed(kind: &str, custom_data: &str) -> Option<ActorKind> {
        Some(match kind {
            "chip" => ActorKind::Chip,
            "melinda" => ActorKind::Melinda,
            "dirtBlock" => ActorKind::DirtBlock,
            "iceBlock" => ActorKind::IceBlock,
            "ball" => ActorKind::Ball,
            "ant" => ActorKind::Ant,
            "centipede" => ActorKind::Centipede,
            "fireball" => ActorKind::Fireball,
            "glider" => ActorKind::Glider,
            "walker" => ActorKind::Walker,
            "blob" => ActorKind::Blob,
            "teethRed" => ActorKind::TeethRed,
            "tankBlue" => ActorKind::TankBlue {
                turn_pending: false,
            },
            "echip" => ActorKind::EChip,
            "echipPlus" => ActorKind::EChipPlus,
            "keyRed" => ActorKind::Key(KeyColor::Red),
            "keyBlue" => ActorKind::Key(KeyColor::Blue),
            "keyYellow" => ActorKind::Key(KeyColor::Yellow),
            "keyGreen" => ActorKind::Key(KeyColor::Green),
            "bootWater" => ActorKind::BootWater,
            "bootFire" => ActorKind::BootFire,
            "bootIce" => ActorKind::BootIce,
            "bootForceFloor" => ActorKind::BootForceFloor,
            "bootDirt" => ActorKind::BootDirt,
            "bootSpeed" => ActorKind::BootSpeed,
            "helmet" => ActorKind::Helmet,
            "bonusFlag" => ActorKind::BonusFlag,
            "hook" => ActorKind::Hook,
            "floor" => ActorKind::Floor,
            "ice" => ActorKind::Ice,
            "iceCorner" => ActorKind::IceCorner,
            "forceFloor" => ActorKind::ForceFloor,
            "forceFloorRandom" => ActorKind::ForceFloorRandom,
            "water" => ActorKind::Water,
            "fire" => ActorKind::Fire,
            "dirt" => ActorKind::Dirt,
            "gravel" => ActorKind::Gravel,
            "exit" => ActorKind::Exit,
            "echipGate" => ActorKind::EChipGate,
            "hint" => ActorKind::Hint { text: None },
            "popupWall" => ActorKind::RecessedWall,
            "void" => ActorKind::Void,
            "slime" => ActorKind::Slime,
            "bomb" => ActorKind::Bomb,
            "turtle" => ActorKind::Turtle,
            "thiefTool" => ActorKind::ThiefTool,
            "thiefKey" => ActorKind::ThiefKey,
            "trap" => ActorKind::Trap { open_requests: 0 },
            "cloneMachine" => ActorKind::CloneMachine { cloning: false },
            "wall" => ActorKind::Wall,
            "steelWall" => ActorKind::SteelWall,
            "invisibleWall" => ActorKind::InvisibleWall { visible_for: 0 },
            "appearingWall" => ActorKind::AppearingWall,
            "blueWall" => ActorKind::BlueWall {
                real: custom_data == "real",
            },
            "greenWall" => ActorKind::GreenWall {
                real: custom_data == "real",
            },
            "toggleWall" => ActorKind::ToggleWall {
                closed: custom_data == "on",
            },
            "switchWall" => ActorKind::SwitchWall {
                open: custom_data == "on",
            },
            "doorRed" => ActorKind::Door(KeyColor::Red),
            "doorBlue" => ActorKind::Door(KeyColor::Blue),
            "doorYellow" => ActorKind::Door(KeyColor::Yellow),
            "doorGreen" => ActorKind::Door(KeyColor::Green),
            "thinWall" => ActorKind::ThinWall,
            "flameJet" => ActorKind::FlameJet {
                on: custom_data == "on",
            },
            "railroad" => ActorKind::Railroad,
            "buttonGreen" => ActorKind::ButtonGreen,
            "buttonBlue" => ActorKind::ButtonBlue,
            "buttonRed" => ActorKind::ButtonRed { connected: None },
            "buttonBrown" => ActorKind::ButtonBrown { connected: None },
            "buttonOrange" => ActorKind::ButtonOrange { connected: None },
            "buttonPink" => ActorKind::ButtonPink,
            "explosionAnim" => ActorKind::Animation {
                kind: AnimKind::Explosion,
                ticks_left: ANIMATION_LENGTH,
            },
            "splashAnim" => ActorKind::Animation {
                kind: AnimKind::Splash,
                ticks_left: ANIMATION_LENGTH,
            },
            _ => return None,
        })
    }

    /// Creates the animation variant spawned by a destruction.
    pub(crate) fn animation(kind: AnimKind) -> ActorKind {
        ActorKind::Animation {
            kind,
            ticks_left: ANIMATION_LENGTH,
        }
    }

    /// The kind id as used in level descriptions and glitch specifiers.
    pub(crate) fn id(&self) -> &'static str {
        match self {
            ActorKind::Chip => "chip",
            ActorKind::Melinda => "melinda",
            ActorKind::DirtBlock => "dirtBlock",
            ActorKind::IceBlock => "iceBlock",
            ActorKind::Ball => "ball",
            ActorKind::Ant => "ant",
            ActorKind::Centipede => "centipede",
            ActorKind::Fireball => "fireball",
            ActorKind::Glider => "glider",
            ActorKind::Walker => "walker",
            ActorKind::Blob => "blob",
            ActorKind::TeethRed => "teethRed",
            ActorKind::TankBlue { .. } => "tankBlue",
            ActorKind::EChip => "echip",
            ActorKind::EChipPlus => "echipPlus",
            ActorKind::Key(KeyColor::Red) => "keyRed",
            ActorKind::Key(KeyColor::Blue) => "keyBlue",
            ActorKind::Key(KeyColor::Yellow) => "keyYellow",
            ActorKind::Key(KeyColor::Green) => "keyGreen",
            ActorKind::BootWater => "bootWater",
            ActorKind::BootFire => "bootFire",
            ActorKind::BootIce => "bootIce",
            ActorKind::BootForceFloor => "bootForceFloor",
            ActorKind::BootDirt => "bootDirt",
            ActorKind::BootSpeed => "bootSpeed",
            ActorKind::Helmet => "helmet",
            ActorKind::BonusFlag => "bonusFlag",
            ActorKind::Hook => "hook",
            ActorKind::Floor => "floor",
            ActorKind::Ice => "ice",
            ActorKind::IceCorner => "iceCorner",
            ActorKind::ForceFloor => "forceFloor",
            ActorKind::ForceFloorRandom => "forceFloorRandom",
            ActorKind::Water => "water",
            ActorKind::Fire => "fire",
            ActorKind::Dirt => "dirt",
            ActorKind::Gravel => "gravel",
            ActorKind::Exit => "exit",
            ActorKind::EChipGate => "echipGate",
            ActorKind::Hint { .. } => "hint",
            ActorKind::RecessedWall => "popupWall",
            ActorKind::Void => "void",
            ActorKind::Slime => "slime",
            ActorKind::Bomb => "bomb",
            ActorKind::Turtle => "turtle",
            ActorKind::ThiefTool => "thiefTool",
            ActorKind::ThiefKey => "thiefKey",
            ActorKind::Trap { .. } => "trap",
            ActorKind::CloneMachine { .. } => "cloneMachine",
            ActorKind::Wall => "wall",
            ActorKind::SteelWall => "steelWall",
            ActorKind::InvisibleWall { .. } => "invisibleWall",
            ActorKind::AppearingWall => "appearingWall",
            ActorKind::BlueWall { .. } => "blueWall",
            ActorKind::GreenWall { .. } => "greenWall",
            ActorKind::ToggleWall { .. } => "toggleWall",
            ActorKind::SwitchWall { .. } => "switchWall",
            ActorKind::Door(KeyColor::Red) => "doorRed",
            ActorKind::Door(KeyColor::Blue) => "doorBlue",
            ActorKind::Door(KeyColor::Yellow) => "doorYellow",
            ActorKind::Door(KeyColor::Green) => "doorGreen",
            ActorKind::ThinWall => "thinWall",
            ActorKind::FlameJet { .. } => "flameJet",
            ActorKind::Railroad => "railroad",
            ActorKind::ButtonGreen => "buttonGreen",
            ActorKind::ButtonBlue => "buttonBlue",
            ActorKind::ButtonRed { .. } => "buttonRed",
            ActorKind::ButtonBrown { .. } => "buttonBrown",
            ActorKind::ButtonOrange { .. } => "buttonOrange",
            ActorKind::ButtonPink => "buttonPink",
            ActorKind::Animation { kind, .. } => kind.id(),
        }
    }

    /// The layer this variant occupies.
    pub(crate) fn layer(&self) -> Layer {
        match self {
            ActorKind::Chip
            | ActorKind::Melinda
            | ActorKind::DirtBlock
            | ActorKind::IceBlock
            | ActorKind::Ball
            | ActorKind::Ant
            | ActorKind::Centipede
            | ActorKind::Fireball
            | ActorKind::Glider
            | ActorKind::Walker
            | ActorKind::Blob
            | ActorKind::TeethRed
            | ActorKind::TankBlue { .. }
            | ActorKind::Animation { .. } => Layer::Movable,
            ActorKind::EChip
            | ActorKind::EChipPlus
            | ActorKind::Key(_)
            | ActorKind::BootWater
            | ActorKind::BootFire
            | ActorKind::BootIce
            | ActorKind::BootForceFloor
            | ActorKind::BootDirt
            | ActorKind::BootSpeed
            | ActorKind::Helmet
            | ActorKind::BonusFlag
            | ActorKind::Hook
            | ActorKind::Bomb => Layer::Item,
            ActorKind::ThinWall => Layer::Special,
            _ => Layer::Stationary,
        }
    }

    pub(crate) fn base_tags(&self) -> TagSet {
        match self {
            ActorKind::Chip => TagSet::of(&[
                Tag::Playable,
                Tag::Chip,
                Tag::CanReuseKeyGreen,
                Tag::ScaresTeethBlue,
            ]),
            ActorKind::Melinda => TagSet::of(&[
                Tag::Playable,
                Tag::Melinda,
                Tag::CanReuseKeyYellow,
                Tag::ScaresTeethRed,
            ]),
            ActorKind::DirtBlock => TagSet::of(&[Tag::Block, Tag::Cc1Block, Tag::Movable]),
            ActorKind::IceBlock => TagSet::of(&[
                Tag::Block,
                Tag::Cc2Block,
                Tag::Movable,
                Tag::CanStandOnItems,
            ]),
            ActorKind::Fireball => TagSet::of(&[
                Tag::AutonomousMonster,
                Tag::NormalMonster,
                Tag::Movable,
                Tag::Melting,
            ]),
            ActorKind::Ball
            | ActorKind::Ant
            | ActorKind::Centipede
            | ActorKind::Glider
            | ActorKind::Walker
            | ActorKind::Blob
            | ActorKind::TeethRed
            | ActorKind::TankBlue { .. } => {
                TagSet::of(&[Tag::AutonomousMonster, Tag::NormalMonster, Tag::Movable])
            }
            ActorKind::EChip
            | ActorKind::EChipPlus
            | ActorKind::Key(_)
            | ActorKind::BootWater
            | ActorKind::BootFire
            | ActorKind::BootIce
            | ActorKind::BootForceFloor
            | ActorKind::BootDirt
            | ActorKind::BootSpeed
            | ActorKind::Helmet
            | ActorKind::BonusFlag
            | ActorKind::Hook => TagSet::of(&[Tag::Item]),
            ActorKind::Ice | ActorKind::IceCorner => TagSet::of(&[Tag::Ice]),
            ActorKind::ForceFloor | ActorKind::ForceFloorRandom => TagSet::of(&[Tag::ForceFloor]),
            ActorKind::Water => TagSet::of(&[Tag::Water]),
            ActorKind::Fire => TagSet::of(&[Tag::Fire, Tag::Melting]),
            ActorKind::Dirt | ActorKind::Gravel => TagSet::of(&[Tag::Filth]),
            ActorKind::Slime => TagSet::of(&[Tag::Slime]),
            ActorKind::Bomb => TagSet::of(&[Tag::Bomb]),
            ActorKind::Wall
            | ActorKind::BlueWall { .. }
            | ActorKind::GreenWall { .. }
            | ActorKind::SteelWall => TagSet::of(&[Tag::Wall]),
            ActorKind::ThinWall => TagSet::of(&[Tag::ThinWall]),
            ActorKind::Door(_) => TagSet::of(&[Tag::Door]),
            _ => TagSet::EMPTY,
        }
    }

    pub(crate) fn push_rules(&self) -> TagRules {
        match self {
            ActorKind::Chip | ActorKind::Melinda => TagRules::new(&[Tag::Block], &[]),
            ActorKind::IceBlock => TagRules::new(&[Tag::Cc2Block], &[]),
            _ => TagRules::EMPTY,
        }
    }

    pub(crate) fn block_rules(&self) -> TagRules {
        match self {
            ActorKind::RecessedWall => TagRules::new(&[], &[Tag::Playable]),
            ActorKind::Dirt => TagRules::new(&[Tag::Cc1Block, Tag::NormalMonster, Tag::Melinda], &[]),
            ActorKind::Gravel => TagRules::new(&[Tag::NormalMonster, Tag::Melinda], &[]),
            ActorKind::Exit | ActorKind::Hint { .. } | ActorKind::Door(_) => {
                TagRules::new(&[Tag::NormalMonster, Tag::Cc1Block], &[])
            }
            ActorKind::EChipGate => TagRules::new(&[Tag::NormalMonster, Tag::Block], &[]),
            ActorKind::Fire => TagRules::new(&[Tag::AutonomousMonster], &[]),
            ActorKind::Turtle => TagRules::new(&[Tag::Melting], &[]),
            ActorKind::CloneMachine { .. } => {
                TagRules::new(&[Tag::Cc1Block, Tag::NormalMonster, Tag::Playable], &[])
            }
            ActorKind::ThiefTool | ActorKind::ThiefKey => {
                TagRules::new(&[Tag::NormalMonster, Tag::Cc1Block], &[])
            }
            ActorKind::Animation { .. } => TagRules::new(&[Tag::Playable], &[]),
            _ => TagRules::EMPTY,
        }
    }

    pub(crate) fn blocked_by_rules(&self) -> TagRules {
        TagRules::EMPTY
    }

    pub(crate) fn collision_ignore_rules(&self) -> TagRules {
        match self {
            ActorKind::Fireball => TagRules::new(&[Tag::Fire], &[]),
            _ => TagRules::EMPTY,
        }
    }

    pub(crate) fn ignore_rules(&self) -> TagRules {
        match self {
            ActorKind::DirtBlock => TagRules::new(&[Tag::Fire], &[]),
            ActorKind::Melinda => TagRules::new(&[Tag::Ice], &[]),
            ActorKind::Glider => TagRules::new(&[Tag::Water], &[]),
            ActorKind::Fireball => TagRules::new(&[Tag::Fire], &[]),
            ActorKind::Key(KeyColor::Red) => TagRules::new(&[], &[Tag::Playable]),
            ActorKind::Animation { .. } => TagRules::new(&[], &[Tag::Playable]),
            _ => TagRules::EMPTY,
        }
    }

    pub(crate) fn immune_rules(&self) -> TagRules {
        match self {
            ActorKind::SteelWall | ActorKind::EChipGate => TagRules::new(&[Tag::Tnt], &[]),
            ActorKind::Blob => TagRules::new(&[Tag::Slime], &[]),
            _ => TagRules::EMPTY,
        }
    }

    /// Base ticks per step before terrain and item modifiers.
    pub(crate) fn move_speed(&self) -> u32 {
        match self {
            ActorKind::Blob => 8,
            ActorKind::Animation { .. } => 0,
            _ => 4,
        }
    }

    /// Whether the actor takes part in the decision/move phases.
    pub(crate) fn is_deciding(&self) -> bool {
        self.layer() == Layer::Movable || matches!(self, ActorKind::InvisibleWall { .. })
    }

    pub(crate) fn is_playable(&self) -> bool {
        matches!(self, ActorKind::Chip | ActorKind::Melinda)
    }

    pub(crate) fn is_monster(&self) -> bool {
        matches!(
            self,
            ActorKind::Ball
                | ActorKind::Ant
                | ActorKind::Centipede
                | ActorKind::Fireball
                | ActorKind::Glider
                | ActorKind::Walker
                | ActorKind::Blob
                | ActorKind::TeethRed
                | ActorKind::TankBlue { .. }
        )
    }

    pub(crate) fn is_item(&self) -> bool {
        matches!(
            self,
            ActorKind::EChip
                | ActorKind::EChipPlus
                | ActorKind::Key(_)
                | ActorKind::BootWater
                | ActorKind::BootFire
                | ActorKind::BootIce
                | ActorKind::BootForceFloor
                | ActorKind::BootDirt
                | ActorKind::BootSpeed
                | ActorKind::Helmet
                | ActorKind::BonusFlag
                | ActorKind::Hook
        )
    }

    /// Terrain speed divisor applied to actors stepping onto this kind.
    pub(crate) fn terrain_speed_mod(&self) -> Option<u32> {
        match self {
            ActorKind::Ice
            | ActorKind::IceCorner
            | ActorKind::ForceFloor
            | ActorKind::ForceFloorRandom => Some(2),
            _ => None,
        }
    }

    /// The button channel this actor reacts to.
    pub(crate) fn cares_button_color(&self) -> Option<ButtonColor> {
        match self {
            ActorKind::ToggleWall { .. } => Some(ButtonColor::Green),
            ActorKind::TankBlue { .. } => Some(ButtonColor::Blue),
            ActorKind::CloneMachine { .. } => Some(ButtonColor::Red),
            ActorKind::Trap { .. } => Some(ButtonColor::Brown),
            ActorKind::FlameJet { .. } => Some(ButtonColor::Orange),
            _ => None,
        }
    }

    /// Whether this actor computes `powering_wires` each wire tick.
    pub(crate) fn provides_power(&self) -> bool {
        matches!(self, ActorKind::ButtonPink)
    }

    /// Whether this actor receives circuit power notifications.
    pub(crate) fn is_wire_output(&self) -> bool {
        matches!(
            self,
            ActorKind::SwitchWall { .. } | ActorKind::FlameJet { .. }
        )
    }

    /// Whether the redirect hook applies when leaving this actor's tile.
    pub(crate) fn has_redirect(&self) -> bool {
        matches!(self, ActorKind::Railroad)
    }

    /// Kinds whose on-tile effect is applied to residents when the level
    /// starts.
    pub(crate) fn has_level_start_on_tile(&self) -> bool {
        matches!(
            self,
            ActorKind::ForceFloor
                | ActorKind::ForceFloorRandom
                | ActorKind::Trap { .. }
                | ActorKind::CloneMachine { .. }
                | ActorKind::Bomb
        )
    }

    /// Kinds that act on idle movables resting on their tile.
    pub(crate) fn has_actor_on_tile(&self) -> bool {
        matches!(
            self,
            ActorKind::Trap { .. } | ActorKind::CloneMachine { .. } | ActorKind::FlameJet { .. }
        )
    }

    /// The wire-crossing treatment of this kind.
    pub(crate) fn wire_overlap_mode(&self, custom_data: &str) -> WireOverlapMode {
        match self {
            ActorKind::Floor => match custom_data {
                "cross" => WireOverlapMode::Cross,
                "alwaysCross" => WireOverlapMode::AlwaysCross,
                _ => WireOverlapMode::Overlap,
            },
            _ => WireOverlapMode::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ids_round_trip() {
        for id in [
            "chip", "melinda", "dirtBlock", "iceBlock", "ball", "ant", "centipede", "fireball",
            "glider", "walker", "blob", "teethRed", "tankBlue", "echip", "echipPlus", "keyRed",
            "keyBlue", "keyYellow", "keyGreen", "bootWater", "bootFire", "bootIce",
            "bootForceFloor", "bootDirt", "bootSpeed", "helmet", "bonusFlag", "hook", "floor",
            "ice", "iceCorner", "forceFloor", "forceFloorRandom", "water", "fire", "dirt",
            "gravel", "exit", "echipGate", "hint", "popupWall", "void", "slime", "bomb", "turtle",
            "thiefTool", "thiefKey", "trap", "cloneMachine", "wall", "steelWall", "invisibleWall",
            "appearingWall", "blueWall", "greenWall", "toggleWall", "switchWall", "doorRed",
            "doorBlue", "doorYellow", "doorGreen", "thinWall", "flameJet", "railroad",
            "buttonGreen", "buttonBlue", "buttonRed", "buttonBrown", "buttonOrange", "buttonPink",
            "explosionAnim", "splashAnim",
        ] {
            let kind = ActorKind::from_seed(id, "").expect("known kind id");
            assert_eq!(kind.id(), id);
        }
        assert!(ActorKind::from_seed("ghost", "").is_none());
    }

    #[test]
    fn custom_data_configures_payloads() {
        assert_eq!(
            ActorKind::from_seed("toggleWall", "on"),
            Some(ActorKind::ToggleWall { closed: true })
        );
        assert_eq!(
            ActorKind::from_seed("blueWall", "real"),
            Some(ActorKind::BlueWall { real: true })
        );
        assert_eq!(
            ActorKind::from_seed("flameJet", ""),
            Some(ActorKind::FlameJet { on: false })
        );
    }

    #[test]
    fn rail_segments_parse_and_skip_junk() {
        let segments = parse_rail_segments("ne, ew,bogus");
        assert_eq!(segments, vec![RailSegment::NorthEast, RailSegment::EastWest]);
        assert!(parse_rail_segments("").is_empty());
    }

    #[test]
    fn movables_decide_and_monsters_are_movable() {
        assert!(ActorKind::Chip.is_deciding());
        assert!(ActorKind::Blob.is_monster());
        assert!(!ActorKind::Wall.is_deciding());
        assert!(ActorKind::InvisibleWall { visible_for: 0 }.is_deciding());
        assert_eq!(ActorKind::Blob.move_speed(), 8);
    }
}
