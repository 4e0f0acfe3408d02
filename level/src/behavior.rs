//! Capability dispatch over the actor roster.
//!
//! Each function here is one hook of the simulation engine, matched over
//! [`ActorKind`]. The engine calls hooks with ids, never references, so a
//! hook may freely destroy, replace or spawn actors; callers re-follow
//! forwarding ids afterwards.

use gridlock_core::{ActorId, Direction, GameState, KeyInputs, Layer, Tag, TagRules};

use crate::actor::SlidingState;
use crate::kind::{ActorKind, AnimKind, ButtonColor, KeyColor, parse_rail_segments};
use crate::LevelState;

/// Where a collected item ends up.
enum ItemDestination {
    /// Consumed immediately (chips, bonus flags).
    None,
    /// Counted per color (keys).
    Key(KeyColor),
    /// Carried in the bounded item list.
    Carried,
}

fn item_destination(kind: &ActorKind) -> ItemDestination {
    match kind {
        ActorKind::EChip | ActorKind::EChipPlus | ActorKind::BonusFlag => ItemDestination::None,
        ActorKind::Key(color) => ItemDestination::Key(*color),
        _ => ItemDestination::Carried,
    }
}

/// Instance-level blocking predicate, the `blocks` hook.
pub(crate) fn blocks_hook(
    level: &mut LevelState,
    blocker: ActorId,
    mover: ActorId,
    direction: Direction,
) -> bool {
    let kind = level.actor(blocker).kind.clone();
    match kind {
        ActorKind::Chip
        | ActorKind::Melinda
        | ActorKind::DirtBlock
        | ActorKind::IceBlock
        | ActorKind::Wall
        | ActorKind::SteelWall
        | ActorKind::InvisibleWall { .. }
        | ActorKind::AppearingWall => true,
        kind if kind.is_monster() => true,
        ActorKind::BlueWall { real } => {
            real || TagRules::new(&[Tag::Cc1Block, Tag::NormalMonster], &[])
                .matches(level.actor(mover).tags)
        }
        ActorKind::GreenWall { real } => {
            real || level.actor(mover).tags.contains(Tag::Block)
        }
        ActorKind::ToggleWall { closed } => closed,
        ActorKind::SwitchWall { open } => !open,
        ActorKind::Door(color) => level.actor(mover).inventory.keys[color.index()] == 0,
        ActorKind::ThinWall => direction == level.actor(blocker).direction.back(),
        ActorKind::IceCorner => {
            let facing = level.actor(blocker).direction;
            !(direction == facing || direction == facing.right())
        }
        ActorKind::EChipGate => level.chips_left != 0,
        ActorKind::CloneMachine { .. } => {
            let position = level.actor(blocker).position;
            level
                .field
                .tile(position)
                .actor_on(Layer::Movable)
                .is_some()
        }
        ActorKind::Railroad => {
            let mouths = rail_mouths(level, blocker);
            !mouths.contains(&direction.back())
        }
        ActorKind::Key(KeyColor::Blue) => false,
        kind if kind.is_item() => {
            let position = level.actor(blocker).position;
            level
                .field
                .tile(position)
                .actor_on(Layer::ItemSuffix)
                .is_none()
                && !TagRules::new(
                    &[Tag::CanPickupItems, Tag::CanStandOnItems, Tag::Playable],
                    &[],
                )
                .matches(level.actor(mover).tags)
        }
        _ => false,
    }
}

/// The `exit_blocks` hook: may this actor veto another leaving its tile?
pub(crate) fn exit_blocks_hook(
    level: &mut LevelState,
    blocker: ActorId,
    _mover: ActorId,
    direction: Direction,
) -> bool {
    match level.actor(blocker).kind {
        ActorKind::ThinWall => direction == level.actor(blocker).direction,
        ActorKind::Trap { open_requests } => open_requests == 0,
        ActorKind::CloneMachine { cloning } => !cloning,
        _ => false,
    }
}

/// The redirect hook: a tile member may bend (or refuse) an attempted
/// movement direction. `None` is equivalent to a full exit block.
pub(crate) fn redirect_tile_member(
    level: &mut LevelState,
    member: ActorId,
    other: ActorId,
    attempted: Direction,
) -> Option<Direction> {
    match level.actor(member).kind {
        ActorKind::Railroad => {
            let entry = level.actor(other).direction.back();
            let segments = parse_rail_segments(&level.actor(member).custom_data);
            let mut candidates: Vec<Direction> = Vec::new();
            for segment in segments {
                let (a, b) = segment.ends();
                if a == entry {
                    candidates.push(b);
                } else if b == entry {
                    candidates.push(a);
                }
            }
            if candidates.is_empty() {
                return None;
            }
            if candidates.contains(&attempted) {
                return Some(attempted);
            }
            for turns in 1..4 {
                let candidate = attempted.rotated(turns);
                if candidates.contains(&candidate) {
                    return Some(candidate);
                }
            }
            Some(candidates[0])
        }
        _ => Some(attempted),
    }
}

fn rail_mouths(level: &LevelState, rail: ActorId) -> Vec<Direction> {
    let mut mouths = Vec::new();
    for segment in parse_rail_segments(&level.actor(rail).custom_data) {
        let (a, b) = segment.ends();
        if !mouths.contains(&a) {
            mouths.push(a);
        }
        if !mouths.contains(&b) {
            mouths.push(b);
        }
    }
    mouths
}

fn monster_contact_kill(level: &mut LevelState, monster: ActorId, victim: ActorId) {
    if !level.actor(victim).kind.is_playable() {
        return;
    }
    if level.actor(victim).tags.contains(Tag::IgnoreDefaultMonsterKill)
        || level.actor(monster).tags.contains(Tag::IgnoreDefaultMonsterKill)
    {
        return;
    }
    let _ = level.destroy(victim, Some(monster), Some(AnimKind::Explosion));
}

fn melt_ice_block(level: &mut LevelState, block: ActorId, heat: ActorId) {
    if !level.actor(heat).tags.contains(Tag::Melting) {
        return;
    }
    let position = level.actor(block).position;
    if !level.destroy(block, None, None) {
        return;
    }
    if level.actor(heat).layer == Layer::Stationary {
        let _ = level.destroy(heat, Some(block), None);
    }
    if level
        .field
        .tile(position)
        .actor_on(Layer::Stationary)
        .is_none()
    {
        let _ = level.spawn_actor(ActorKind::Water, position, Direction::Up, String::new());
    }
}

/// The `bumped` hook: another actor ran into this one.
pub(crate) fn bumped(level: &mut LevelState, this: ActorId, other: ActorId, _direction: Direction) {
    if !level.actor(this).exists {
        return;
    }
    let kind = level.actor(this).kind.clone();
    match kind {
        kind if kind.is_monster() => monster_contact_kill(level, this, other),
        ActorKind::IceBlock => melt_ice_block(level, this, other),
        ActorKind::InvisibleWall { .. } => {
            if level.actor(other).kind.is_playable() {
                if let ActorKind::InvisibleWall { visible_for } = &mut level.actor_mut(this).kind {
                    *visible_for = 36;
                }
            }
        }
        ActorKind::AppearingWall => {
            if level.actor(other).kind.is_playable() {
                let _ = level.replace_terrain(this, ActorKind::Wall);
            }
        }
        ActorKind::BlueWall { real } => {
            if TagRules::new(&[Tag::Cc1Block, Tag::NormalMonster], &[])
                .matches(level.actor(other).tags)
            {
                return;
            }
            if real {
                // The revealed wall inherits the probe, so the prober is
                // still blocked by it on this very check.
                let _ = level.replace_terrain(this, ActorKind::Wall);
            } else {
                let _ = level.destroy(this, Some(other), None);
            }
        }
        _ => {}
    }
}

/// The `bumped_actor` hook: this actor ran into another.
pub(crate) fn bumped_actor(
    level: &mut LevelState,
    this: ActorId,
    other: ActorId,
    _direction: Direction,
    _on_exit: bool,
) {
    if !level.actor(this).exists || !level.actor(other).exists {
        return;
    }
    let kind = level.actor(this).kind.clone();
    match kind {
        kind if kind.is_monster() => monster_contact_kill(level, this, other),
        ActorKind::DirtBlock | ActorKind::IceBlock => {
            if level.actor(other).kind.is_playable() {
                let _ = level.destroy(other, Some(this), Some(AnimKind::Explosion));
            }
        }
        _ => {}
    }
}

/// The `actor_joined` hook: another actor attached to this actor's tile.
pub(crate) fn actor_joined(level: &mut LevelState, this: ActorId, other: ActorId) {
    match level.actor(this).kind {
        ActorKind::Ice | ActorKind::IceCorner => {
            level.actor_mut(other).sliding = SlidingState::Strong;
        }
        _ => {}
    }
}

/// The `actor_left` hook: another actor detached from this actor's tile.
pub(crate) fn actor_left(level: &mut LevelState, this: ActorId, _other: ActorId) {
    if !level.actor(this).exists {
        return;
    }
    let kind = level.actor(this).kind.clone();
    match kind {
        ActorKind::RecessedWall => {
            let _ = level.replace_terrain(this, ActorKind::Wall);
        }
        ActorKind::Turtle => {
            let position = level.actor(this).position;
            if level.destroy(this, None, Some(AnimKind::Splash)) {
                let _ = level.spawn_actor(ActorKind::Water, position, Direction::Up, String::new());
            }
        }
        ActorKind::ButtonGreen => press_global(level, ButtonColor::Green, false),
        ActorKind::ButtonBlue => press_global(level, ButtonColor::Blue, false),
        ActorKind::ButtonRed { connected }
        | ActorKind::ButtonBrown { connected }
        | ActorKind::ButtonOrange { connected } => {
            if let Some(target) = connected {
                button_unpressed(level, target);
            }
        }
        _ => {}
    }
}

/// The `actor_completely_joined` hook: another actor finished its move
/// onto this actor's tile.
pub(crate) fn actor_completely_joined(level: &mut LevelState, this: ActorId, other: ActorId) {
    if !level.actor(this).exists || !level.actor(other).exists {
        return;
    }
    let kind = level.actor(this).kind.clone();
    match kind {
        ActorKind::Water => {
            match level.actor(other).kind {
                ActorKind::DirtBlock => {
                    if level.destroy(other, Some(this), Some(AnimKind::Splash)) {
                        let _ = level.replace_terrain(this, ActorKind::Dirt);
                    }
                }
                ActorKind::IceBlock => {
                    if level.destroy(other, Some(this), Some(AnimKind::Splash)) {
                        let _ = level.replace_terrain(this, ActorKind::Ice);
                    }
                }
                _ => {
                    let _ = level.destroy(other, Some(this), Some(AnimKind::Splash));
                }
            }
        }
        ActorKind::Fire => match level.actor(other).kind {
            ActorKind::IceBlock => melt_ice_block(level, other, this),
            _ => {
                let _ = level.destroy(other, Some(this), Some(AnimKind::Explosion));
            }
        },
        ActorKind::Void => {
            let _ = level.destroy(other, Some(this), None);
        }
        ActorKind::Slime => {
            let other_tags = level.actor(other).tags;
            let survives = !other_tags.contains(Tag::DiesInSlime)
                && TagRules::new(&[Tag::Block, Tag::ClearsSlime], &[]).matches(other_tags);
            if survives {
                let _ = level.destroy(this, None, None);
            } else {
                let _ = level.destroy(other, Some(this), Some(AnimKind::Splash));
            }
        }
        ActorKind::Bomb => {
            if level.actor(other).layer == Layer::Movable {
                let _ = level.destroy(other, Some(this), None);
                let _ = level.destroy(this, Some(other), Some(AnimKind::Explosion));
            }
        }
        ActorKind::Dirt => {
            let _ = level.destroy(this, None, None);
        }
        ActorKind::Exit => {
            if level.actor(other).kind.is_playable() {
                let _ = level.destroy(other, Some(this), None);
                level.game_state = GameState::Playing;
                level.playables_left = level.playables_left.saturating_sub(1);
                level.playables_to_swap = true;
                if level.playables_left == 0 {
                    level.game_state = GameState::Won;
                }
            }
        }
        ActorKind::EChipGate => {
            if level.chips_left == 0 {
                let _ = level.destroy(this, Some(other), None);
            }
        }
        ActorKind::Hint { ref text } => {
            if level.actor(other).kind.is_playable() {
                if let Some(text) = text {
                    log::debug!("hint shown: {text}");
                }
            }
        }
        ActorKind::ThiefTool => {
            if level.actor(other).kind.is_playable() {
                level.actor_mut(other).inventory.items.clear();
                level.recompute_tags(other);
                level.bonus_points /= 2;
            }
        }
        ActorKind::ThiefKey => {
            if level.actor(other).kind.is_playable() {
                level.actor_mut(other).inventory.keys = [0; 4];
                level.bonus_points /= 2;
            }
        }
        ActorKind::ForceFloor => {
            if level.actor(other).layer == Layer::Movable {
                let direction = level.actor(this).direction;
                let actor = level.actor_mut(other);
                actor.sliding = SlidingState::Weak;
                actor.direction = direction;
            }
        }
        ActorKind::ForceFloorRandom => {
            if level.actor(other).layer == Layer::Movable {
                let direction = level.rff_direction;
                level.rff_direction = level.rff_direction.right();
                let actor = level.actor_mut(other);
                actor.sliding = SlidingState::Weak;
                actor.direction = direction;
            }
        }
        ActorKind::IceCorner => {
            let facing = level.actor(this).direction.index() as i32;
            let incoming = level.actor(other).direction.index() as i32;
            let turned = (incoming + (facing - incoming) * 2 + 3).rem_euclid(4);
            level.actor_mut(other).direction = Direction::from_index(turned as u8);
        }
        ActorKind::Trap { open_requests } => {
            if open_requests == 0 {
                level.actor_mut(other).sliding = SlidingState::Weak;
            }
        }
        ActorKind::CloneMachine { .. } => {
            level.actor_mut(other).sliding = SlidingState::Strong;
        }
        ActorKind::ButtonGreen => press_global(level, ButtonColor::Green, true),
        ActorKind::ButtonBlue => press_global(level, ButtonColor::Blue, true),
        ActorKind::ButtonRed { connected }
        | ActorKind::ButtonBrown { connected }
        | ActorKind::ButtonOrange { connected } => {
            if let Some(target) = connected {
                button_pressed(level, target);
            }
        }
        ActorKind::Door(color) => {
            if level.actor(other).inventory.keys[color.index()] > 0 {
                {
                    let reusable = level.actor(other).tags.contains(color.reuse_tag());
                    let keys = &mut level.actor_mut(other).inventory.keys;
                    if !reusable {
                        keys[color.index()] -= 1;
                    }
                }
                let _ = level.destroy(this, Some(other), None);
            }
        }
        kind if kind.is_item() => item_pickup(level, this, other),
        _ => {}
    }
}

fn item_pickup(level: &mut LevelState, item: ActorId, other: ActorId) {
    if level.actor(other).tags.contains(Tag::CanStandOnItems) {
        return;
    }
    let position = level.actor(item).position;
    if level
        .field
        .tile(position)
        .actor_on(Layer::ItemSuffix)
        .is_some()
    {
        return;
    }
    if !level.destroy(item, Some(other), None) {
        return;
    }
    match item_destination(&level.actor(item).kind) {
        ItemDestination::Key(color) => {
            level.actor_mut(other).inventory.keys[color.index()] += 1;
        }
        ItemDestination::Carried => level.pickup_item(item, other),
        ItemDestination::None => {}
    }
    // Pickup side effects.
    match level.actor(item).kind {
        ActorKind::EChip | ActorKind::EChipPlus => {
            level.chips_left = level.chips_left.saturating_sub(1);
        }
        ActorKind::BonusFlag => {
            if level.actor(other).kind.is_playable() {
                let data = level.actor(item).custom_data.clone();
                apply_bonus_flag(level, &data);
            }
        }
        _ => {}
    }
}

fn apply_bonus_flag(level: &mut LevelState, data: &str) {
    if let Some(factor) = data.strip_prefix('*') {
        match factor.parse::<u32>() {
            Ok(factor) => level.bonus_points *= factor,
            Err(_) => log::warn!("ignoring malformed bonus flag multiplier {data:?}"),
        }
    } else {
        match data.parse::<u32>() {
            Ok(points) => level.bonus_points += points,
            Err(_) => log::warn!("ignoring malformed bonus flag value {data:?}"),
        }
    }
}

/// The `new_tile_joined` hook: this actor attached to a new tile.
pub(crate) fn new_tile_joined(level: &mut LevelState, id: ActorId) {
    if !matches!(level.actor(id).kind, ActorKind::Blob) {
        return;
    }
    let Some(old) = level.actor(id).old_position else {
        return;
    };
    let spread = level
        .tile_actor_ids(old)
        .into_iter()
        .find(|&other| level.actor(other).tags.contains(Tag::Slime));
    if let Some(slime) = spread {
        let layer = level.actor(slime).layer;
        let position = level.actor(id).position;
        if level.field.tile(position).actor_on(layer).is_none() {
            let custom = level.actor(slime).custom_data.clone();
            let _ = level.spawn_actor(ActorKind::Slime, position, Direction::Up, custom);
        }
    }
}

/// The idle on-tile hook, fired each subtick an actor rests on this tile.
pub(crate) fn actor_on_tile(level: &mut LevelState, this: ActorId, other: ActorId) {
    if !level.actor(this).exists || !level.actor(other).exists {
        return;
    }
    match level.actor(this).kind {
        ActorKind::Trap { open_requests } => {
            if open_requests == 0 {
                level.actor_mut(other).sliding = SlidingState::Weak;
            }
        }
        ActorKind::CloneMachine { .. } => {
            level.actor_mut(other).sliding = SlidingState::Strong;
        }
        ActorKind::FlameJet { on } => {
            if on && level.actor(other).layer == Layer::Movable {
                let _ = level.destroy(other, Some(this), Some(AnimKind::Explosion));
            }
        }
        _ => {}
    }
}

/// Notification that a sliding actor failed its forced move on this
/// actor's tile.
pub(crate) fn on_member_slide_bonked(level: &mut LevelState, member: ActorId, slider: ActorId) {
    match level.actor(member).kind {
        ActorKind::Ice => {
            let reversed = level.actor(slider).direction.back();
            level.actor_mut(slider).direction = reversed;
        }
        ActorKind::IceCorner => {
            let facing = level.actor(member).direction.index() as i32;
            let incoming = level.actor(slider).direction.index() as i32;
            let turned = (incoming - ((facing - incoming) * 2 - 5)).rem_euclid(4);
            level.actor_mut(slider).direction = Direction::from_index(turned as u8);
        }
        ActorKind::ForceFloor | ActorKind::ForceFloorRandom => {
            // One subtick of cooldown before the next forced attempt.
            level.actor_mut(slider).cooldown += 1;
        }
        _ => {}
    }
}

/// The per-decision hook for actors with passive tick behavior.
pub(crate) fn on_each_decision(level: &mut LevelState, id: ActorId) {
    let kind = level.actor(id).kind.clone();
    match kind {
        ActorKind::InvisibleWall { visible_for } => {
            if visible_for > 0 {
                if let ActorKind::InvisibleWall { visible_for } = &mut level.actor_mut(id).kind {
                    *visible_for -= 1;
                }
            }
        }
        ActorKind::Animation { ticks_left, .. } => {
            let remaining = ticks_left.saturating_sub(1);
            if let ActorKind::Animation { ticks_left, .. } = &mut level.actor_mut(id).kind {
                *ticks_left = remaining;
            }
            if remaining == 0 {
                let _ = level.destroy(id, None, None);
            }
        }
        _ => {}
    }
}

/// The voluntary movement preferences of autonomous actors, in try order.
pub(crate) fn decide_movement(level: &mut LevelState, id: ActorId) -> Vec<Direction> {
    let facing = level.actor(id).direction;
    let kind = level.actor(id).kind.clone();
    match kind {
        ActorKind::Ball => vec![facing, facing.back()],
        ActorKind::Ant => vec![facing.left(), facing, facing.right(), facing.back()],
        ActorKind::Centipede => vec![facing.right(), facing, facing.left(), facing.back()],
        ActorKind::Fireball => vec![facing, facing.right(), facing.left(), facing.back()],
        ActorKind::Glider => vec![facing, facing.left(), facing.right(), facing.back()],
        ActorKind::Walker => {
            if level.check_collision(id, facing).allowed {
                vec![facing]
            } else {
                let roll = level.prng.random();
                vec![Direction::from_index(roll.wrapping_add(facing.index()))]
            }
        }
        ActorKind::Blob => {
            let roll = level.prng.random();
            let pattern = level.blob_prng.blob_mod();
            vec![Direction::from_index(roll.wrapping_add(pattern))]
        }
        ActorKind::TeethRed => {
            let Some(target) = level.selected_playable else {
                return Vec::new();
            };
            if (level.current_tick + 1) % 8 >= 4 {
                return Vec::new();
            }
            let this_position = level.actor(id).position;
            let target_position = level.actor(target).position;
            let dx = this_position.x() as i64 - target_position.x() as i64;
            let dy = this_position.y() as i64 - target_position.y() as i64;
            let mut directions: Vec<Direction> = Vec::new();
            if dx != 0 {
                directions.push(Direction::from_index((dx.signum() + 2) as u8));
            }
            if dy != 0 {
                directions.push(Direction::from_index((-dy.signum() + 1) as u8));
            }
            if dy.abs() >= dx.abs() {
                directions.reverse();
            }
            directions
        }
        ActorKind::TankBlue { turn_pending } => {
            if turn_pending {
                if let ActorKind::TankBlue { turn_pending } = &mut level.actor_mut(id).kind {
                    *turn_pending = false;
                }
                vec![facing.back()]
            } else {
                vec![facing]
            }
        }
        _ => Vec::new(),
    }
}

/// Splits held movement keys into at most one vertical and one horizontal
/// direction; opposing keys on one axis cancel out.
fn movement_directions(input: KeyInputs) -> (Option<Direction>, Option<Direction>) {
    let mut axes: [Option<Option<Direction>>; 2] = [None, None];
    let keys = [
        (input.up, Direction::Up),
        (input.right, Direction::Right),
        (input.down, Direction::Down),
        (input.left, Direction::Left),
    ];
    for (held, direction) in keys {
        if !held {
            continue;
        }
        let axis = (direction.index() % 2) as usize;
        axes[axis] = match axes[axis] {
            None => Some(Some(direction)),
            Some(_) => Some(None),
        };
    }
    (axes[0].flatten(), axes[1].flatten())
}

/// Full decision logic for playables: one-shot keys, sliding overrides
/// and the two-direction tie-break rules.
pub(crate) fn playable_decide(level: &mut LevelState, id: ActorId, forced_only: bool) {
    level.actor_mut(id).move_decision = None;
    let is_selected = level.selected_playable == Some(id);
    let (sliding, cooldown, has_override) = {
        let actor = level.actor(id);
        (actor.sliding, actor.cooldown, actor.has_override)
    };
    if is_selected
        && (sliding != SlidingState::None || cooldown == 0)
        && level.game_input.switch_playable
        && level.released_keys.switch_playable
    {
        level.playables_to_swap = true;
        level.released_keys.switch_playable = false;
    }
    if cooldown > 0 {
        return;
    }
    let can_move = is_selected
        && (sliding == SlidingState::None || (sliding == SlidingState::Weak && has_override))
        && !forced_only;
    if can_move {
        if level.game_input.rotate_inv && level.released_keys.rotate_inv {
            let items = &mut level.actor_mut(id).inventory.items;
            if let Some(last) = items.pop() {
                items.insert(0, last);
            }
            level.released_keys.rotate_inv = false;
        }
        if level.game_input.drop && level.released_keys.drop {
            let _ = level.drop_last_item(id);
            level.released_keys.drop = false;
        }
    }
    let (vertical, horizontal) = movement_directions(level.game_input);
    if sliding != SlidingState::None && (!can_move || (vertical.is_none() && horizontal.is_none()))
    {
        // Forced to keep sliding (or happy to).
        let direction = level.actor(id).direction;
        level.actor_mut(id).move_decision = Some(direction);
        if sliding == SlidingState::Weak {
            level.actor_mut(id).has_override = true;
        }
        return;
    }
    if !can_move || (vertical.is_none() && horizontal.is_none()) {
        return;
    }
    let mut bonked = false;
    match (vertical, horizontal) {
        (Some(wanted), None) | (None, Some(wanted)) => {
            let result = level.check_collision(id, wanted);
            bonked = !result.allowed;
            level.actor_mut(id).move_decision = Some(result.direction);
        }
        (Some(vertical), Some(horizontal)) => {
            let result_h = level.check_collision(id, horizontal);
            let horizontal = result_h.direction;
            let result_v = level.check_collision(id, vertical);
            let vertical = result_v.direction;
            let facing = level.actor(id).direction;
            let decision = if result_h.allowed && !result_v.allowed {
                horizontal
            } else if result_v.allowed && !result_h.allowed {
                vertical
            } else {
                bonked = !result_h.allowed;
                if !result_h.allowed {
                    // Both blocked: always choose horizontal.
                    horizontal
                } else if horizontal == facing {
                    horizontal
                } else if vertical == facing {
                    vertical
                } else {
                    horizontal
                }
            };
            level.actor_mut(id).move_decision = Some(decision);
        }
        (None, None) => {}
    }
    level.actor_mut(id).has_override = bonked;
}

/// Presses or releases a global button channel on every subscriber.
pub(crate) fn press_global(level: &mut LevelState, color: ButtonColor, pressed: bool) {
    let subscribers: Vec<ActorId> = level
        .actors
        .clone()
        .into_iter()
        .filter(|&id| level.actor(id).kind.cares_button_color() == Some(color))
        .collect();
    for target in subscribers {
        if pressed {
            button_pressed(level, target);
        } else {
            button_unpressed(level, target);
        }
    }
}

/// Delivers a button press to one subscriber.
pub(crate) fn button_pressed(level: &mut LevelState, target: ActorId) {
    if !level.actor(target).exists {
        return;
    }
    match level.actor(target).kind {
        ActorKind::ToggleWall { closed } => {
            if let ActorKind::ToggleWall { closed: state } = &mut level.actor_mut(target).kind {
                *state = !closed;
            }
        }
        ActorKind::TankBlue { .. } => {
            if let ActorKind::TankBlue { turn_pending } = &mut level.actor_mut(target).kind {
                *turn_pending = true;
            }
        }
        ActorKind::Trap { open_requests } => {
            if let ActorKind::Trap { open_requests: state } = &mut level.actor_mut(target).kind {
                *state = open_requests + 1;
            }
        }
        ActorKind::FlameJet { on } => {
            if let ActorKind::FlameJet { on: state } = &mut level.actor_mut(target).kind {
                *state = !on;
            }
        }
        ActorKind::CloneMachine { .. } => clone_machine_fire(level, target),
        _ => {}
    }
}

/// Delivers a button release to one subscriber.
pub(crate) fn button_unpressed(level: &mut LevelState, target: ActorId) {
    if !level.actor(target).exists {
        return;
    }
    match level.actor(target).kind {
        ActorKind::Trap { open_requests } => {
            let remaining = open_requests.saturating_sub(1);
            if let ActorKind::Trap { open_requests: state } = &mut level.actor_mut(target).kind {
                *state = remaining;
            }
            if remaining == 0 {
                let position = level.actor(target).position;
                if let Some(held) = level.field.tile(position).actor_on(Layer::Movable) {
                    level.actor_mut(held).sliding = SlidingState::Weak;
                }
            }
        }
        ActorKind::FlameJet { on } => {
            if let ActorKind::FlameJet { on: state } = &mut level.actor_mut(target).kind {
                *state = !on;
            }
        }
        _ => {}
    }
}

fn clone_machine_fire(level: &mut LevelState, machine: ActorId) {
    set_cloning(level, machine, true);
    let position = level.actor(machine).position;
    if let Some(clonee) = level.field.tile(position).actor_on(Layer::Movable) {
        let direction = level.actor(clonee).direction;
        if level.check_collision(clonee, direction).allowed {
            let kind = level.actor(clonee).kind.clone();
            let custom = level.actor(clonee).custom_data.clone();
            if level.internal_step(clonee, direction) {
                let spawned = level.spawn_actor(kind, position, direction, custom);
                level.actor_mut(spawned).direction = direction;
            }
        }
    }
    set_cloning(level, machine, false);
}

fn set_cloning(level: &mut LevelState, machine: ActorId, value: bool) {
    if let ActorKind::CloneMachine { cloning } = &mut level.actor_mut(machine).kind {
        *cloning = value;
    }
}

/// The level-start hook, fired once per actor before the first decision.
pub(crate) fn level_started(level: &mut LevelState, id: ActorId) {
    if !level.actor(id).exists {
        return;
    }
    let kind = level.actor(id).kind.clone();
    match kind {
        ActorKind::Chip | ActorKind::Melinda => {
            if level.playables_required_all {
                level.playables_left += 1;
            }
        }
        ActorKind::ButtonRed { .. } => {
            let target = resolve_button_target(level, id, ButtonColor::Red);
            if let ActorKind::ButtonRed { connected } = &mut level.actor_mut(id).kind {
                *connected = target;
            }
        }
        ActorKind::ButtonBrown { .. } => {
            let target = resolve_button_target(level, id, ButtonColor::Brown);
            if let ActorKind::ButtonBrown { connected } = &mut level.actor_mut(id).kind {
                *connected = target;
            }
            // Brown buttons held down at level start open their trap.
            let position = level.actor(id).position;
            if level
                .field
                .tile(position)
                .actor_on(Layer::Movable)
                .is_some()
            {
                if let Some(target) = target {
                    button_pressed(level, target);
                }
            }
        }
        ActorKind::ButtonOrange { .. } => {
            let target = resolve_orange_target(level, id);
            if let ActorKind::ButtonOrange { connected } = &mut level.actor_mut(id).kind {
                *connected = target;
            }
        }
        _ => {}
    }
}

/// Resolves a reading-order button connection: an explicit connection is
/// honored first, then the actor list is scanned cyclically starting past
/// the button.
fn resolve_button_target(
    level: &mut LevelState,
    button: ActorId,
    color: ButtonColor,
) -> Option<ActorId> {
    let position = level.actor(button).position;
    let explicit = level
        .connections
        .iter()
        .find(|connection| connection.from == position)
        .map(|connection| connection.to);
    if let Some(target_tile) = explicit {
        if target_tile.x() < level.field.width() && target_tile.y() < level.field.height() {
            let found = level
                .tile_actor_ids(target_tile)
                .into_iter()
                .find(|&other| level.actor(other).kind.cares_button_color() == Some(color));
            if found.is_some() {
                return found;
            }
        } else {
            log::warn!(
                "button connection target ({}, {}) is out of bounds",
                target_tile.x(),
                target_tile.y()
            );
        }
    }
    let order = level.actors.clone();
    let start = order.iter().position(|&other| other == button)?;
    for offset in 1..=order.len() {
        let candidate = order[(start + offset) % order.len()];
        if level.actor(candidate).kind.cares_button_color() == Some(color) {
            return Some(candidate);
        }
    }
    None
}

/// Resolves an orange-button connection by expanding diamond rings around
/// the button until a flame jet is found.
fn resolve_orange_target(level: &mut LevelState, button: ActorId) -> Option<ActorId> {
    let position = level.actor(button).position;
    let explicit = level
        .connections
        .iter()
        .find(|connection| connection.from == position)
        .map(|connection| connection.to);
    if let Some(target_tile) = explicit {
        if target_tile.x() < level.field.width() && target_tile.y() < level.field.height() {
            let found = level
                .tile_actor_ids(target_tile)
                .into_iter()
                .find(|&other| {
                    level.actor(other).kind.cares_button_color() == Some(ButtonColor::Orange)
                });
            if found.is_some() {
                return found;
            }
        }
    }
    let width = level.field.width() as i64;
    let height = level.field.height() as i64;
    let max_radius = (width + height) as u32;
    for radius in 1..=max_radius {
        for tile in diamond_ring(position, radius, width, height) {
            let found = level
                .tile_actor_ids(tile)
                .into_iter()
                .find(|&other| {
                    level.actor(other).kind.cares_button_color() == Some(ButtonColor::Orange)
                });
            if found.is_some() {
                return found;
            }
        }
    }
    None
}

/// The tiles at exactly `radius` diamond distance, walked east, north,
/// west, south the way the emulated game's diamond search does.
fn diamond_ring(
    center: gridlock_core::Position,
    radius: u32,
    width: i64,
    height: i64,
) -> Vec<gridlock_core::Position> {
    let radius = radius as i64;
    let cx = center.x() as i64;
    let cy = center.y() as i64;
    let offsets: [(i64, i64); 4] = [(-1, -1), (-1, 1), (1, 1), (1, -1)];
    let targets: [(i64, i64); 4] = [(0, -radius), (-radius, 0), (0, radius), (radius, 0)];
    let mut ring = Vec::new();
    let mut current = (radius, 0i64);
    let mut segment = 0usize;
    loop {
        if current == targets[segment] {
            segment += 1;
            if segment == 4 {
                break;
            }
        }
        let x = cx + current.0;
        let y = cy + current.1;
        if x >= 0 && y >= 0 && x < width && y < height {
            ring.push(gridlock_core::Position::new(x as u32, y as u32));
        }
        current.0 += offsets[segment].0;
        current.1 += offsets[segment].1;
    }
    ring
}
