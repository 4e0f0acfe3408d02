//! The actor arena and the collision/movement resolution engine.
//!
//! Actors live in a per-level arena indexed by [`ActorId`]; tiles store at
//! most one id per layer. Destroyed actors keep their slot with `exists`
//! cleared and may leave a `new_actor` forwarding id, so iteration that is
//! mid-flight when an actor is replaced can transparently follow to the
//! replacement instead of losing its place.

use gridlock_core::{
    ActorId, Direction, GlitchEvent, GlitchKind, Layer, Position, Tag, TagRules, TagSet,
    WireOverlapMode, WireSet,
};

use crate::behavior;
use crate::kind::{ActorKind, AnimKind};
use crate::tile::Tile;
use crate::LevelState;

/// How firmly terrain is currently dragging an actor.
///
/// Playables can escape weak sliding once they have earned an override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum SlidingState {
    #[default]
    None,
    /// Force floors and similar; playables may override.
    Weak,
    /// Ice and clone machines; nobody overrides.
    Strong,
}

/// Carried items and counted keys.
#[derive(Clone, Debug, Default)]
pub(crate) struct Inventory {
    pub(crate) items: Vec<ActorId>,
    pub(crate) keys: [u32; 4],
    pub(crate) item_max: usize,
}

impl Inventory {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            keys: [0; 4],
            item_max: 4,
        }
    }
}

/// The outcome of a collision check.
///
/// `direction` is the direction actually resolved after redirects; callers
/// that commit a step must use it rather than the direction they asked
/// about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionResult {
    /// Whether the move is possible.
    pub allowed: bool,
    /// The direction the move would actually take.
    pub direction: Direction,
}

/// One entity in the level's actor arena.
#[derive(Clone, Debug)]
pub(crate) struct Actor {
    #[allow(dead_code)]
    pub(crate) id: ActorId,
    pub(crate) kind: ActorKind,
    pub(crate) layer: Layer,
    pub(crate) position: Position,
    pub(crate) old_position: Option<Position>,
    pub(crate) direction: Direction,
    pub(crate) cooldown: u32,
    pub(crate) current_move_speed: Option<u32>,
    pub(crate) move_speed: u32,
    pub(crate) move_decision: Option<Direction>,
    pub(crate) pending_decision: Option<Direction>,
    pub(crate) pending_decision_locked: bool,
    pub(crate) sliding: SlidingState,
    pub(crate) has_override: bool,
    pub(crate) exists: bool,
    pub(crate) despawned: bool,
    pub(crate) bonked: bool,
    pub(crate) is_pushing: bool,
    pub(crate) is_pulled: bool,
    pub(crate) is_deciding: bool,
    pub(crate) frozen: bool,
    pub(crate) custom_data: String,
    #[allow(dead_code)]
    pub(crate) created_n: u32,
    pub(crate) new_actor: Option<ActorId>,
    pub(crate) inventory: Inventory,
    pub(crate) tags: TagSet,
    pub(crate) push_tags: TagRules,
    pub(crate) block_tags: TagRules,
    pub(crate) blocked_by_tags: TagRules,
    pub(crate) collision_ignore_tags: TagRules,
    pub(crate) ignore_tags: TagRules,
    pub(crate) immune_tags: TagRules,
    pub(crate) wires: WireSet,
    pub(crate) wire_tunnels: WireSet,
    pub(crate) wire_overlap_mode: WireOverlapMode,
    pub(crate) powered_wires: WireSet,
    pub(crate) powering_wires: WireSet,
    pub(crate) wired: bool,
}

impl LevelState {
    pub(crate) fn actor(&self, id: ActorId) -> &Actor {
        &self.arena[id.index()]
    }

    pub(crate) fn actor_mut(&mut self, id: ActorId) -> &mut Actor {
        &mut self.arena[id.index()]
    }

    /// Chases `new_actor` forwarding ids to the live replacement.
    pub(crate) fn follow(&self, mut id: ActorId) -> ActorId {
        while let Some(next) = self.actor(id).new_actor {
            id = next;
        }
        id
    }

    pub(crate) fn tile_actor_ids(&self, position: Position) -> Vec<ActorId> {
        self.field.tile(position).actors().collect()
    }

    pub(crate) fn tile_actor_ids_reverse(&self, position: Position) -> Vec<ActorId> {
        self.field.tile(position).actors_reverse().collect()
    }

    /// Registers a new actor into the arena, the level lists and its tile.
    pub(crate) fn spawn_actor(
        &mut self,
        kind: ActorKind,
        position: Position,
        direction: Direction,
        custom_data: String,
    ) -> ActorId {
        let id = ActorId::new(self.arena.len() as u32);
        let layer = kind.layer();
        let wire_overlap_mode = kind.wire_overlap_mode(&custom_data);
        let actor = Actor {
            id,
            layer,
            position,
            old_position: None,
            direction,
            cooldown: 0,
            current_move_speed: None,
            move_speed: kind.move_speed(),
            move_decision: None,
            pending_decision: None,
            pending_decision_locked: false,
            sliding: SlidingState::None,
            has_override: false,
            exists: true,
            despawned: false,
            bonked: false,
            is_pushing: false,
            is_pulled: false,
            is_deciding: kind.is_deciding(),
            frozen: false,
            custom_data,
            created_n: self.created_n,
            new_actor: None,
            inventory: Inventory::new(),
            tags: TagSet::EMPTY,
            push_tags: TagRules::EMPTY,
            block_tags: TagRules::EMPTY,
            blocked_by_tags: TagRules::EMPTY,
            collision_ignore_tags: TagRules::EMPTY,
            ignore_tags: TagRules::EMPTY,
            immune_tags: TagRules::EMPTY,
            wires: WireSet::EMPTY,
            wire_tunnels: WireSet::EMPTY,
            wire_overlap_mode,
            powered_wires: WireSet::EMPTY,
            powering_wires: WireSet::EMPTY,
            wired: false,
            kind,
        };
        self.created_n += 1;
        self.arena.push(actor);
        // Mid-level spawns join the front of the lists like the emulated
        // game's construction order; the builder reverses its lists once
        // at the end instead.
        if self.level_started {
            self.actors.insert(0, id);
        } else {
            self.actors.push(id);
        }
        self.attach_to_tile(id);
        if self.actor(id).is_deciding {
            if self.level_started {
                self.deciding_actors.insert(0, id);
            } else {
                self.deciding_actors.push(id);
            }
        }
        self.recompute_tags(id);
        let is_chip_pickup = matches!(self.actor(id).kind, ActorKind::EChip);
        let is_chip_total = matches!(self.actor(id).kind, ActorKind::EChip | ActorKind::EChipPlus);
        let is_playable = self.actor(id).kind.is_playable();
        if is_chip_total {
            self.chips_total += 1;
        }
        if is_chip_pickup {
            self.chips_left += 1;
            self.chips_required += 1;
        }
        if is_playable {
            if self.level_started {
                self.playables.insert(0, id);
            } else {
                self.playables.push(id);
            }
            if self.selected_playable.is_none() {
                self.selected_playable = Some(id);
            }
        }
        id
    }

    /// Places the actor into its layer slot, despawning any resident.
    pub(crate) fn attach_to_tile(&mut self, id: ActorId) {
        let (layer, position) = {
            let actor = self.actor(id);
            (actor.layer, actor.position)
        };
        if let Some(displaced) = self.field.tile_mut(position).place(layer, id) {
            if displaced != id {
                if matches!(self.actor(displaced).kind, ActorKind::Animation { .. }) {
                    // Despawning means destroying, for animations; no
                    // glitch is recorded for snuffing one out.
                    let _ = self.destroy(displaced, None, None);
                } else {
                    self.despawn_actor(displaced);
                    let specifier = self.actor(displaced).kind.id().to_owned();
                    self.glitches.push(GlitchEvent {
                        kind: GlitchKind::Despawn,
                        location: position,
                        happens_at: self.global_subtick,
                        specifier,
                    });
                }
            }
        }
    }

    pub(crate) fn respawn_actor(&mut self, id: ActorId, put_on_tile: bool) {
        if !self.actor(id).despawned {
            return;
        }
        self.actor_mut(id).despawned = false;
        self.despawned_actors.retain(|&other| other != id);
        if put_on_tile {
            self.attach_to_tile(id);
        }
    }

    /// Mutual interaction ignorance; ignored pairs skip join/leave hooks.
    pub(crate) fn ignores(&self, a: ActorId, b: ActorId) -> bool {
        let first = self.actor(a);
        let second = self.actor(b);
        second.ignore_tags.matches(first.tags) || first.ignore_tags.matches(second.tags)
    }

    fn collision_ignores(&self, mover: ActorId, blocker: ActorId) -> bool {
        self.actor(mover)
            .collision_ignore_tags
            .matches(self.actor(blocker).tags)
    }

    /// Whether a killer may actually destroy the victim.
    pub(crate) fn should_die(&self, victim: ActorId, killer: ActorId) -> bool {
        !(self.ignores(victim, killer)
            || self
                .actor(victim)
                .immune_tags
                .matches(self.actor(killer).tags))
    }

    fn blocks_between(&mut self, blocker: ActorId, mover: ActorId, direction: Direction) -> bool {
        if blocker == mover {
            return false;
        }
        {
            let b = self.actor(blocker);
            // Mid-move actors always hold their slot.
            if b.cooldown > 0 && b.move_speed > 0 {
                return true;
            }
        }
        if self.collision_ignores(mover, blocker) {
            return false;
        }
        if behavior::blocks_hook(self, blocker, mover, direction) {
            return true;
        }
        let b = self.actor(blocker);
        let m = self.actor(mover);
        b.block_tags.matches(m.tags) || m.blocked_by_tags.matches(b.tags)
    }

    fn exit_blocks_between(
        &mut self,
        blocker: ActorId,
        mover: ActorId,
        direction: Direction,
    ) -> bool {
        !self.collision_ignores(mover, blocker)
            && behavior::exit_blocks_hook(self, blocker, mover, direction)
    }

    fn can_push(&mut self, pusher: ActorId, pushee: ActorId, direction: Direction) -> bool {
        {
            let p = self.actor(pusher);
            let other = self.actor(pushee);
            if !p.push_tags.matches(other.tags) {
                return false;
            }
            if other.pending_decision_locked {
                return false;
            }
        }
        let from = self.actor(pushee).position;
        self.check_collision_from_tile(pushee, from, direction, true, false)
            .allowed
    }

    /// Checks whether the actor can move one tile in `direction`,
    /// resolving redirects and pushing whatever it legally can.
    pub fn check_collision(&mut self, id: ActorId, direction: Direction) -> CollisionResult {
        let from = self.actor(id).position;
        self.check_collision_from_tile(id, from, direction, false, true)
    }

    /// The single collision primitive.
    ///
    /// `redirect_only` runs only the exit/redirect pass, used to probe
    /// whether a pushee could leave its tile. Pushes are committed only
    /// after the entire destination tile has been scanned, so an actor is
    /// never pushed based on a partial view of the tile's contents.
    pub(crate) fn check_collision_from_tile(
        &mut self,
        id: ActorId,
        from: Position,
        direction: Direction,
        redirect_only: bool,
        pull: bool,
    ) -> CollisionResult {
        let mut direction = direction;

        for exit_actor in self.tile_actor_ids_reverse(from) {
            if !redirect_only && self.exit_blocks_between(exit_actor, id, direction) {
                behavior::bumped(self, exit_actor, id, direction);
                behavior::bumped_actor(self, id, exit_actor, direction, true);
                return CollisionResult {
                    allowed: false,
                    direction,
                };
            }
            if !self.actor(exit_actor).kind.has_redirect() || self.ignores(id, exit_actor) {
                continue;
            }
            match behavior::redirect_tile_member(self, exit_actor, id, direction) {
                None => {
                    return CollisionResult {
                        allowed: false,
                        direction,
                    }
                }
                Some(redirected) => direction = redirected,
            }
        }
        if redirect_only {
            return CollisionResult {
                allowed: true,
                direction,
            };
        }

        let Some(new_position) = self.field.neighbor(from, direction) else {
            return CollisionResult {
                allowed: false,
                direction,
            };
        };

        let mut to_push: Vec<ActorId> = Vec::new();
        for layer in Tile::COLLISION_ORDER {
            let Some(occupant) = self.field.tile(new_position).actor_on(layer) else {
                continue;
            };
            behavior::bumped(self, occupant, id, direction);
            behavior::bumped_actor(self, id, occupant, direction, false);
            let occupant = self.follow(occupant);
            if self.actor(occupant).exists {
                if self.blocks_between(occupant, id, direction) {
                    if self.can_push(id, occupant, direction) {
                        to_push.push(occupant);
                    } else {
                        return CollisionResult {
                            allowed: false,
                            direction,
                        };
                    }
                }
            }
            if layer == Layer::Movable {
                break;
            }
        }

        for pushable in to_push.iter().copied() {
            if !self.actor(pushable).exists {
                continue;
            }
            if self.actor(pushable).sliding != SlidingState::None {
                // Sliding pushables only get their next move queued.
                if !self.actor(pushable).pending_decision_locked {
                    let actor = self.actor_mut(pushable);
                    actor.pending_decision = Some(direction);
                    actor.move_decision = Some(direction);
                }
                return CollisionResult {
                    allowed: false,
                    direction,
                };
            }
            if self.actor(pushable).cooldown > 0
                || !self.check_collision(pushable, direction).allowed
            {
                return CollisionResult {
                    allowed: false,
                    direction,
                };
            }
            if self.internal_step(pushable, direction) {
                self.actor_mut(pushable).cooldown -= 1;
            }
        }
        if !to_push.is_empty() {
            self.actor_mut(id).is_pushing = true;
        }

        if pull && self.actor(id).tags.contains(Tag::Pulling) {
            let position = self.actor(id).position;
            if let Some(back) = self.field.neighbor(position, direction.back()) {
                if let Some(pulled) = self.field.tile(back).actor_on(Layer::Movable) {
                    let (cooldown, move_speed, locked, was_pulled, has_block_tag) = {
                        let actor = self.actor(pulled);
                        (
                            actor.cooldown,
                            actor.move_speed,
                            actor.pending_decision_locked,
                            actor.is_pulled,
                            actor.tags.contains(Tag::Block),
                        )
                    };
                    if cooldown > 0 && move_speed > 0 {
                        return CollisionResult {
                            allowed: false,
                            direction,
                        };
                    }
                    if (locked && was_pulled) || !has_block_tag {
                        self.actor_mut(pulled).is_pulled = true;
                    } else {
                        let actor = self.actor_mut(pulled);
                        actor.is_pulled = true;
                        actor.direction = direction;
                        if !actor.frozen {
                            actor.pending_decision = Some(direction);
                            actor.move_decision = Some(direction);
                        }
                    }
                }
            }
        }

        CollisionResult {
            allowed: true,
            direction,
        }
    }

    /// Commits one step: re-checks collision, detaches from the old tile,
    /// attaches to the new one and starts the cooldown timer.
    pub(crate) fn internal_step(&mut self, id: ActorId, direction: Direction) -> bool {
        if self.actor(id).cooldown > 0 || self.actor(id).move_speed == 0 {
            return false;
        }
        self.actor_mut(id).direction = direction;
        let result = self.check_collision(id, direction);
        {
            let actor = self.actor_mut(id);
            actor.bonked = !result.allowed;
            actor.direction = result.direction;
        }
        if !result.allowed {
            return false;
        }
        if !self.actor(id).is_deciding {
            self.actor_mut(id).is_deciding = true;
            self.deciding_actors.push(id);
        }
        let position = self.actor(id).position;
        let Some(new_position) = self.field.neighbor(position, result.direction) else {
            return false;
        };
        {
            let actor = self.actor_mut(id);
            actor.pending_decision = None;
            actor.move_decision = None;
        }
        let mut speed_mult = self.tile_speed_mod(new_position, id);
        speed_mult = self.self_speed_mod(id, speed_mult);
        let move_length = (self.actor(id).move_speed * 3) / speed_mult.max(1);
        {
            let actor = self.actor_mut(id);
            actor.current_move_speed = Some(move_length);
            actor.cooldown = move_length;
            actor.old_position = Some(actor.position);
            actor.position = new_position;
        }
        self.update_tile_states(id, false);
        true
    }

    /// Product of the destination tile's terrain speed divisors, skipping
    /// ignored terrain.
    fn tile_speed_mod(&self, position: Position, mover: ActorId) -> u32 {
        let mut mult = 1;
        for other in self.field.tile(position).actors() {
            if let Some(modifier) = self.actor(other).kind.terrain_speed_mod() {
                if !self.ignores(mover, other) {
                    mult *= modifier;
                }
            }
        }
        mult
    }

    /// Speed multiplier from carried items.
    fn self_speed_mod(&self, id: ActorId, mut mult: u32) -> u32 {
        for &item in &self.actor(id).inventory.items {
            if matches!(self.actor(item).kind, ActorKind::BootSpeed) {
                mult *= 2;
            }
        }
        mult
    }

    /// Moves the actor between tile slots and fires join/leave hooks.
    pub(crate) fn update_tile_states(&mut self, id: ActorId, no_tile_remove: bool) {
        self.respawn_actor(id, false);
        if !no_tile_remove {
            let (layer, old_position) = {
                let actor = self.actor(id);
                (actor.layer, actor.old_position)
            };
            if let Some(old) = old_position {
                self.field.tile_mut(old).clear(layer, id);
            }
            self.actor_mut(id).sliding = SlidingState::None;
            if let Some(old) = old_position {
                for other in self.tile_actor_ids_reverse(old) {
                    if !self.ignores(id, other) {
                        behavior::actor_left(self, other, id);
                    }
                }
            }
        }
        self.attach_to_tile(id);
        let position = self.actor(id).position;
        for other in self.tile_actor_ids_reverse(position) {
            if other != id && !self.ignores(id, other) {
                behavior::actor_joined(self, other, id);
            }
        }
        behavior::new_tile_joined(self, id);
    }

    /// Decision phase entry for one actor.
    pub(crate) fn internal_decide(&mut self, id: ActorId, forced_only: bool) {
        if !self.actor(id).exists {
            return;
        }
        self.actor_mut(id).bonked = false;
        if self.actor(id).kind.is_playable() {
            behavior::playable_decide(self, id, forced_only);
            return;
        }
        {
            let actor = self.actor_mut(id);
            actor.move_decision = None;
            if actor.cooldown > 0 || actor.frozen {
                return;
            }
            actor.current_move_speed = None;
            actor.is_pushing = false;
            if let Some(direction) = actor.pending_decision {
                actor.move_decision = Some(direction);
                actor.pending_decision = None;
                actor.pending_decision_locked = true;
                return;
            }
            if actor.sliding != SlidingState::None {
                actor.move_decision = Some(actor.direction);
                return;
            }
        }
        behavior::on_each_decision(self, id);
        if forced_only || !self.actor(id).exists {
            return;
        }
        let directions = behavior::decide_movement(self, id);
        if directions.is_empty() {
            return;
        }
        for &direction in &directions {
            if self.check_collision(id, direction).allowed {
                self.actor_mut(id).move_decision = Some(direction);
                return;
            }
        }
        // All options failed; keep trying the last preference.
        self.actor_mut(id).move_decision = Some(directions[directions.len() - 1]);
    }

    /// Move phase entry: commits the decided direction.
    pub(crate) fn internal_move(&mut self, id: ActorId) {
        if !self.actor(id).exists {
            return;
        }
        if self.actor(id).cooldown > 0 {
            let actor = self.actor_mut(id);
            actor.is_pulled = false;
            actor.move_decision = None;
            return;
        }
        let Some(direction) = self.actor(id).move_decision else {
            self.actor_mut(id).is_pulled = false;
            return;
        };
        {
            let actor = self.actor_mut(id);
            actor.pending_decision = None;
            actor.pending_decision_locked = false;
        }
        let success = self.internal_step(id, direction);
        if !success && self.actor(id).sliding != SlidingState::None {
            let position = self.actor(id).position;
            for member in self.tile_actor_ids_reverse(position) {
                if member != id && !self.ignores(id, member) {
                    behavior::on_member_slide_bonked(self, member, id);
                }
            }
        }
        self.actor_mut(id).is_pulled = false;
    }

    /// Cooldown phase entry: finishes moves whose timer expires and fires
    /// idle on-tile effects.
    pub(crate) fn internal_do_cooldown(&mut self, id: ActorId) {
        if !self.actor(id).exists {
            return;
        }
        let cooldown = self.actor(id).cooldown;
        if cooldown == 1 {
            if self.actor(id).pending_decision.is_some() {
                self.actor_mut(id).pending_decision_locked = true;
            }
            self.enter_tile(id);
        } else if cooldown > 1 {
            self.actor_mut(id).cooldown -= 1;
        } else {
            let mut this = id;
            let position = self.actor(id).position;
            for other in self.tile_actor_ids(position) {
                if other != this && self.actor(other).kind.has_actor_on_tile() {
                    behavior::actor_on_tile(self, other, this);
                    this = self.follow(this);
                }
            }
        }
    }

    /// "Enter tile" side effects when a move visually completes: pickups,
    /// kill checks, button presses. The entering actor id is re-followed
    /// after every hook since a hook may replace it.
    pub(crate) fn enter_tile(&mut self, id: ActorId) {
        let mut this = id;
        let position = self.actor(id).position;
        for other in self.tile_actor_ids_reverse(position) {
            if other == this {
                continue;
            }
            if !self.actor(other).exists {
                continue;
            }
            if !self.ignores(this, other) {
                behavior::actor_completely_joined(self, other, this);
            }
            this = self.follow(this);
            if self.actor(other).exists && self.actor(other).kind.has_actor_on_tile() {
                behavior::actor_on_tile(self, other, this);
                this = self.follow(this);
            }
        }
        self.actor_mut(id).cooldown = 0;
    }

    /// Removes the actor from the grid while keeping it alive off-map.
    pub(crate) fn despawn_actor(&mut self, id: ActorId) {
        if self.actor(id).despawned {
            return;
        }
        self.actor_mut(id).despawned = true;
        self.despawned_actors.push(id);
        let (layer, position) = {
            let actor = self.actor(id);
            (actor.layer, actor.position)
        };
        self.field.tile_mut(position).clear(layer, id);
    }

    /// Destroys the actor, detaching it from every level-owned list and
    /// spawning a replacement animation that inherits its movement state
    /// and its slot in the deciding order.
    pub(crate) fn destroy(
        &mut self,
        id: ActorId,
        killer: Option<ActorId>,
        animation: Option<AnimKind>,
    ) -> bool {
        if let Some(killer) = killer {
            if !self.should_die(id, killer) {
                return false;
            }
        }
        self.actors.retain(|&other| other != id);
        let deciding_pos = self.deciding_actors.iter().position(|&other| other == id);
        if deciding_pos.is_some() {
            self.deciding_actors.retain(|&other| other != id);
        }
        if self.actor(id).despawned {
            self.despawned_actors.retain(|&other| other != id);
        }
        self.circuit_inputs.retain(|&other| other != id);
        if let Some(output_pos) = self.circuit_outputs.iter().position(|&other| other == id) {
            let _ = self.circuit_outputs.remove(output_pos);
            let _ = self.circuit_output_states.remove(output_pos);
        }
        let (layer, position) = {
            let actor = self.actor(id);
            (actor.layer, actor.position)
        };
        self.field.tile_mut(position).clear(layer, id);
        self.actor_mut(id).exists = false;
        if self.actor(id).kind.is_playable() {
            self.playables.retain(|&other| other != id);
            if self.game_state == gridlock_core::GameState::Playing {
                self.game_state = gridlock_core::GameState::Lost;
            }
        }
        if let Some(animation) = animation {
            if self
                .field
                .tile(position)
                .actor_on(Layer::Movable)
                .is_none()
            {
                let direction = self.actor(id).direction;
                let anim_id =
                    self.spawn_actor(ActorKind::animation(animation), position, direction, String::new());
                if let Some(target) = deciding_pos {
                    if let Some(current) = self
                        .deciding_actors
                        .iter()
                        .position(|&other| other == anim_id)
                    {
                        let moved = self.deciding_actors.remove(current);
                        let target = target.min(self.deciding_actors.len());
                        self.deciding_actors.insert(target, moved);
                    }
                }
                let (cooldown, current_move_speed) = {
                    let actor = self.actor(id);
                    (actor.cooldown, actor.current_move_speed)
                };
                let inventory = std::mem::take(&mut self.actor_mut(id).inventory);
                {
                    let anim = self.actor_mut(anim_id);
                    anim.cooldown = cooldown;
                    anim.current_move_speed = current_move_speed;
                    anim.inventory = inventory;
                }
                self.actor_mut(id).new_actor = Some(anim_id);
            }
        }
        true
    }

    /// Destroys a terrain actor in place and grows a different kind there.
    pub(crate) fn replace_terrain(&mut self, id: ActorId, kind: ActorKind) -> ActorId {
        let (position, direction, custom_data) = {
            let actor = self.actor(id);
            (actor.position, actor.direction, actor.custom_data.clone())
        };
        let _ = self.destroy(id, None, None);
        let new_id = self.spawn_actor(kind, position, direction, custom_data);
        self.actor_mut(id).new_actor = Some(new_id);
        new_id
    }

    /// Recomputes the actor's effective tag fields from its kind and the
    /// items it carries.
    pub(crate) fn recompute_tags(&mut self, id: ActorId) {
        let (mut tags, push_tags, block_tags, blocked_by_tags) = {
            let kind = &self.actor(id).kind;
            (
                kind.base_tags(),
                kind.push_rules(),
                kind.block_rules(),
                kind.blocked_by_rules(),
            )
        };
        let (mut collision_ignore, mut ignore, immune) = {
            let kind = &self.actor(id).kind;
            (
                kind.collision_ignore_rules(),
                kind.ignore_rules(),
                kind.immune_rules(),
            )
        };
        let items = self.actor(id).inventory.items.clone();
        for item in items {
            let (item_tags, item_ignore, item_collision_ignore) =
                carrier_tags(&self.actor(item).kind);
            tags = tags.union(item_tags);
            ignore = ignore.union(item_ignore);
            collision_ignore = collision_ignore.union(item_collision_ignore);
        }
        let actor = self.actor_mut(id);
        actor.tags = tags;
        actor.push_tags = push_tags;
        actor.block_tags = block_tags;
        actor.blocked_by_tags = blocked_by_tags;
        actor.collision_ignore_tags = collision_ignore;
        actor.ignore_tags = ignore;
        actor.immune_tags = immune;
    }

    /// Adds an item to the carrier, dropping the oldest carried item when
    /// the inventory overflows.
    pub(crate) fn pickup_item(&mut self, item: ActorId, carrier: ActorId) {
        self.actor_mut(carrier).inventory.items.insert(0, item);
        if self.actor(carrier).inventory.items.len() > self.actor(carrier).inventory.item_max {
            let _ = self.drop_last_item(carrier);
        }
        self.recompute_tags(carrier);
    }

    /// Drops the least recently acquired item onto the carrier's tile.
    pub(crate) fn drop_last_item(&mut self, carrier: ActorId) -> bool {
        let index = match self.actor(carrier).inventory.items.len() {
            0 => return false,
            len => len - 1,
        };
        self.drop_item_n(carrier, index)
    }

    fn drop_item_n(&mut self, carrier: ActorId, index: usize) -> bool {
        let Some(&item) = self.actor(carrier).inventory.items.get(index) else {
            return false;
        };
        if self.actor(carrier).despawned {
            log::warn!("dropping items while despawned is undefined behavior");
        }
        let position = self.actor(carrier).position;
        let layer = self.actor(item).layer;
        if self.field.tile(position).actor_on(layer).is_some() {
            return false;
        }
        let _ = self.actor_mut(carrier).inventory.items.remove(index);
        {
            let dropped = self.actor_mut(item);
            dropped.exists = true;
            dropped.old_position = None;
            dropped.position = position;
        }
        self.actors.push(item);
        self.update_tile_states(item, true);
        self.recompute_tags(carrier);
        true
    }
}

/// Tag contributions an item grants its carrier: plain tags, ignore rules
/// and collision-ignore rules.
fn carrier_tags(kind: &ActorKind) -> (TagSet, TagRules, TagRules) {
    match kind {
        ActorKind::BootWater => (
            TagSet::EMPTY,
            TagRules::new(&[Tag::Water], &[]),
            TagRules::EMPTY,
        ),
        ActorKind::BootFire => (
            TagSet::EMPTY,
            TagRules::new(&[Tag::Fire], &[]),
            TagRules::EMPTY,
        ),
        ActorKind::BootIce => (
            TagSet::EMPTY,
            TagRules::new(&[Tag::Ice], &[]),
            TagRules::EMPTY,
        ),
        ActorKind::BootForceFloor => (
            TagSet::EMPTY,
            TagRules::new(&[Tag::ForceFloor], &[]),
            TagRules::EMPTY,
        ),
        ActorKind::BootDirt => (
            TagSet::EMPTY,
            TagRules::EMPTY,
            TagRules::new(&[Tag::Filth], &[]),
        ),
        ActorKind::Helmet => (
            TagSet::of(&[Tag::IgnoreDefaultMonsterKill]),
            TagRules::EMPTY,
            TagRules::EMPTY,
        ),
        ActorKind::Hook => (
            TagSet::of(&[Tag::Pulling]),
            TagRules::EMPTY,
            TagRules::EMPTY,
        ),
        _ => (TagSet::EMPTY, TagRules::EMPTY, TagRules::EMPTY),
    }
}
