//! Circuit tracing and per-tick power propagation.
//!
//! Circuits are traced once when the level starts and never rebuilt:
//! actors created, destroyed or moved mid-level do not retrace the wire
//! topology. That is a deliberate compatibility constraint — recorded
//! solutions depend on it — not an oversight, so keep it even though a
//! dynamic rebuild would be more "correct".
//!
//! A traced circuit is a single power domain: one OR-reduction per tick
//! decides whether the whole population is powered. Whether the emulated
//! game ever splits a traced circuit into independently powered strands is
//! unconfirmed; this engine keeps the single-domain reduction.

use std::collections::VecDeque;

use gridlock_core::{ActorId, Direction, Position, WireOverlapMode, WireSet};

use crate::kind::ActorKind;
use crate::LevelState;

/// A wire carrier: either a bare tile or the actor that owns the tile's
/// wiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WirableRef {
    /// The tile itself carries the wires.
    Tile(Position),
    /// An actor on the tile carries the wires.
    Actor(ActorId),
}

/// A traced connected component of wire connections sharing one power
/// state.
#[derive(Clone, Debug)]
pub(crate) struct Circuit {
    /// Which direction bits of each wirable belong to this circuit.
    pub(crate) population: Vec<(WirableRef, WireSet)>,
    /// Whether the circuit was powered at the last wire tick.
    pub(crate) powered: bool,
}

/// The directions a wirable exposes for tracing, widened by its overlap
/// mode when `entry` arrives at a crossing.
fn widen(mode: WireOverlapMode, wires: WireSet, entry: Direction) -> WireSet {
    match mode {
        WireOverlapMode::None => entry.wire(),
        WireOverlapMode::AlwaysCross => gridlock_core::opposing_pair(entry),
        WireOverlapMode::Cross if wires == WireSet::FULL => gridlock_core::opposing_pair(entry),
        WireOverlapMode::Cross | WireOverlapMode::Overlap => WireSet::FULL,
    }
}

impl LevelState {
    /// The wirable that owns a tile's wiring: the first actor carrying
    /// wires, falling back to the tile itself.
    fn wirable_at(&self, position: Position) -> WirableRef {
        for id in self.field.tile(position).actors() {
            if !self.actor(id).wires.is_empty() {
                return WirableRef::Actor(id);
            }
        }
        WirableRef::Tile(position)
    }

    fn wirable_wires(&self, wirable: WirableRef) -> WireSet {
        match wirable {
            WirableRef::Tile(position) => self.field.tile(position).wires,
            WirableRef::Actor(id) => self.actor(id).wires,
        }
    }

    fn wirable_tunnels(&self, wirable: WirableRef) -> WireSet {
        match wirable {
            WirableRef::Tile(position) => self.field.tile(position).wire_tunnels,
            WirableRef::Actor(id) => self.actor(id).wire_tunnels,
        }
    }

    fn wirable_mode(&self, wirable: WirableRef) -> WireOverlapMode {
        match wirable {
            WirableRef::Tile(position) => self.field.tile(position).wire_overlap_mode,
            WirableRef::Actor(id) => self.actor(id).wire_overlap_mode,
        }
    }

    fn wirable_position(&self, wirable: WirableRef) -> Position {
        match wirable {
            WirableRef::Tile(position) => position,
            WirableRef::Actor(id) => self.actor(id).position,
        }
    }

    fn wirable_powering(&self, wirable: WirableRef) -> WireSet {
        match wirable {
            WirableRef::Tile(position) => self.field.tile(position).powering_wires,
            WirableRef::Actor(id) => self.actor(id).powering_wires,
        }
    }

    fn wirable_powered(&self, wirable: WirableRef) -> WireSet {
        match wirable {
            WirableRef::Tile(position) => self.field.tile(position).powered_wires,
            WirableRef::Actor(id) => self.actor(id).powered_wires,
        }
    }

    fn set_wirable_powered(&mut self, wirable: WirableRef, value: WireSet) {
        match wirable {
            WirableRef::Tile(position) => self.field.tile_mut(position).powered_wires = value,
            WirableRef::Actor(id) => self.actor_mut(id).powered_wires = value,
        }
    }

    fn wire_mask(&self, wirable: WirableRef, entry: Direction) -> WireSet {
        widen(
            self.wirable_mode(wirable),
            self.wirable_wires(wirable),
            entry,
        )
    }

    /// Looks straight along `direction` for the matching tunnel mouth,
    /// skipping nested tunnel pairs.
    fn find_tunnel_exit(&self, from: Position, direction: Direction) -> Option<Position> {
        let mut depth = 0u32;
        let mut position = from;
        loop {
            position = self.field.neighbor(position, direction)?;
            let tunnels = self.wirable_tunnels(self.wirable_at(position));
            let has_exit = tunnels.intersects(direction.back().wire());
            let has_entry = tunnels.intersects(direction.wire());
            if has_exit && depth == 0 {
                return Some(position);
            }
            if has_exit && has_entry {
                // A pass-through pair nets out to nothing.
            } else if has_exit {
                depth -= 1;
            } else if has_entry {
                depth += 1;
            }
        }
    }

    /// Flood-fills the circuit reachable from one wirable direction.
    fn trace_circuit(
        &self,
        base: WirableRef,
        direction: Direction,
    ) -> Vec<(WirableRef, WireSet)> {
        let mut stack: VecDeque<(WirableRef, Direction)> = VecDeque::new();
        let base_mask = self.wire_mask(base, direction);
        for bit in base_mask.directions() {
            stack.push_back((base, bit));
        }
        let mode = self.wirable_mode(base);
        if matches!(
            mode,
            WireOverlapMode::Cross | WireOverlapMode::Overlap | WireOverlapMode::AlwaysCross
        ) {
            stack.push_back((base, direction.back()));
        }
        if mode == WireOverlapMode::Overlap
            || (mode == WireOverlapMode::Cross && self.wirable_wires(base) != WireSet::FULL)
        {
            stack.push_back((base, direction.right()));
            stack.push_back((base, direction.left()));
        }

        let mut seen: Vec<(WirableRef, WireSet)> = Vec::new();
        while let Some((wirable, bit)) = stack.pop_front() {
            let wires = self.wirable_wires(wirable);
            if !wires.intersects(bit.wire()) {
                continue;
            }
            if let Some(entry) = seen.iter_mut().find(|(member, _)| *member == wirable) {
                if entry.1.intersects(bit.wire()) {
                    continue;
                }
                entry.1 = entry.1.union(bit.wire());
            } else {
                seen.push((wirable, bit.wire()));
            }
            let from = self.wirable_position(wirable);
            let next = if self.wirable_tunnels(wirable).intersects(bit.wire()) {
                self.find_tunnel_exit(from, bit)
            } else {
                self.field.neighbor(from, bit)
            };
            let Some(next) = next else {
                continue;
            };
            let neighbor = self.wirable_at(next);
            let entrance = bit.back();
            if !self.wirable_wires(neighbor).intersects(entrance.wire()) {
                continue;
            }
            let mask = self.wire_mask(neighbor, entrance);
            for out in mask.directions() {
                if self.wirable_wires(neighbor).intersects(out.wire()) {
                    stack.push_back((neighbor, out));
                }
            }
        }
        seen
    }

    /// Traces every circuit in the level and registers power inputs and
    /// outputs. Run exactly once, at level start.
    pub(crate) fn build_circuits(&mut self) {
        let positions: Vec<Position> = self.field.positions().collect();
        for position in positions {
            let wirable = self.wirable_at(position);
            let wires = self.wirable_wires(wirable);
            if wires.is_empty() {
                continue;
            }
            for direction in Direction::ALL {
                if !wires.intersects(direction.wire()) {
                    continue;
                }
                let mask = self.wire_mask(wirable, direction);
                let claimed = self.circuits.iter().any(|circuit| {
                    circuit
                        .population
                        .iter()
                        .any(|(member, bits)| *member == wirable && bits.intersects(mask))
                });
                if claimed {
                    continue;
                }
                let population = self.trace_circuit(wirable, direction);
                for (member, _) in &population {
                    match *member {
                        WirableRef::Actor(id) => self.register_output(id),
                        WirableRef::Tile(tile) => {
                            for id in self.tile_actor_ids(tile) {
                                self.register_output(id);
                            }
                        }
                    }
                }
                self.circuits.push(Circuit {
                    population,
                    powered: false,
                });
            }
        }
        let actors = self.actors.clone();
        for id in actors {
            if self.actor(id).kind.provides_power() && !self.circuit_inputs.contains(&id) {
                self.circuit_inputs.push(id);
            }
        }
    }

    fn register_output(&mut self, id: ActorId) {
        if self.actor(id).kind.is_wire_output() && !self.circuit_outputs.contains(&id) {
            self.circuit_outputs.push(id);
            self.circuit_output_states.push(false);
        }
    }

    /// Edge-triggered pulse delivery, run at the start of a tick against
    /// the previous tick's snapshot. Exactly one `pulse` per false→true
    /// transition and one `unpulse` per true→false, never per-subtick
    /// spam.
    pub(crate) fn wire_pretick(&mut self) {
        let outputs = self.circuit_outputs.clone();
        for (index, id) in outputs.iter().enumerate() {
            let now = self.output_powered(*id);
            let before = self.circuit_output_states.get(index).copied().unwrap_or(false);
            if now != before {
                if now {
                    self.pulse(*id);
                } else {
                    self.unpulse(*id);
                }
            }
        }
        self.circuit_output_states = self
            .circuit_outputs
            .clone()
            .into_iter()
            .map(|id| self.output_powered(id))
            .collect();
    }

    /// The per-tick power propagation: inputs recompute their powering
    /// masks, each circuit OR-reduces to one powered flag, the flag is
    /// broadcast back to every member, and outputs process the result.
    pub(crate) fn wire_tick(&mut self) {
        let inputs = self.circuit_inputs.clone();
        for id in inputs {
            self.update_wires(id);
        }
        for index in 0..self.circuits.len() {
            let powered = self.circuits[index]
                .population
                .iter()
                .any(|(member, bits)| self.wirable_powering(*member).intersects(*bits));
            self.circuits[index].powered = powered;
            let population = self.circuits[index].population.clone();
            for (member, bits) in population {
                let current = self.wirable_powered(member);
                let updated = if powered {
                    current.union(bits)
                } else {
                    current.without(bits)
                };
                self.set_wirable_powered(member, updated);
            }
        }
        let outputs = self.circuit_outputs.clone();
        for id in outputs {
            self.process_output(id);
        }
    }

    /// A power input recomputes the wires it is driving.
    fn update_wires(&mut self, id: ActorId) {
        if let ActorKind::ButtonPink = self.actor(id).kind {
            let position = self.actor(id).position;
            let held = self
                .field
                .tile(position)
                .actor_on(gridlock_core::Layer::Movable)
                .is_some();
            let wires = self.actor(id).wires;
            self.actor_mut(id).powering_wires = if held { wires } else { WireSet::EMPTY };
        }
    }

    /// Whether an output currently receives power, through its own wires
    /// or the tile it rests on.
    fn output_powered(&self, id: ActorId) -> bool {
        if !self.actor(id).wires.is_empty() {
            !self.actor(id).powered_wires.is_empty()
        } else {
            let position = self.actor(id).position;
            !self.field.tile(position).powered_wires.is_empty()
        }
    }

    fn process_output(&mut self, id: ActorId) {
        if let ActorKind::SwitchWall { .. } = self.actor(id).kind {
            let powered = self.output_powered(id);
            if let ActorKind::SwitchWall { open } = &mut self.actor_mut(id).kind {
                *open = powered;
            }
        }
    }

    fn pulse(&mut self, id: ActorId) {
        if let ActorKind::FlameJet { on } = self.actor(id).kind {
            if let ActorKind::FlameJet { on: state } = &mut self.actor_mut(id).kind {
                *state = !on;
            }
        }
    }

    fn unpulse(&mut self, _id: ActorId) {
        // Power loss is not an event any current output reacts to; the
        // hook stays so outputs see exactly one notification per edge.
    }

    /// Whether an actor is visibly connected to a live wire network.
    fn is_wired_actor(&self, id: ActorId) -> bool {
        let position = self.actor(id).position;
        for direction in Direction::ALL {
            if self.actor(id).wire_tunnels.intersects(direction.wire()) {
                continue;
            }
            let Some(next) = self.field.neighbor(position, direction) else {
                continue;
            };
            let neighbor = self.wirable_at(next);
            if !self
                .wirable_wires(neighbor)
                .intersects(direction.back().wire())
            {
                continue;
            }
            let can_share = match neighbor {
                WirableRef::Tile(tile) => {
                    self.field.tile(tile).wire_overlap_mode != WireOverlapMode::None
                }
                WirableRef::Actor(other) => {
                    self.actor(other).wire_overlap_mode != WireOverlapMode::None
                        || self.actor(other).kind.provides_power()
                }
            };
            if can_share {
                return true;
            }
        }
        false
    }

    /// Flags every wired actor once at level start for presentation
    /// queries.
    pub(crate) fn compute_wired_flags(&mut self) {
        let actors = self.actors.clone();
        for id in actors {
            let wired = self.is_wired_actor(id);
            self.actor_mut(id).wired = wired;
        }
    }
}
