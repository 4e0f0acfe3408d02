//! Spatial bookkeeping: the fixed-size field of layered tiles.

use gridlock_core::{ActorId, Direction, Layer, Position, WireOverlapMode, WireSet};

/// One grid cell holding up to one actor per layer plus its wiring state.
///
/// Tiles are created once at level construction and never destroyed; all
/// occupancy changes go through the owning level so that layer conflicts
/// are resolved with the documented despawn behavior.
#[derive(Clone, Debug)]
pub(crate) struct Tile {
    pub(crate) position: Position,
    slots: [Option<ActorId>; Layer::COUNT],
    pub(crate) wires: WireSet,
    pub(crate) wire_tunnels: WireSet,
    pub(crate) wire_overlap_mode: WireOverlapMode,
    pub(crate) powered_wires: WireSet,
    pub(crate) powering_wires: WireSet,
}

impl Tile {
    pub(crate) fn new(position: Position) -> Self {
        Self {
            position,
            slots: [None; Layer::COUNT],
            wires: WireSet::EMPTY,
            wire_tunnels: WireSet::EMPTY,
            wire_overlap_mode: WireOverlapMode::None,
            powered_wires: WireSet::EMPTY,
            powering_wires: WireSet::EMPTY,
        }
    }

    pub(crate) fn actor_on(&self, layer: Layer) -> Option<ActorId> {
        self.slots[layer.index()]
    }

    /// Places an actor into its layer slot, returning the displaced
    /// resident if the slot was occupied.
    pub(crate) fn place(&mut self, layer: Layer, actor: ActorId) -> Option<ActorId> {
        let displaced = self.slots[layer.index()];
        self.slots[layer.index()] = Some(actor);
        displaced
    }

    /// Clears the slot if the given actor still occupies it.
    pub(crate) fn clear(&mut self, layer: Layer, actor: ActorId) {
        if self.slots[layer.index()] == Some(actor) {
            self.slots[layer.index()] = None;
        }
    }

    /// Actors in interaction order: item, movable, stationary, item
    /// suffix, special.
    pub(crate) fn actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        Tile::INTERACTION_ORDER
            .iter()
            .filter_map(|layer| self.slots[layer.index()])
    }

    /// Actors in reverse interaction order, the order enter/exit hooks
    /// fire in.
    pub(crate) fn actors_reverse(&self) -> impl Iterator<Item = ActorId> + '_ {
        Tile::INTERACTION_ORDER
            .iter()
            .rev()
            .filter_map(|layer| self.slots[layer.index()])
    }

    const INTERACTION_ORDER: [Layer; Layer::COUNT] = [
        Layer::Item,
        Layer::Movable,
        Layer::Stationary,
        Layer::ItemSuffix,
        Layer::Special,
    ];

    /// The layer scan order of the collision primitive.
    pub(crate) const COLLISION_ORDER: [Layer; Layer::COUNT] = [
        Layer::ItemSuffix,
        Layer::Special,
        Layer::Stationary,
        Layer::Movable,
        Layer::Item,
    ];
}

/// Dense row-major tile storage.
#[derive(Clone, Debug)]
pub(crate) struct Field {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Field {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(Position::new(x, y)));
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn tile(&self, position: Position) -> &Tile {
        &self.tiles[self.index(position)]
    }

    pub(crate) fn tile_mut(&mut self, position: Position) -> &mut Tile {
        let index = self.index(position);
        &mut self.tiles[index]
    }

    pub(crate) fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        position.neighbor(direction, self.width, self.height)
    }

    pub(crate) fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles.iter().map(|tile| tile.position)
    }

    fn index(&self, position: Position) -> usize {
        debug_assert!(position.x() < self.width && position.y() < self.height);
        position.y() as usize * self.width as usize + position.x() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_reports_displaced_resident() {
        let mut tile = Tile::new(Position::new(0, 0));
        assert_eq!(tile.place(Layer::Movable, ActorId::new(1)), None);
        assert_eq!(
            tile.place(Layer::Movable, ActorId::new(2)),
            Some(ActorId::new(1))
        );
        assert_eq!(tile.actor_on(Layer::Movable), Some(ActorId::new(2)));
    }

    #[test]
    fn clear_ignores_stale_occupant() {
        let mut tile = Tile::new(Position::new(0, 0));
        let _ = tile.place(Layer::Item, ActorId::new(7));
        tile.clear(Layer::Item, ActorId::new(8));
        assert_eq!(tile.actor_on(Layer::Item), Some(ActorId::new(7)));
        tile.clear(Layer::Item, ActorId::new(7));
        assert_eq!(tile.actor_on(Layer::Item), None);
    }

    #[test]
    fn field_is_row_major() {
        let field = Field::new(3, 2);
        let positions: Vec<Position> = field.positions().collect();
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[1], Position::new(1, 0));
        assert_eq!(positions[3], Position::new(0, 1));
        assert_eq!(field.tile(Position::new(2, 1)).position, Position::new(2, 1));
    }
}
