//! End-to-end movement and interaction scenarios, driven tick by tick
//! through the public surface only.

use gridlock_core::{
    ActorSeed, CameraType, Direction, GameState, GlitchKind, KeyInputs, Layer, LevelData,
    PlayablesRequired, Position,
};
use gridlock_level::{build_level, query, LevelState};

fn seed(kind: &str) -> ActorSeed {
    ActorSeed {
        kind: kind.to_owned(),
        direction: None,
        custom_data: None,
        wire_byte: None,
    }
}

fn seed_facing(kind: &str, direction: Direction) -> ActorSeed {
    ActorSeed {
        direction: Some(direction),
        ..seed(kind)
    }
}

fn level_data(width: u32, height: u32, seeds: Vec<(u32, u32, ActorSeed)>) -> LevelData {
    let mut field = vec![vec![Vec::new(); height as usize]; width as usize];
    for (x, y, actor) in seeds {
        field[x as usize][y as usize].push(actor);
    }
    LevelData {
        name: None,
        password: None,
        width,
        height,
        field,
        playables_required: PlayablesRequired::Count(1),
        camera: CameraType {
            width: 10,
            height: 10,
            screens: 1,
        },
        time_limit: 0,
        blob_mode: Default::default(),
        hints: Vec::new(),
        default_hint: None,
        extra_chips_required: 0,
        connections: Vec::new(),
    }
}

fn hold(level: &mut LevelState, input: KeyInputs, subticks: u32) {
    level.set_input(input);
    for _ in 0..subticks {
        level.tick();
    }
}

const RIGHT: KeyInputs = KeyInputs {
    right: true,
    ..KeyInputs::NONE
};

#[test]
fn walking_into_a_wall_bonks() {
    let data = level_data(
        2,
        1,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (1, 0, seed("wall")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    hold(&mut level, RIGHT, 3);

    let chip = query::actor_at(&level, Position::new(0, 0), Layer::Movable)
        .expect("chip stays on its tile");
    let snapshot = query::actor_snapshot(&level, chip).expect("chip snapshot");
    assert_eq!(snapshot.kind_id, "chip");
    assert_eq!(snapshot.position, Position::new(0, 0));
    assert!(snapshot.bonked, "the failed move must leave the bonk flag set");
    assert_eq!(query::game_state(&level), GameState::Playing);
}

#[test]
fn pushing_a_block_moves_pusher_and_block_together() {
    let data = level_data(
        3,
        1,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (1, 0, seed("dirtBlock")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    // Two subticks of latency before the first voluntary decision, then
    // moveSpeed * 3 subticks for the step itself.
    hold(&mut level, RIGHT, 15);

    let chip = query::actor_at(&level, Position::new(1, 0), Layer::Movable)
        .expect("chip occupies the block's old tile");
    assert_eq!(query::actor_snapshot(&level, chip).unwrap().kind_id, "chip");
    let block = query::actor_at(&level, Position::new(2, 0), Layer::Movable)
        .expect("block was pushed one tile");
    assert_eq!(
        query::actor_snapshot(&level, block).unwrap().kind_id,
        "dirtBlock"
    );
    assert_eq!(query::actor_snapshot(&level, chip).unwrap().cooldown, 0);
    assert_eq!(query::actor_snapshot(&level, block).unwrap().cooldown, 0);
}

#[test]
fn a_block_against_a_wall_refuses_the_push() {
    let data = level_data(
        3,
        1,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (1, 0, seed("dirtBlock")),
            (2, 0, seed("wall")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    hold(&mut level, RIGHT, 15);

    let chip = query::actor_at(&level, Position::new(0, 0), Layer::Movable)
        .expect("chip did not move");
    let snapshot = query::actor_snapshot(&level, chip).unwrap();
    assert_eq!(snapshot.kind_id, "chip");
    assert!(snapshot.bonked);
    let block = query::actor_at(&level, Position::new(1, 0), Layer::Movable)
        .expect("block did not move");
    assert_eq!(
        query::actor_snapshot(&level, block).unwrap().kind_id,
        "dirtBlock"
    );
}

#[test]
fn a_pushed_block_blocks_its_pusher_mid_move() {
    let data = level_data(
        4,
        1,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (1, 0, seed("dirtBlock")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    // Tick to the first voluntary decision: the push starts here.
    hold(&mut level, RIGHT, 3);

    let chip = query::actor_at(&level, Position::new(1, 0), Layer::Movable)
        .expect("chip is mid-move into the vacated tile");
    let block = query::actor_at(&level, Position::new(2, 0), Layer::Movable)
        .expect("block is mid-move one further");
    assert!(query::actor_snapshot(&level, block).unwrap().cooldown > 0);

    // The pushee is mid-move and therefore blocks: re-checking the
    // pusher's collision in the same direction must fail.
    let result = level.check_collision(chip, Direction::Right);
    assert!(!result.allowed);
    assert_eq!(result.direction, Direction::Right);
}

#[test]
fn two_actors_on_one_layer_despawn_the_resident() {
    let data = level_data(1, 1, vec![(0, 0, seed("wall")), (0, 0, seed("wall"))]);
    let level = build_level(&data).expect("level builds");

    let glitches = query::glitches(&level);
    assert_eq!(glitches.len(), 1);
    assert_eq!(glitches[0].kind, GlitchKind::Despawn);
    assert_eq!(glitches[0].location, Position::new(0, 0));
    assert_eq!(glitches[0].specifier, "wall");

    let survivor = query::actor_at(&level, Position::new(0, 0), Layer::Stationary)
        .expect("one wall holds the layer");
    let mut despawned = 0;
    for snapshot in query::actor_snapshots(&level) {
        if snapshot.id == survivor {
            assert!(!snapshot.despawned);
        } else {
            assert!(snapshot.despawned, "the displaced wall is marked despawned");
            assert!(snapshot.exists, "despawned actors stay alive off-map");
            despawned += 1;
        }
    }
    assert_eq!(despawned, 1);
}

#[test]
fn keys_open_matching_doors_and_the_exit_wins() {
    let data = level_data(
        4,
        1,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (1, 0, seed("keyRed")),
            (2, 0, seed("doorRed")),
            (3, 0, seed("exit")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    hold(&mut level, RIGHT, 60);

    assert_eq!(query::game_state(&level), GameState::Won);
    assert!(
        query::actor_at(&level, Position::new(2, 0), Layer::Stationary).is_none(),
        "the consumed door is gone"
    );
}

#[test]
fn chips_unlock_the_chip_gate() {
    let data = level_data(
        4,
        1,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (1, 0, seed("echip")),
            (2, 0, seed("echipGate")),
            (3, 0, seed("exit")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    assert_eq!(query::chips_total(&level), 1);
    hold(&mut level, RIGHT, 60);

    assert_eq!(query::chips_left(&level), 0);
    assert_eq!(query::game_state(&level), GameState::Won);
}

#[test]
fn the_clock_running_out_times_the_level_out() {
    let mut data = level_data(2, 1, vec![(0, 0, seed("chip"))]);
    data.time_limit = 1;
    let mut level = build_level(&data).expect("level builds");
    hold(&mut level, KeyInputs::NONE, 59);
    assert_eq!(query::game_state(&level), GameState::Playing);
    level.tick();
    assert_eq!(query::game_state(&level), GameState::Timeout);
}

#[test]
fn a_monster_walking_into_the_playable_kills_it() {
    let data = level_data(
        3,
        1,
        vec![
            (0, 0, seed("chip")),
            (2, 0, seed_facing("ball", Direction::Left)),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    hold(&mut level, KeyInputs::NONE, 18);

    assert_eq!(query::game_state(&level), GameState::Lost);
    let chip = query::actor_snapshots(&level)
        .into_iter()
        .find(|snapshot| snapshot.kind_id == "chip")
        .expect("chip snapshot survives in the arena");
    assert!(!chip.exists);
}

#[test]
fn ice_slides_the_playable_to_the_far_side() {
    let data = level_data(
        4,
        1,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (1, 0, seed("ice")),
            (2, 0, seed("ice")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    // One deliberate step; the ice carries the rest.
    hold(&mut level, RIGHT, 3);
    hold(&mut level, KeyInputs::NONE, 30);

    let chip = query::actor_at(&level, Position::new(3, 0), Layer::Movable)
        .expect("chip slid across both ice tiles");
    assert_eq!(query::actor_snapshot(&level, chip).unwrap().kind_id, "chip");
}

#[test]
fn water_converts_a_dirt_block_into_dirt() {
    let data = level_data(
        3,
        1,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (1, 0, seed("dirtBlock")),
            (2, 0, seed("water")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    hold(&mut level, RIGHT, 18);

    let terrain = query::actor_at(&level, Position::new(2, 0), Layer::Stationary)
        .expect("the water tile still has terrain");
    assert_eq!(
        query::actor_snapshot(&level, terrain).unwrap().kind_id,
        "dirt"
    );
    assert!(
        query::actor_at(&level, Position::new(2, 0), Layer::Movable).is_none(),
        "the block sank"
    );
}

#[test]
fn stepping_off_a_recessed_wall_raises_it() {
    let data = level_data(
        3,
        1,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (1, 0, seed("popupWall")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    hold(&mut level, RIGHT, 30);

    let chip = query::actor_at(&level, Position::new(2, 0), Layer::Movable)
        .expect("chip crossed the recessed wall");
    assert_eq!(query::actor_snapshot(&level, chip).unwrap().kind_id, "chip");
    let wall = query::actor_at(&level, Position::new(1, 0), Layer::Stationary)
        .expect("the tile raised a wall");
    assert_eq!(query::actor_snapshot(&level, wall).unwrap().kind_id, "wall");
}

#[test]
fn switch_playable_acts_once_per_press() {
    const SWITCH: KeyInputs = KeyInputs {
        switch_playable: true,
        ..KeyInputs::NONE
    };
    let data = level_data(
        3,
        1,
        vec![(0, 0, seed("chip")), (2, 0, seed("melinda"))],
    );
    let mut level = build_level(&data).expect("level builds");

    let kind_of = |level: &LevelState, id| query::actor_snapshot(level, id).unwrap().kind_id;
    let selected = query::selected_playable(&level).expect("a playable is selected");
    assert_eq!(kind_of(&level, selected), "melinda");

    // One press swaps once, no matter how long the key is held.
    hold(&mut level, SWITCH, 6);
    let selected = query::selected_playable(&level).expect("selection survives");
    assert_eq!(kind_of(&level, selected), "chip");

    // Releasing re-arms the key; the next press swaps again.
    hold(&mut level, KeyInputs::NONE, 1);
    hold(&mut level, SWITCH, 1);
    let selected = query::selected_playable(&level).expect("selection survives");
    assert_eq!(kind_of(&level, selected), "melinda");
}

#[test]
fn a_hooked_playable_drags_the_block_behind_it() {
    const LEFT: KeyInputs = KeyInputs {
        left: true,
        ..KeyInputs::NONE
    };
    let data = level_data(
        5,
        1,
        vec![
            (1, 0, seed("hook")),
            (2, 0, seed_facing("chip", Direction::Left)),
            (3, 0, seed("dirtBlock")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    // Collect the hook, walk back east pushing the block to the wall,
    // then walk west: the block follows instead of being left behind.
    hold(&mut level, LEFT, 3);
    hold(&mut level, KeyInputs::NONE, 12);
    hold(&mut level, RIGHT, 3);
    hold(&mut level, KeyInputs::NONE, 12);
    hold(&mut level, RIGHT, 3);
    hold(&mut level, KeyInputs::NONE, 12);
    hold(&mut level, LEFT, 3);
    hold(&mut level, KeyInputs::NONE, 21);

    let chip = query::actor_at(&level, Position::new(2, 0), Layer::Movable)
        .expect("chip walked back west");
    assert_eq!(query::actor_snapshot(&level, chip).unwrap().kind_id, "chip");
    let block = query::actor_at(&level, Position::new(3, 0), Layer::Movable)
        .expect("block was dragged along");
    assert_eq!(
        query::actor_snapshot(&level, block).unwrap().kind_id,
        "dirtBlock"
    );
}

#[test]
fn visual_position_interpolates_mid_move() {
    let data = level_data(3, 1, vec![(0, 0, seed_facing("chip", Direction::Right))]);
    let mut level = build_level(&data).expect("level builds");
    hold(&mut level, RIGHT, 4);

    let chip = query::actor_at(&level, Position::new(1, 0), Layer::Movable)
        .expect("chip is mid-move");
    let (x, y) = query::visual_position(&level, chip).expect("visual position");
    assert_eq!(y, 0.0);
    assert!(x > 0.0 && x < 1.0, "interpolated x was {x}");
}
