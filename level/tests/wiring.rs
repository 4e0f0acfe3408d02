//! Wire-circuit scenarios: edge-triggered pulses, level-triggered
//! outputs, and tunnel tracing.

use gridlock_core::{
    ActorSeed, CameraType, Direction, KeyInputs, Layer, LevelData, PlayablesRequired, Position,
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

fn wired(kind: &str, wire_byte: u8) -> ActorSeed {
    ActorSeed {
        wire_byte: Some(wire_byte),
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
const LEFT: KeyInputs = KeyInputs {
    left: true,
    ..KeyInputs::NONE
};

const WIRE_RIGHT: u8 = 0x02;
const WIRE_LEFT: u8 = 0x08;
const WIRE_LEFT_RIGHT: u8 = 0x0a;

#[test]
fn flame_jet_sees_exactly_one_pulse_per_power_edge() {
    let data = level_data(
        3,
        1,
        vec![
            (0, 0, seed("chip")),
            (1, 0, wired("buttonPink", WIRE_RIGHT)),
            (2, 0, wired("flameJet", WIRE_LEFT)),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    let jet = query::actor_at(&level, Position::new(2, 0), Layer::Stationary)
        .expect("flame jet present");
    assert_eq!(query::terrain_active(&level, jet), Some(false));

    // Step onto the pressure plate; the rising edge toggles the jet on.
    hold(&mut level, RIGHT, 3);
    hold(&mut level, KeyInputs::NONE, 17);
    assert_eq!(query::terrain_active(&level, jet), Some(true));

    // Power is held; a level-triggered (or per-subtick) notification
    // would keep flipping the jet, an edge-triggered one leaves it alone.
    hold(&mut level, KeyInputs::NONE, 5);
    assert_eq!(query::terrain_active(&level, jet), Some(true));

    // Stepping off drops power: the falling edge is an unpulse, which a
    // flame jet does not react to.
    hold(&mut level, LEFT, 3);
    hold(&mut level, KeyInputs::NONE, 19);
    assert_eq!(query::terrain_active(&level, jet), Some(true));

    // A second rising edge delivers the second pulse and toggles it off.
    hold(&mut level, RIGHT, 3);
    hold(&mut level, KeyInputs::NONE, 20);
    assert_eq!(query::terrain_active(&level, jet), Some(false));
}

#[test]
fn switch_wall_is_closed_without_power() {
    let data = level_data(
        2,
        1,
        vec![(0, 0, seed("chip")), (1, 0, wired("switchWall", WIRE_LEFT))],
    );
    let mut level = build_level(&data).expect("level builds");
    level.tick();

    let wall = query::actor_at(&level, Position::new(1, 0), Layer::Stationary)
        .expect("switch wall present");
    assert_eq!(query::terrain_active(&level, wall), Some(false));
    let chip = query::actor_at(&level, Position::new(0, 0), Layer::Movable).expect("chip");
    assert!(!level.check_collision(chip, Direction::Right).allowed);
}

#[test]
fn switch_wall_opens_while_its_circuit_is_powered() {
    let data = level_data(
        4,
        1,
        vec![
            (0, 0, wired("buttonPink", WIRE_RIGHT)),
            (0, 0, seed("dirtBlock")),
            (1, 0, wired("floor", WIRE_LEFT_RIGHT)),
            (2, 0, wired("switchWall", WIRE_LEFT)),
            (3, 0, seed("chip")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    level.tick();

    let wall = query::actor_at(&level, Position::new(2, 0), Layer::Stationary)
        .expect("switch wall present");
    assert_eq!(query::terrain_active(&level, wall), Some(true));
    let chip = query::actor_at(&level, Position::new(3, 0), Layer::Movable).expect("chip");
    assert!(level.check_collision(chip, Direction::Left).allowed);
}

#[test]
fn circuits_cross_wire_tunnels() {
    // The button's wire enters a tunnel mouth and resurfaces at the
    // matching mouth two plain tiles later.
    let tunneled_button = ActorSeed {
        wire_byte: Some(WIRE_RIGHT | (WIRE_RIGHT << 4)),
        ..seed("buttonPink")
    };
    let tunneled_wall = ActorSeed {
        wire_byte: Some(WIRE_LEFT | (WIRE_LEFT << 4)),
        ..seed("switchWall")
    };
    let data = level_data(
        5,
        1,
        vec![
            (0, 0, tunneled_button.clone()),
            (0, 0, seed("dirtBlock")),
            (3, 0, tunneled_wall.clone()),
            (4, 0, seed("chip")),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    level.tick();

    let wall = query::actor_at(&level, Position::new(3, 0), Layer::Stationary)
        .expect("switch wall present");
    assert_eq!(query::terrain_active(&level, wall), Some(true));

    // Without the weight on the button the same topology stays dark.
    let unpowered = level_data(
        5,
        1,
        vec![
            (0, 0, tunneled_button),
            (3, 0, tunneled_wall),
            (4, 0, seed("chip")),
        ],
    );
    let mut level = build_level(&unpowered).expect("level builds");
    level.tick();
    let wall = query::actor_at(&level, Position::new(3, 0), Layer::Stationary)
        .expect("switch wall present");
    assert_eq!(query::terrain_active(&level, wall), Some(false));
    let chip = query::actor_at(&level, Position::new(4, 0), Layer::Movable).expect("chip");
    assert!(!level.check_collision(chip, Direction::Left).allowed);
}

#[test]
fn green_button_toggles_toggle_walls() {
    let data = level_data(
        4,
        1,
        vec![
            (0, 0, seed("chip")),
            (1, 0, seed("buttonGreen")),
            (3, 0, ActorSeed {
                custom_data: Some("on".to_owned()),
                ..seed("toggleWall")
            }),
        ],
    );
    let mut level = build_level(&data).expect("level builds");
    let wall = query::actor_at(&level, Position::new(3, 0), Layer::Stationary)
        .expect("toggle wall present");
    level.tick();
    assert_eq!(query::terrain_active(&level, wall), Some(true));

    // Walking onto the button fires it on arrival.
    hold(&mut level, RIGHT, 3);
    hold(&mut level, KeyInputs::NONE, 15);
    assert_eq!(query::terrain_active(&level, wall), Some(false));

    // Walking off releases it; green buttons only act on the press.
    hold(&mut level, LEFT, 3);
    hold(&mut level, KeyInputs::NONE, 15);
    assert_eq!(query::terrain_active(&level, wall), Some(false));
}
