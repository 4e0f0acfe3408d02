//! Determinism guarantees: identical inputs must reproduce identical
//! state, and the solution playback cursor must feed the exact same
//! inputs a live driver would have.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use gridlock_core::{
    ActorSeed, CameraType, Direction, KeyInputs, LevelData, PlayablesRequired, SolutionData,
    SolutionStep,
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

fn fingerprint(level: &LevelState) -> u64 {
    let mut hasher = DefaultHasher::new();
    query::actor_snapshots(level).hash(&mut hasher);
    query::rng_registers(level).hash(&mut hasher);
    query::game_state(level).hash(&mut hasher);
    query::chips_left(level).hash(&mut hasher);
    query::time_left(level).hash(&mut hasher);
    query::glitches(level).hash(&mut hasher);
    hasher.finish()
}

fn busy_level() -> LevelData {
    level_data(
        8,
        4,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (2, 0, seed_facing("forceFloor", Direction::Right)),
            (4, 0, seed("ice")),
            (6, 0, seed("echip")),
            (5, 1, seed_facing("ball", Direction::Right)),
            (4, 1, seed("wall")),
            (3, 2, seed_facing("walker", Direction::Down)),
            (7, 2, seed("water")),
            (1, 3, seed("gravel")),
            (7, 3, seed("exit")),
        ],
    )
}

fn scripted_input(subtick: u32) -> KeyInputs {
    match subtick {
        0..=29 => KeyInputs {
            right: true,
            ..KeyInputs::NONE
        },
        30..=59 => KeyInputs {
            down: true,
            ..KeyInputs::NONE
        },
        60..=89 => KeyInputs {
            right: true,
            down: true,
            ..KeyInputs::NONE
        },
        _ => KeyInputs::NONE,
    }
}

fn run_scripted(subticks: u32) -> (u64, Vec<KeyInputs>) {
    let mut level = build_level(&busy_level()).expect("level builds");
    let mut observed = Vec::new();
    for subtick in 0..subticks {
        level.set_input(scripted_input(subtick));
        level.tick();
        observed.push(query::game_input(&level));
    }
    (fingerprint(&level), observed)
}

#[test]
fn identical_input_sequences_replay_identically() {
    let (first, first_inputs) = run_scripted(300);
    let (second, second_inputs) = run_scripted(300);
    assert_eq!(first_inputs, second_inputs);
    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn rng_registers_advance_identically_across_runs() {
    let mut first = build_level(&busy_level()).expect("level builds");
    let mut second = build_level(&busy_level()).expect("level builds");
    for subtick in 0..120 {
        first.set_input(scripted_input(subtick));
        second.set_input(scripted_input(subtick));
        first.tick();
        second.tick();
        assert_eq!(
            query::rng_registers(&first),
            query::rng_registers(&second),
            "rng diverged on subtick {subtick}"
        );
    }
}

#[test]
fn solution_playback_reproduces_live_input_exactly() {
    let push_level = level_data(
        4,
        1,
        vec![
            (0, 0, seed_facing("chip", Direction::Right)),
            (1, 0, seed("dirtBlock")),
        ],
    );

    // Live run: hold right for 24 subticks, release for 21.
    let mut live = build_level(&push_level).expect("level builds");
    let mut live_inputs = Vec::new();
    for subtick in 0..45 {
        let input = if subtick < 24 {
            KeyInputs {
                right: true,
                ..KeyInputs::NONE
            }
        } else {
            KeyInputs::NONE
        };
        live.set_input(input);
        live.tick();
        live_inputs.push(query::game_input(&live));
    }

    // Playback run: the same sequence expressed as solution steps.
    let solution = SolutionData {
        steps: vec![SolutionStep::new(0x02, 24), SolutionStep::new(0x00, 21)],
        blob_mod_seed: None,
        rff_direction: None,
        expected_outcome: None,
    };
    let mut replayed = build_level(&push_level).expect("level builds");
    replayed.play_solution(&solution).expect("solution accepted");
    let mut replay_inputs = Vec::new();
    for _ in 0..45 {
        replayed.tick();
        replay_inputs.push(query::game_input(&replayed));
    }

    assert_eq!(live_inputs, replay_inputs);
    assert_eq!(fingerprint(&live), fingerprint(&replayed));
}

#[test]
fn hold_forever_sentinel_pins_the_final_input() {
    let corridor = level_data(
        6,
        1,
        vec![(0, 0, seed_facing("chip", Direction::Right))],
    );

    let mut live = build_level(&corridor).expect("level builds");
    for _ in 0..90 {
        live.set_input(KeyInputs {
            right: true,
            ..KeyInputs::NONE
        });
        live.tick();
    }

    let solution = SolutionData {
        steps: vec![SolutionStep::new(0x02, SolutionStep::HOLD_FOREVER)],
        blob_mod_seed: None,
        rff_direction: None,
        expected_outcome: None,
    };
    let mut replayed = build_level(&corridor).expect("level builds");
    replayed.play_solution(&solution).expect("solution accepted");
    for _ in 0..90 {
        replayed.tick();
    }

    assert_eq!(fingerprint(&live), fingerprint(&replayed));
}
