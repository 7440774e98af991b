use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use log::info;
use std::time::Duration;

use wallrunner::engine::game_loop::{GameLoop, FIXED_TIMESTEP};
use wallrunner::engine::input::InputHub;
use wallrunner::engine::physics::{presets, KinematicMover, PhysicsWorld, SharedWorld, WorldRayCast};
use wallrunner::game::characters::{CharacterBuilder, LocomotionConfig, LocomotionState};

/// Optional path to a JSON locomotion config
const CONFIG_ENV: &str = "WALLRUNNER_CONFIG";

/// Length of the scripted run
const DEMO_TICKS: u32 = 240;

const CAPSULE_RADIUS: f32 = 0.5;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting wallrunner demo...");

    let config = load_config()?;
    let world = build_level();

    // Start beside the wall, facing along it
    let spawn = Vec3::new(2.0, config.character_height / 2.0 + 0.05, -20.0);
    let mover = KinematicMover::new(
        world.clone(),
        spawn,
        config.character_height,
        CAPSULE_RADIUS,
        config.slope_limit_deg,
    );

    let mut character = CharacterBuilder::new()
        .config(config)
        .mover(Box::new(mover))
        .ray_cast(Box::new(WorldRayCast::new(world.clone())))
        .build()
        .context("assembling character")?;

    let mut hub = InputHub::new();
    character.enable(&mut hub);

    let mut game_loop = GameLoop::new();
    let frame_budget = Duration::from_secs_f32(FIXED_TIMESTEP);
    let mut frames = 0;
    let mut tick: u32 = 0;

    while tick < DEMO_TICKS {
        std::thread::sleep(frame_budget);
        let due = game_loop.begin_frame();
        for _ in 0..due {
            tick += 1;
            script_input(&hub, tick);

            let report = character.tick(&game_loop);
            if report.transitioned {
                info!(
                    "tick {:>3}: {} -> {} at {:.2?}",
                    tick,
                    report.previous_state,
                    report.state,
                    character.position()
                );
            }
        }
        frames += 1;
    }

    info!(
        "Finished after {} frames in {} at {:.2?}",
        frames,
        character.state(),
        character.position()
    );
    if character.state() == LocomotionState::WallRun {
        info!("Still on the wall when the script ended");
    }

    character.disable(&mut hub);
    Ok(())
}

fn load_config() -> Result<LocomotionConfig> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return Ok(LocomotionConfig::default());
    };

    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let config =
        LocomotionConfig::from_json_str(&json).with_context(|| format!("parsing {}", path))?;
    info!("Loaded locomotion config from {}", path);
    Ok(config)
}

/// Floor, one long wall to run along, and a steep ramp past its far end
fn build_level() -> SharedWorld {
    let mut world = PhysicsWorld::new();
    world.add_static_collider(presets::ground_slab(0.0, 0.0, 0.0, 60.0));
    world.add_static_collider(presets::wall_along_z(3.0, 0.0, 40.0, 8.0));
    world.add_static_collider(presets::ramp(
        -6.0,
        2.0,
        30.0,
        4.0,
        55.0_f32.to_radians(),
    ));
    // Bring the query pipeline up to date before the first ray cast
    world.step();
    info!("Level built with {} colliders", world.collider_count());
    world.into_shared()
}

/// Walk, jump onto the wall, run along it, push off and land
fn script_input(hub: &InputHub, tick: u32) {
    match tick {
        1 => hub.push_move(Vec2::new(0.0, 1.0)),
        // Taps: a held jump would push off the wall on the first wall-run tick
        20 => hub.push_jump(true),
        22 => hub.push_jump(false),
        110 => hub.push_jump(true),
        112 => hub.push_jump(false),
        125 => hub.push_move(Vec2::new(-1.0, 0.0)),
        200 => hub.push_move(Vec2::ZERO),
        _ => {}
    }
}
