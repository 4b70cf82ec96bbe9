use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;

use crate::components::*;
use crate::config::Config;
use crate::resources::*;

/// Launch schedule for the training feeder
#[derive(Debug, Clone, Copy, Default)]
pub struct LauncherState {
    pub next_shot: f32, // simulation time of the next launch
}

impl LauncherState {
    pub fn new(first_shot: f32) -> Self {
        Self {
            next_shot: first_shot,
        }
    }
}

/// Spawn one ball aimed at a random target. None when no targets are configured.
pub fn launch_ball(world: &mut World, config: &Config, rng: &mut GameRng) -> Option<Entity> {
    let launcher = &config.launcher;
    if launcher.targets.is_empty() {
        return None;
    }

    let mut origin = Vec3::from_array(launcher.position);
    origin.z += uniform(rng, launcher.min_z_offset, launcher.max_z_offset)?;

    let target = Vec3::from_array(launcher.targets[rng.0.gen_range(0..launcher.targets.len())]);
    // Launched balls start within the ball speed cap
    let speed = uniform(rng, launcher.min_speed, launcher.max_speed)?.min(config.ball.max_speed);
    let velocity = (target - origin).normalize_or_zero() * speed;

    let ball = crate::create_ball(world, origin, velocity, &config.ball);
    world
        .insert_one(ball, Lifetime::new(launcher.ball_lifetime))
        .ok()?;
    log::info!("launched {ball:?} from {origin:?} at {speed:.1} m/s");
    Some(ball)
}

fn uniform(rng: &mut GameRng, a: f32, b: f32) -> Option<f32> {
    if !a.is_finite() || !b.is_finite() {
        log::warn!("launcher range [{a}, {b}] is not finite, launch skipped");
        return None;
    }
    Some(rng.0.gen_range(a.min(b)..=a.max(b)))
}

/// Fire the launcher when its interval has elapsed
pub fn launch_balls(
    world: &mut World,
    time: &Time,
    config: &Config,
    state: &mut LauncherState,
    rng: &mut GameRng,
    events: &mut Events,
) {
    if !config.launcher.enabled || time.now < state.next_shot {
        return;
    }
    state.next_shot = time.now + config.launcher.interval;
    if let Some(ball) = launch_ball(world, config, rng) {
        events.launched_balls.push(ball);
    }
}

/// Count down lifetimes and despawn expired balls
pub fn despawn_expired(world: &mut World, time: &Time, events: &mut Events) {
    let mut to_remove = Vec::new();

    for (entity, lifetime) in world.query_mut::<&mut Lifetime>() {
        lifetime.t_left -= time.dt;
        if lifetime.is_expired() {
            to_remove.push(entity);
        }
    }
    to_remove.sort_by_key(|e| e.id());

    for entity in to_remove {
        if world.despawn(entity).is_ok() {
            events.expired_balls.push(entity);
        }
    }
}
