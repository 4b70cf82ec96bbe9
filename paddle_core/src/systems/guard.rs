use std::collections::HashSet;

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::*;
use crate::config::{Config, GuardConfig, PaddleConfig};
use crate::contact::{ContactEvent, ContactSource};
use crate::query::{QueryHit, SceneQuery};
use crate::resources::*;
use crate::systems::impact::{apply_contact, ActorKinematics};

/// Swept-volume test over this tick's motion segment.
/// Returns the nearest ball touched, if any.
pub fn swept_volume_test(
    previous: Vec3,
    current: Vec3,
    config: &GuardConfig,
    scene: &impl SceneQuery,
) -> Option<QueryHit> {
    let distance = previous.distance(current);
    if distance <= f32::EPSILON {
        return None;
    }
    if distance > config.max_sweep_distance {
        log::trace!("sweep of {distance:.3} exceeds {:.3}, treated as teleport", config.max_sweep_distance);
        return None;
    }
    scene
        .sweep_sphere(previous, current, config.sweep_radius)
        .filter(|hit| hit.tag == BodyTag::Ball)
}

/// Local-space origins of the probe grid across the paddle face
pub fn probe_origins(guard: &GuardConfig, paddle: &PaddleConfig) -> Vec<Vec3> {
    let offset = Vec3::from_array(guard.probe_offset);
    let along = |i: u32, n: u32, extent: f32| {
        let t = if n <= 1 { 0.5 } else { i as f32 / (n - 1) as f32 };
        -extent * 0.5 + extent * t
    };

    let mut origins =
        Vec::with_capacity((guard.probes_along_width * guard.probes_along_height) as usize);
    for w in 0..guard.probes_along_width {
        for h in 0..guard.probes_along_height {
            let x = along(w, guard.probes_along_width, paddle.width);
            let y = along(h, guard.probes_along_height, paddle.height);
            origins.push(offset + Vec3::new(x, y, 0.0));
        }
    }
    origins
}

/// Probe-grid test: short rays both ways along the face normal from each grid point.
/// Returns every ball hit, in grid order.
pub fn probe_grid_test(
    pose: &Pose,
    speed: f32,
    guard: &GuardConfig,
    paddle: &PaddleConfig,
    scene: &impl SceneQuery,
) -> Vec<QueryHit> {
    if speed < guard.probe_min_speed {
        return Vec::new();
    }
    let normal = pose.face_normal();
    let mut hits = Vec::new();
    for local in probe_origins(guard, paddle) {
        let origin = pose.transform_point(local);
        for direction in [normal, -normal] {
            if let Some(hit) = scene.ray_cast(origin, direction, guard.probe_distance) {
                if hit.tag == BodyTag::Ball {
                    hits.push(hit);
                }
            }
        }
    }
    hits
}

fn contact_from_hit(world: &World, actor: Entity, hit: &QueryHit, source: ContactSource) -> ContactEvent {
    // Query normals face the paddle; contacts push the ball away from it
    ContactEvent::new(world, actor, hit.entity, hit.point, -hit.normal, source)
}

/// Run the supplemental tunneling tests for every paddle and apply weak
/// corrections immediately. A ball is corrected at most once per tick.
pub fn run_tunneling_guard(
    world: &mut World,
    config: &Config,
    scene: &impl SceneQuery,
    events: &mut Events,
) -> usize {
    let guard = &config.guard;
    if !guard.swept_enabled && !guard.probes_enabled {
        return 0;
    }

    // Collect contacts without holding borrows (deterministic: sort by entity ID)
    let mut paddles: Vec<(Entity, Pose, Vec3, f32, ActorKinematics)> = world
        .query::<&Paddle>()
        .iter()
        .map(|(e, p)| (e, p.pose, p.previous_position, p.speed(), ActorKinematics::from_paddle(p)))
        .collect();
    paddles.sort_by_key(|(e, ..)| e.id());

    let mut seen: HashSet<Entity> = HashSet::new();
    let mut contacts = Vec::new();
    for (actor, pose, previous, speed, kinematics) in paddles {
        if guard.swept_enabled {
            if let Some(hit) = swept_volume_test(previous, pose.position, guard, scene) {
                if seen.insert(hit.entity) {
                    contacts.push((contact_from_hit(world, actor, &hit, ContactSource::SweptVolume), kinematics));
                }
            }
        }
        if guard.probes_enabled {
            for hit in probe_grid_test(&pose, speed, guard, &config.paddle, scene) {
                if seen.insert(hit.entity) {
                    contacts.push((contact_from_hit(world, actor, &hit, ContactSource::ProbeGrid), kinematics));
                }
            }
        }
    }

    let radius = config.paddle.radius();
    let mut applied = 0;
    for (event, kinematics) in contacts {
        if let Some(response) =
            apply_contact(world, &event, &kinematics, &config.correction, radius, events)
        {
            log::debug!(
                "{:?} correction {:?} -> {:?} at {:?}: {:.2}",
                event.source,
                event.actor,
                event.struck,
                event.point,
                response.magnitude
            );
            applied += 1;
        }
    }
    applied
}
