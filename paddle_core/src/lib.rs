pub mod components;
pub mod config;
pub mod contact;
pub mod curve;
pub mod error;
pub mod params;
pub mod query;
pub mod resources;
pub mod systems;
pub mod velocity;

pub use components::*;
pub use config::*;
pub use contact::*;
pub use curve::*;
pub use error::*;
pub use params::*;
pub use query::*;
pub use resources::*;
pub use velocity::*;

use glam::Vec3;
use hecs::{Entity, World};
use systems::*;

/// Run one deterministic tick of the contact core
#[allow(clippy::too_many_arguments)]
pub fn step(
    world: &mut World,
    time: &mut Time,
    config: &Config,
    poses: &mut PoseQueue,
    contacts: &mut ContactQueue,
    events: &mut Events,
    integrator: &mut impl Integrator,
    launcher: &mut LauncherState,
    rng: &mut GameRng,
) {
    // Clear events at start of frame
    events.clear();

    // Clamp dt to prevent large jumps
    let dt = time.dt.min(config.max_dt);
    if time.dt.is_nan() || dt <= 0.0 {
        return;
    }
    let step_time = Time {
        dt,
        now: time.now,
        tick: time.tick,
    };

    // 1-3. Poses, paddle motion, tunneling guard
    pre_physics(world, &step_time, config, poses, events);

    // 4. Host rigid-body step
    integrator.integrate(world, &step_time, contacts);

    // 5-7. Native contacts, ball dynamics, launcher
    post_physics(world, &step_time, config, contacts, events, launcher, rng);

    time.now += dt;
    time.tick = time.tick.wrapping_add(1);
}

/// Everything that must happen before the host integrates: pose ingest,
/// paddle drive, and tunneling corrections. Returns the correction count.
pub fn pre_physics(
    world: &mut World,
    time: &Time,
    config: &Config,
    poses: &mut PoseQueue,
    events: &mut Events,
) -> usize {
    ingest_poses(world, poses);
    drive_paddles(world, time, &config.paddle);

    let scene = WorldScene::capture(world);
    run_tunneling_guard(world, config, &scene, events)
}

/// Everything after the host integrates: native hit responses, bounce and
/// drag, then the feeder and lifetime bookkeeping.
pub fn post_physics(
    world: &mut World,
    time: &Time,
    config: &Config,
    contacts: &mut ContactQueue,
    events: &mut Events,
    launcher: &mut LauncherState,
    rng: &mut GameRng,
) {
    let collisions = contacts.pop_collisions();
    let bounces = resolve_native_contacts(world, config, &collisions, events);
    ball_dynamics(world, time, &config.ball, &bounces, events);

    launch_balls(world, time, config, launcher, rng, events);
    despawn_expired(world, time, events);
}

/// Helper to create a kinematic paddle entity
pub fn create_paddle(world: &mut World, config: &PaddleConfig, pose: Pose) -> Entity {
    world.spawn((
        RigidBody::kinematic(),
        Paddle::new(pose, config),
        PoseTarget::default(),
    ))
}

/// Helper to create a dynamic ball entity
pub fn create_ball(world: &mut World, position: Vec3, velocity: Vec3, config: &BallConfig) -> Entity {
    world.spawn((
        RigidBody::dynamic(),
        Collider::ball(config.radius),
        BallState::new(position, velocity, config),
    ))
}

/// Attach paddle state to a host-owned entity. Fails when the entity has no
/// physical body or the configuration is invalid.
pub fn attach_paddle(
    world: &mut World,
    entity: Entity,
    pose: Pose,
    config: &Config,
) -> Result<(), SetupError> {
    config.validate()?;
    require_body(world, entity, BodyRole::Paddle)?;
    world
        .insert(entity, (Paddle::new(pose, &config.paddle), PoseTarget::default()))
        .map_err(|_| SetupError::NoSuchEntity(entity))?;
    log::info!("attached paddle to {entity:?}");
    Ok(())
}

/// Attach ball state to a host-owned dynamic entity
pub fn attach_ball(
    world: &mut World,
    entity: Entity,
    position: Vec3,
    velocity: Vec3,
    config: &Config,
) -> Result<(), SetupError> {
    config.validate()?;
    require_body(world, entity, BodyRole::Ball)?;
    world
        .insert(
            entity,
            (
                Collider::ball(config.ball.radius),
                BallState::new(position, velocity, &config.ball),
            ),
        )
        .map_err(|_| SetupError::NoSuchEntity(entity))?;
    log::info!("attached ball to {entity:?}");
    Ok(())
}

fn require_body(world: &World, entity: Entity, role: BodyRole) -> Result<(), SetupError> {
    if !world.contains(entity) {
        log::warn!("{role} setup failed: {entity:?} does not exist");
        return Err(SetupError::NoSuchEntity(entity));
    }
    if world.get::<&RigidBody>(entity).is_err() {
        log::warn!("{role} setup failed: {entity:?} has no RigidBody");
        return Err(SetupError::MissingRigidBody { entity, role });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_requires_rigid_body() {
        let mut world = World::new();
        let bare = world.spawn(());
        let err = attach_paddle(&mut world, bare, Pose::default(), &Config::new()).unwrap_err();
        assert!(matches!(
            err,
            SetupError::MissingRigidBody {
                role: BodyRole::Paddle,
                ..
            }
        ));
        assert!(world.get::<&Paddle>(bare).is_err());
    }

    #[test]
    fn test_attach_rejects_despawned_entity() {
        let mut world = World::new();
        let gone = world.spawn((RigidBody::dynamic(),));
        world.despawn(gone).unwrap();
        let err = attach_ball(&mut world, gone, Vec3::ZERO, Vec3::ZERO, &Config::new()).unwrap_err();
        assert!(matches!(err, SetupError::NoSuchEntity(e) if e == gone));
    }

    #[test]
    fn test_attach_rejects_invalid_config() {
        let mut world = World::new();
        let body = world.spawn((RigidBody::dynamic(),));
        let mut config = Config::new();
        config.ball.mass = 0.0;
        let err = attach_ball(&mut world, body, Vec3::ZERO, Vec3::ZERO, &config).unwrap_err();
        assert!(matches!(err, SetupError::Config(_)));
    }

    #[test]
    fn test_attach_ball_makes_it_queryable() {
        let mut world = World::new();
        let body = world.spawn((RigidBody::dynamic(),));
        attach_ball(&mut world, body, Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO, &Config::new()).unwrap();

        let scene = WorldScene::capture(&world);
        assert_eq!(scene.len(), 1);
        assert!(DynamicTarget::query(&world, body).is_some());
    }
}
