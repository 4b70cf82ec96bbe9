use glam::Quat;
use hecs::World;

use crate::components::*;
use crate::config::PaddleConfig;
use crate::resources::*;

/// Exponential-decay follow toward `target`: fraction = 1 - exp(-gain * dt)
pub fn follow_pose(current: Pose, target: Pose, gain: f32, dt: f32) -> Pose {
    if dt <= 0.0 || gain <= 0.0 {
        return current;
    }
    let t = 1.0 - (-gain * dt).exp();
    Pose {
        position: current.position.lerp(target.position, t),
        orientation: shortest_arc_slerp(current.orientation, target.orientation, t),
    }
}

fn shortest_arc_slerp(from: Quat, to: Quat, t: f32) -> Quat {
    let to = if from.dot(to) < 0.0 { -to } else { to };
    from.slerp(to, t).normalize()
}

/// Advance one paddle by one tick. A missing target holds the last pose.
pub fn step_paddle(paddle: &mut Paddle, target: Option<Pose>, config: &PaddleConfig, dt: f32) {
    if !(dt > 0.0) {
        return;
    }

    paddle.previous_position = paddle.pose.position;
    if let Some(target) = target {
        paddle.pose = follow_pose(paddle.pose, target, config.follow_gain, dt);
    }

    paddle.velocity = paddle
        .estimator
        .update(paddle.previous_position, paddle.pose.position, dt);
    paddle.update_cooldown(dt);
}

/// Move every paddle toward its target pose
pub fn drive_paddles(world: &mut World, time: &Time, config: &PaddleConfig) {
    if !(time.dt > 0.0) {
        return;
    }
    for (_entity, (paddle, target)) in world.query_mut::<(&mut Paddle, &PoseTarget)>() {
        step_paddle(paddle, target.0, config, time.dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::PI;

    fn setup() -> (World, PaddleConfig) {
        (World::new(), PaddleConfig::default())
    }

    #[test]
    fn test_follow_uses_exponential_fraction() {
        let current = Pose::default();
        let target = Pose::from_position(Vec3::new(1.0, 0.0, 0.0));
        let next = follow_pose(current, target, 20.0, 0.01);
        let expected = 1.0 - (-0.2f32).exp();
        assert!((next.position.x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_follow_takes_shortest_arc() {
        let current = Pose::new(Vec3::ZERO, Quat::from_rotation_y(170f32.to_radians()));
        let target = Pose::new(Vec3::ZERO, Quat::from_rotation_y(-170f32.to_radians()));
        let next = follow_pose(current, target, 20.0, 0.01);

        // Short way round passes through 180 degrees, not back through 0
        let (axis, angle) = next.orientation.to_axis_angle();
        let yaw = if axis.y >= 0.0 { angle } else { 2.0 * PI - angle };
        assert!(yaw > 170f32.to_radians() && yaw < 190f32.to_radians(), "yaw {yaw}");
    }

    #[test]
    fn test_speed_is_clamped() {
        let (mut world, config) = setup();
        let paddle = world.spawn((
            Paddle::new(Pose::default(), &config),
            PoseTarget(Some(Pose::from_position(Vec3::new(100.0, 0.0, 0.0)))),
        ));
        let time = Time::new(1.0 / 72.0, 0.0);

        drive_paddles(&mut world, &time, &config);

        let p = world.get::<&Paddle>(paddle).unwrap();
        assert!(p.speed() <= config.max_speed + 1e-4);
        assert!(p.velocity.x > 0.0, "Clamping keeps direction");
        assert!(p.smoothed_velocity().length() <= config.max_speed + 1e-4);
    }

    #[test]
    fn test_zero_dt_leaves_pose_and_velocity_unchanged() {
        let (mut world, config) = setup();
        let start = Pose::from_position(Vec3::new(0.5, 1.0, 0.0));
        let mut state = Paddle::new(start, &config);
        state.velocity = Vec3::new(1.0, 0.0, 0.0);
        let paddle = world.spawn((
            state,
            PoseTarget(Some(Pose::from_position(Vec3::new(3.0, 1.0, 0.0)))),
        ));

        drive_paddles(&mut world, &Time::new(0.0, 0.0), &config);

        let p = world.get::<&Paddle>(paddle).unwrap();
        assert_eq!(p.pose, start);
        assert_eq!(p.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert!(p.estimator.is_empty());
        assert!(!p.velocity.is_nan());
    }

    #[test]
    fn test_nan_dt_leaves_paddle_untouched() {
        let config = PaddleConfig::default();
        let start = Pose::from_position(Vec3::new(0.5, 1.0, 0.0));
        let mut paddle = Paddle::new(start, &config);

        step_paddle(&mut paddle, Some(Pose::default()), &config, f32::NAN);

        assert_eq!(paddle.pose, start);
        assert!(paddle.estimator.is_empty());
        assert!(!paddle.velocity.is_nan());
    }

    #[test]
    fn test_unavailable_target_holds_pose() {
        let (mut world, config) = setup();
        let start = Pose::from_position(Vec3::new(0.2, 1.0, 0.0));
        let paddle = world.spawn((Paddle::new(start, &config), PoseTarget(None)));

        drive_paddles(&mut world, &Time::new(0.01, 0.0), &config);

        let p = world.get::<&Paddle>(paddle).unwrap();
        assert_eq!(p.pose, start);
        assert_eq!(p.velocity, Vec3::ZERO);
        assert_eq!(p.previous_position, start.position);
    }

    #[test]
    fn test_previous_position_is_start_of_tick() {
        let (mut world, config) = setup();
        let paddle = world.spawn((
            Paddle::new(Pose::default(), &config),
            PoseTarget(Some(Pose::from_position(Vec3::new(0.0, 0.0, 0.1)))),
        ));
        let time = Time::new(0.01, 0.0);

        drive_paddles(&mut world, &time, &config);
        let after_first = world.get::<&Paddle>(paddle).unwrap().pose.position;
        drive_paddles(&mut world, &time, &config);

        let p = world.get::<&Paddle>(paddle).unwrap();
        assert_eq!(p.previous_position, after_first);
        assert!(p.pose.position.z > after_first.z);
    }

    #[test]
    fn test_cooldown_ticks_down() {
        let (mut world, config) = setup();
        let mut state = Paddle::new(Pose::default(), &config);
        state.start_cooldown(0.1);
        let paddle = world.spawn((state, PoseTarget(None)));

        drive_paddles(&mut world, &Time::new(0.06, 0.0), &config);
        assert!(!world.get::<&Paddle>(paddle).unwrap().can_hit());
        drive_paddles(&mut world, &Time::new(0.06, 0.0), &config);
        assert!(world.get::<&Paddle>(paddle).unwrap().can_hit());
    }
}
