use glam::{Quat, Vec3};

use crate::config::{BallConfig, PaddleConfig};
use crate::params::Params;
use crate::velocity::VelocityEstimator;

/// Position and orientation in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Paddle face normal (local +Z)
    pub fn face_normal(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// How the host engine simulates a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Dynamic,
    Kinematic,
    Static,
}

/// Marker for a body registered with the host physics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigidBody {
    pub kind: BodyKind,
}

impl RigidBody {
    pub fn dynamic() -> Self {
        Self {
            kind: BodyKind::Dynamic,
        }
    }

    pub fn kinematic() -> Self {
        Self {
            kind: BodyKind::Kinematic,
        }
    }

    pub fn fixed() -> Self {
        Self {
            kind: BodyKind::Static,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }
}

/// Identity tag used by scene queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTag {
    Ball,
    Scenery,
}

/// Sphere collider visible to scene queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub radius: f32,
    pub tag: BodyTag,
}

impl Collider {
    pub fn ball(radius: f32) -> Self {
        Self {
            radius,
            tag: BodyTag::Ball,
        }
    }

    pub fn scenery(radius: f32) -> Self {
        Self {
            radius,
            tag: BodyTag::Scenery,
        }
    }
}

/// World position for bodies without a BallState (static scenery)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: Vec3,
}

/// Paddle component - kinematic actor state, mutated once per tick
#[derive(Debug, Clone)]
pub struct Paddle {
    pub pose: Pose,
    pub previous_position: Vec3,
    pub velocity: Vec3, // clamped, this tick
    pub estimator: VelocityEstimator,
    pub hit_cooldown: f32, // seconds until a native hit may register again
}

impl Paddle {
    pub fn new(pose: Pose, config: &PaddleConfig) -> Self {
        Self {
            pose,
            previous_position: pose.position,
            velocity: Vec3::ZERO,
            estimator: VelocityEstimator::with_max_speed(config.velocity_window, config.max_speed),
            hit_cooldown: 0.0,
        }
    }

    pub fn smoothed_velocity(&self) -> Vec3 {
        self.estimator.smoothed()
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn can_hit(&self) -> bool {
        self.hit_cooldown <= 0.0
    }

    pub fn start_cooldown(&mut self, duration: f32) {
        self.hit_cooldown = duration;
    }

    pub fn update_cooldown(&mut self, dt: f32) {
        if self.hit_cooldown > 0.0 {
            self.hit_cooldown = (self.hit_cooldown - dt).max(0.0);
        }
    }
}

/// Target pose for this tick; None while the pose source is unavailable
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseTarget(pub Option<Pose>);

/// Ball component - linear/angular state plus response coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub linear_drag: f32,
    pub quadratic_drag: f32,
    pub angular_drag: f32,
    pub bounce_energy_loss: f32,
    pub min_bounce_velocity: f32,
    pub surface_friction: f32,
}

impl BallState {
    pub fn new(position: Vec3, velocity: Vec3, config: &BallConfig) -> Self {
        Self {
            position,
            velocity,
            angular_velocity: Vec3::ZERO,
            mass: config.mass,
            linear_drag: config.linear_drag,
            quadratic_drag: config.quadratic_drag,
            angular_drag: config.angular_drag,
            bounce_energy_loss: config.bounce_energy_loss,
            min_bounce_velocity: config.min_bounce_velocity,
            surface_friction: config.surface_friction,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Mass-normalized impulse: adds directly to linear velocity
    pub fn apply_velocity_change(&mut self, delta: Vec3) {
        if delta.is_finite() {
            self.velocity += delta;
        }
    }

    pub fn apply_angular_change(&mut self, delta: Vec3) {
        if delta.is_finite() {
            self.angular_velocity += delta;
        }
    }

    /// Contact material the host engine should give the ball's collider
    pub fn material(&self) -> SurfaceMaterial {
        SurfaceMaterial {
            bounciness: Params::BALL_BOUNCINESS,
            dynamic_friction: self.surface_friction,
            static_friction: self.surface_friction * Params::STATIC_FRICTION_RATIO,
        }
    }
}

/// Host-side restitution and friction for a collider. Values are averaged
/// with the other collider's material by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    pub bounciness: f32,
    pub dynamic_friction: f32,
    pub static_friction: f32,
}

/// Remaining time before a launched ball is despawned
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub t_left: f32,
}

impl Lifetime {
    pub fn new(t_left: f32) -> Self {
        Self { t_left }
    }

    pub fn is_expired(&self) -> bool {
        self.t_left <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_face_normal_follows_orientation() {
        let pose = Pose::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));
        assert!((pose.face_normal() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_cooldown_counts_down_to_zero() {
        let mut paddle = Paddle::new(Pose::default(), &PaddleConfig::default());
        assert!(paddle.can_hit());
        paddle.start_cooldown(0.1);
        assert!(!paddle.can_hit());
        paddle.update_cooldown(0.05);
        assert!(!paddle.can_hit());
        paddle.update_cooldown(0.06);
        assert!(paddle.can_hit());
        assert_eq!(paddle.hit_cooldown, 0.0);
    }

    #[test]
    fn test_non_finite_velocity_change_ignored() {
        let mut ball = BallState::new(Vec3::ZERO, Vec3::X, &BallConfig::default());
        ball.apply_velocity_change(Vec3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(ball.velocity, Vec3::X);
    }

    #[test]
    fn test_material_from_friction() {
        let ball = BallState::new(Vec3::ZERO, Vec3::ZERO, &BallConfig::default());
        let material = ball.material();
        assert_eq!(material.dynamic_friction, 0.5);
        assert!((material.static_friction - 0.75).abs() < 1e-6);
    }
}
