use glam::Vec3;
use hecs::World;

use crate::components::*;
use crate::params::Params;
use crate::resources::*;

/// Host rigid-body step, run between the guard and native contact resolution.
/// Implementations may report collisions into `contacts`.
pub trait Integrator {
    fn integrate(&mut self, world: &mut World, time: &Time, contacts: &mut ContactQueue);
}

/// Headless stand-in for the host engine: free flight under gravity, no collisions
#[derive(Debug, Clone, Copy)]
pub struct BallisticIntegrator {
    pub gravity: Vec3,
}

impl BallisticIntegrator {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }

    /// Zero gravity, for tests that only care about straight-line motion
    pub fn weightless() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Default for BallisticIntegrator {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, Params::GRAVITY, 0.0))
    }
}

impl Integrator for BallisticIntegrator {
    fn integrate(&mut self, world: &mut World, time: &Time, _contacts: &mut ContactQueue) {
        move_balls(world, time, self.gravity);
    }
}

/// Move dynamic balls based on velocity (semi-implicit Euler)
pub fn move_balls(world: &mut World, time: &Time, gravity: Vec3) {
    if time.dt <= 0.0 {
        return;
    }
    for (_entity, (ball, body)) in world.query_mut::<(&mut BallState, &RigidBody)>() {
        if !body.is_dynamic() {
            continue;
        }
        ball.velocity += gravity * time.dt;
        ball.position += ball.velocity * time.dt;
    }
}
