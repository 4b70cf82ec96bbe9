use glam::Vec3;
use hecs::World;

use crate::components::*;
use crate::config::BallConfig;
use crate::resources::*;
use crate::systems::impact::BallCollision;
use crate::velocity::clamp_magnitude;

/// Outcome of the bounce policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounce {
    Stopped,
    Damped,
}

/// Bounce-energy loss for one collision. Slow impacts stop the ball outright.
pub fn apply_bounce(ball: &mut BallState, relative_speed: f32) -> Bounce {
    if relative_speed < ball.min_bounce_velocity {
        ball.velocity = Vec3::ZERO;
        return Bounce::Stopped;
    }
    ball.velocity *= 1.0 - ball.bounce_energy_loss.clamp(0.0, 1.0);
    Bounce::Damped
}

/// Quadratic air resistance plus linear and angular damping over `dt`.
/// Never reverses or accelerates the ball.
pub fn apply_drag(ball: &mut BallState, dt: f32) {
    if dt <= 0.0 {
        return;
    }

    let speed = ball.velocity.length();
    if speed > 0.0 && ball.mass > 0.0 {
        // dv/dt = -(k/m) v^2 integrated exactly over dt
        let k = ball.quadratic_drag.max(0.0) / ball.mass;
        let slowed = speed / (1.0 + k * speed * dt);
        let damped = slowed / (1.0 + dt * ball.linear_drag.max(0.0));
        ball.velocity *= damped / speed;
    }

    ball.angular_velocity /= 1.0 + dt * ball.angular_drag.max(0.0);
}

/// Per-tick ball update: bounce policy for this tick's collisions, then drag,
/// then speed clamps.
pub fn ball_dynamics(
    world: &mut World,
    time: &Time,
    config: &BallConfig,
    collisions: &[BallCollision],
    events: &mut Events,
) {
    for collision in collisions {
        let Ok(mut ball) = world.get::<&mut BallState>(collision.ball) else {
            continue;
        };
        if apply_bounce(&mut ball, collision.relative_speed) == Bounce::Stopped
            && !events.stopped_balls.contains(&collision.ball)
        {
            events.stopped_balls.push(collision.ball);
        }
    }

    for (_entity, ball) in world.query_mut::<&mut BallState>() {
        apply_drag(ball, time.dt);
        ball.velocity = clamp_magnitude(ball.velocity, config.max_speed);
        ball.angular_velocity = clamp_magnitude(ball.angular_velocity, config.max_angular_speed);
    }
}
