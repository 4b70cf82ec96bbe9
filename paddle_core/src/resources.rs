use glam::Vec3;
use hecs::Entity;

use crate::components::Pose;
use crate::contact::ContactSource;

/// Time resource for tracking simulation time
#[derive(Debug, Clone, Copy)]
pub struct Time {
    pub dt: f32,  // Delta time for this step
    pub now: f32, // Total elapsed time
    pub tick: u32,
}

impl Time {
    pub fn new(dt: f32, now: f32) -> Self {
        Self { dt, now, tick: 0 }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self {
            dt: crate::params::Params::FIXED_DT,
            now: 0.0,
            tick: 0,
        }
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// One resolved contact, published for visualization and logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactDebug {
    pub actor: Entity,
    pub ball: Entity,
    pub source: ContactSource,
    pub point: Vec3,
    pub normal: Vec3,
    pub magnitude: f32,
}

/// Events that occurred during this tick
#[derive(Debug, Clone, Default)]
pub struct Events {
    pub contacts: Vec<ContactDebug>,
    pub ball_hit_paddle: bool,
    pub stopped_balls: Vec<Entity>,
    pub launched_balls: Vec<Entity>,
    pub expired_balls: Vec<Entity>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
        self.ball_hit_paddle = false;
        self.stopped_balls.clear();
        self.launched_balls.clear();
        self.expired_balls.clear();
    }

    /// Corrections raised by the tunneling guard this tick
    pub fn corrections(&self) -> impl Iterator<Item = &ContactDebug> {
        self.contacts.iter().filter(|c| c.source.is_correction())
    }

    /// Full native responses this tick
    pub fn native_hits(&self) -> impl Iterator<Item = &ContactDebug> {
        self.contacts
            .iter()
            .filter(|c| c.source == ContactSource::Native)
    }

    /// Encode this tick's events for external debug tooling
    pub fn to_debug_events(&self, tick: u32) -> Vec<proto::DebugEvent> {
        let mut out = Vec::with_capacity(
            self.contacts.len()
                + self.stopped_balls.len()
                + self.launched_balls.len()
                + self.expired_balls.len(),
        );
        for contact in &self.contacts {
            out.push(proto::DebugEvent::Contact {
                tick,
                ball: contact.ball.to_bits().get(),
                source: contact.source.into(),
                point: contact.point.to_array(),
                normal: contact.normal.to_array(),
                magnitude: contact.magnitude,
            });
        }
        for ball in &self.stopped_balls {
            out.push(proto::DebugEvent::BallStopped {
                tick,
                ball: ball.to_bits().get(),
            });
        }
        for ball in &self.launched_balls {
            out.push(proto::DebugEvent::BallLaunched {
                tick,
                ball: ball.to_bits().get(),
            });
        }
        for ball in &self.expired_balls {
            out.push(proto::DebugEvent::BallExpired {
                tick,
                ball: ball.to_bits().get(),
            });
        }
        out
    }
}

/// Contact reported by the host engine's own collision pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostCollision {
    pub a: Entity,
    pub b: Entity,
    pub point: Vec3,
    /// Points from `a` toward `b`
    pub normal: Vec3,
    pub relative_velocity: Vec3,
}

/// Host collision notifications for the current tick
#[derive(Debug, Clone, Default)]
pub struct ContactQueue {
    pub collisions: Vec<HostCollision>,
}

impl ContactQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, collision: HostCollision) {
        self.collisions.push(collision);
    }

    pub fn clear(&mut self) {
        self.collisions.clear();
    }

    pub fn pop_collisions(&mut self) -> Vec<HostCollision> {
        std::mem::take(&mut self.collisions)
    }
}

/// Pose source samples for tracked paddles (None = tracking lost)
#[derive(Debug, Clone, Default)]
pub struct PoseQueue {
    pub samples: Vec<(Entity, Option<Pose>)>,
}

impl PoseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_pose(&mut self, actor: Entity, pose: Pose) {
        self.samples.push((actor, Some(pose)));
    }

    pub fn push_unavailable(&mut self, actor: Entity) {
        self.samples.push((actor, None));
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
