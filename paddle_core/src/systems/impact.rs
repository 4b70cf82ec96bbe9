use glam::Vec3;
use hecs::{Entity, World};

use crate::components::*;
use crate::config::{Config, ImpulseProfile, NativeDirection};
use crate::contact::{ContactEvent, ContactSource};
use crate::curve::clamp01;
use crate::params::Params;
use crate::resources::*;

/// Strike zone on the paddle face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    SweetSpot,
    Regular,
    Edge,
}

impl HitZone {
    /// Classify by center distance as a fraction of the paddle radius.
    /// Both boundaries belong to the regular zone.
    pub fn classify(normalized_distance: f32) -> Self {
        if normalized_distance < Params::SWEET_SPOT_FRACTION {
            HitZone::SweetSpot
        } else if normalized_distance > Params::EDGE_FRACTION {
            HitZone::Edge
        } else {
            HitZone::Regular
        }
    }

    pub fn multiplier(&self, profile: &ImpulseProfile) -> f32 {
        match self {
            HitZone::SweetSpot => profile.sweet_spot_multiplier,
            HitZone::Regular => profile.default_multiplier,
            HitZone::Edge => profile.edge_multiplier,
        }
    }
}

/// Zone for a contact `distance` from a paddle of characteristic `radius`
pub fn hit_zone(distance: f32, radius: f32) -> HitZone {
    if radius <= 0.0 {
        return HitZone::Regular;
    }
    HitZone::classify(distance / radius)
}

/// Paddle motion as seen by the resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorKinematics {
    pub center: Vec3,
    pub face_normal: Vec3,
    pub velocity: Vec3, // smoothed
}

impl ActorKinematics {
    pub fn from_paddle(paddle: &Paddle) -> Self {
        Self {
            center: paddle.pose.position,
            face_normal: paddle.pose.face_normal(),
            velocity: paddle.smoothed_velocity(),
        }
    }
}

/// Computed response for one contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseResponse {
    pub direction: Vec3,
    pub magnitude: f32,
    pub spin: Vec3,
    pub zone: HitZone,
}

impl ImpulseResponse {
    pub fn linear(&self) -> Vec3 {
        self.direction * self.magnitude
    }
}

/// lerp(base, max, curve(rel / reference)) scaled by the zone, kept in [base, max]
pub fn impulse_magnitude(profile: &ImpulseProfile, relative_speed: f32, zone: HitZone) -> f32 {
    let normalized = if profile.reference_speed > 0.0 {
        clamp01(relative_speed / profile.reference_speed)
    } else {
        1.0
    };
    let factor = profile.curve.evaluate(normalized);
    let magnitude = profile.base_impulse + (profile.max_impulse - profile.base_impulse) * factor;
    (magnitude * zone.multiplier(profile)).clamp(profile.base_impulse, profile.max_impulse)
}

/// Reflect `v` about the plane with normal `n`
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

fn blend_direction(normal: Vec3, actor_velocity: Vec3, weight: f32) -> Vec3 {
    let actor_dir = actor_velocity.normalize_or_zero();
    normal.lerp(actor_dir, weight).normalize_or_zero()
}

/// Pure impulse computation. None when no usable direction exists.
pub fn compute_response(
    event: &ContactEvent,
    actor: &ActorKinematics,
    ball_velocity: Vec3,
    profile: &ImpulseProfile,
    paddle_radius: f32,
) -> Option<ImpulseResponse> {
    let normal = event.normal.normalize_or_zero();
    let relative_speed = (actor.velocity - ball_velocity).length();
    let zone = hit_zone(event.point.distance(actor.center), paddle_radius);
    let magnitude = impulse_magnitude(profile, relative_speed, zone);

    let native = event.source == ContactSource::Native;
    let direction = if native && profile.native_direction == NativeDirection::Reflect {
        let face = actor.face_normal.normalize_or_zero();
        reflect(ball_velocity.normalize_or_zero(), face).normalize_or_zero()
    } else {
        blend_direction(normal, actor.velocity, profile.direction_blend)
    };
    let direction = if direction == Vec3::ZERO { normal } else { direction };
    if direction == Vec3::ZERO {
        return None;
    }

    let spin = if native {
        actor.face_normal.normalize_or_zero().cross(direction) * magnitude * profile.spin_gain
    } else {
        Vec3::ZERO
    };

    Some(ImpulseResponse {
        direction,
        magnitude,
        spin,
        zone,
    })
}

/// Apply one contact to its ball. No-op when the struck body can't respond.
pub fn apply_contact(
    world: &mut World,
    event: &ContactEvent,
    actor: &ActorKinematics,
    profile: &ImpulseProfile,
    paddle_radius: f32,
    events: &mut Events,
) -> Option<ImpulseResponse> {
    let Some(target) = event.target else {
        log::trace!("contact with {:?} has no dynamic target, skipped", event.struck);
        return None;
    };
    let Ok(mut ball) = world.get::<&mut BallState>(target.entity()) else {
        return None;
    };

    let response = compute_response(event, actor, ball.velocity, profile, paddle_radius)?;
    ball.apply_velocity_change(response.linear());
    ball.apply_angular_change(response.spin);

    events.contacts.push(ContactDebug {
        actor: event.actor,
        ball: target.entity(),
        source: event.source,
        point: event.point,
        normal: event.normal,
        magnitude: response.magnitude,
    });
    Some(response)
}

/// A host collision involving a ball, fed to the bounce policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallCollision {
    pub ball: Entity,
    pub relative_speed: f32,
}

/// Resolve host-reported collisions: full paddle responses under the hit
/// cooldown, plus a bounce record for every collision a ball took part in.
pub fn resolve_native_contacts(
    world: &mut World,
    config: &Config,
    collisions: &[HostCollision],
    events: &mut Events,
) -> Vec<BallCollision> {
    let mut bounces = Vec::new();
    let radius = config.paddle.radius();

    for collision in collisions {
        let relative_speed = collision.relative_velocity.length();
        for ball in [collision.a, collision.b] {
            if world.get::<&BallState>(ball).is_ok() {
                bounces.push(BallCollision {
                    ball,
                    relative_speed,
                });
            }
        }

        let (actor, struck, normal) = if world.get::<&Paddle>(collision.a).is_ok() {
            (collision.a, collision.b, collision.normal)
        } else if world.get::<&Paddle>(collision.b).is_ok() {
            (collision.b, collision.a, -collision.normal)
        } else {
            continue;
        };
        if world.get::<&BallState>(struck).is_err() {
            continue;
        }

        let kinematics = {
            let paddle = match world.get::<&Paddle>(actor) {
                Ok(paddle) => paddle,
                Err(_) => continue,
            };
            if !paddle.can_hit() {
                log::trace!("native hit on {actor:?} inside cooldown, suppressed");
                continue;
            }
            ActorKinematics::from_paddle(&paddle)
        };

        let event = ContactEvent::new(
            world,
            actor,
            struck,
            collision.point,
            normal,
            ContactSource::Native,
        );
        if let Some(response) =
            apply_contact(world, &event, &kinematics, &config.impulse, radius, events)
        {
            log::debug!(
                "native hit {actor:?} -> {struck:?}: {:.2} ({:?})",
                response.magnitude,
                response.zone
            );
            events.ball_hit_paddle = true;
            if let Ok(mut paddle) = world.get::<&mut Paddle>(actor) {
                paddle.start_cooldown(config.paddle.hit_cooldown);
            }
        }
    }

    bounces
}
