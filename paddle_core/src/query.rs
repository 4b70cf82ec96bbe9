//! Swept-shape and ray intersection queries.
//!
//! The host engine normally provides these; `WorldScene` answers them from the
//! sphere colliders in a hecs world so the core also runs headless.

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Anchor, BallState, BodyTag, Collider};

/// Nearest intersection returned by a scene query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryHit {
    pub entity: Entity,
    pub tag: BodyTag,
    pub point: Vec3,
    /// Outward surface normal of the struck body at `point`
    pub normal: Vec3,
    /// Distance travelled along the query before contact
    pub distance: f32,
    /// Center of the struck body when it is a sphere
    pub center: Vec3,
}

pub trait SceneQuery {
    /// Sweep a sphere of `radius` from `start` to `end`, returning the first body touched
    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f32) -> Option<QueryHit>;

    /// Cast a ray of at most `max_distance`; `direction` need not be normalized
    fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<QueryHit>;
}

#[derive(Debug, Clone, Copy)]
struct SceneSphere {
    entity: Entity,
    center: Vec3,
    radius: f32,
    tag: BodyTag,
}

/// Snapshot of the world's sphere colliders
#[derive(Debug, Clone, Default)]
pub struct WorldScene {
    spheres: Vec<SceneSphere>,
}

impl WorldScene {
    /// Collect colliders without holding borrows into the world
    pub fn capture(world: &World) -> Self {
        let mut spheres: Vec<SceneSphere> = world
            .query::<(&Collider, &BallState)>()
            .iter()
            .map(|(entity, (collider, ball))| SceneSphere {
                entity,
                center: ball.position,
                radius: collider.radius,
                tag: collider.tag,
            })
            .collect();
        spheres.extend(
            world
                .query::<(&Collider, &Anchor)>()
                .without::<&BallState>()
                .iter()
                .map(|(entity, (collider, anchor))| SceneSphere {
                    entity,
                    center: anchor.position,
                    radius: collider.radius,
                    tag: collider.tag,
                }),
        );
        // Deterministic tie-breaking between equidistant hits
        spheres.sort_by_key(|s| s.entity.id());
        Self { spheres }
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    fn nearest(&self, origin: Vec3, direction: Vec3, max_distance: f32, inflate: f32) -> Option<QueryHit> {
        let mut best: Option<(f32, &SceneSphere)> = None;
        for sphere in &self.spheres {
            let Some(t) = ray_sphere(origin, direction, sphere.center, sphere.radius + inflate) else {
                continue;
            };
            if t > max_distance {
                continue;
            }
            if best.map_or(true, |(best_t, _)| t < best_t) {
                best = Some((t, sphere));
            }
        }

        best.map(|(t, sphere)| {
            // Position of the query shape's center at first touch
            let swept_center = origin + direction * t;
            let outward = (swept_center - sphere.center)
                .try_normalize()
                .unwrap_or(-direction);
            QueryHit {
                entity: sphere.entity,
                tag: sphere.tag,
                point: sphere.center + outward * sphere.radius,
                normal: outward,
                distance: t,
                center: sphere.center,
            }
        })
    }
}

impl SceneQuery for WorldScene {
    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f32) -> Option<QueryHit> {
        let delta = end - start;
        let length = delta.length();
        let direction = if length > f32::EPSILON {
            delta / length
        } else {
            Vec3::Z
        };
        self.nearest(start, direction, length, radius.max(0.0))
    }

    fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<QueryHit> {
        let direction = direction.try_normalize()?;
        self.nearest(origin, direction, max_distance, 0.0)
    }
}

/// Distance along a unit `direction` at which the ray first touches the sphere.
/// Zero when the origin starts inside.
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let c = oc.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let b = oc.dot(direction);
    if b > 0.0 {
        return None; // outside and pointing away
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    Some(-b - disc.sqrt())
}
