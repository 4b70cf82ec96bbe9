use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{BallState, RigidBody};

/// Where a contact came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSource {
    /// Host engine collision pass
    Native,
    /// Tunneling guard, swept volume
    SweptVolume,
    /// Tunneling guard, probe grid
    ProbeGrid,
}

impl ContactSource {
    pub fn is_correction(&self) -> bool {
        !matches!(self, ContactSource::Native)
    }
}

impl From<ContactSource> for proto::ContactKind {
    fn from(source: ContactSource) -> Self {
        match source {
            ContactSource::Native => proto::ContactKind::Native,
            ContactSource::SweptVolume => proto::ContactKind::SweptVolume,
            ContactSource::ProbeGrid => proto::ContactKind::ProbeGrid,
        }
    }
}

/// Handle to a struck body that can take an impulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DynamicTarget(pub Entity);

impl DynamicTarget {
    /// Capability query: Some only for dynamic bodies carrying ball state
    pub fn query(world: &World, entity: Entity) -> Option<Self> {
        let body = world.get::<&RigidBody>(entity).ok()?;
        if !body.is_dynamic() {
            return None;
        }
        if world.get::<&BallState>(entity).is_err() {
            return None;
        }
        Some(Self(entity))
    }

    pub fn entity(&self) -> Entity {
        self.0
    }
}

/// A paddle-ball contact, consumed in the tick it was detected
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    pub point: Vec3,
    /// Points from the paddle toward the ball
    pub normal: Vec3,
    pub source: ContactSource,
    pub actor: Entity,
    pub struck: Entity,
    pub target: Option<DynamicTarget>,
}

impl ContactEvent {
    pub fn new(
        world: &World,
        actor: Entity,
        struck: Entity,
        point: Vec3,
        normal: Vec3,
        source: ContactSource,
    ) -> Self {
        Self {
            point,
            normal,
            source,
            actor,
            struck,
            target: DynamicTarget::query(world, struck),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BallConfig;

    #[test]
    fn test_dynamic_ball_has_target() {
        let mut world = World::new();
        let ball = world.spawn((
            RigidBody::dynamic(),
            BallState::new(Vec3::ZERO, Vec3::ZERO, &BallConfig::default()),
        ));
        assert_eq!(DynamicTarget::query(&world, ball), Some(DynamicTarget(ball)));
    }

    #[test]
    fn test_kinematic_or_stateless_bodies_have_no_target() {
        let mut world = World::new();
        let kinematic = world.spawn((
            RigidBody::kinematic(),
            BallState::new(Vec3::ZERO, Vec3::ZERO, &BallConfig::default()),
        ));
        let bare = world.spawn((RigidBody::dynamic(),));
        let nothing = world.spawn(());

        assert_eq!(DynamicTarget::query(&world, kinematic), None);
        assert_eq!(DynamicTarget::query(&world, bare), None);
        assert_eq!(DynamicTarget::query(&world, nothing), None);
    }

    #[test]
    fn test_despawned_entity_has_no_target() {
        let mut world = World::new();
        let ball = world.spawn((RigidBody::dynamic(),));
        world.despawn(ball).unwrap();
        assert_eq!(DynamicTarget::query(&world, ball), None);
    }

    #[test]
    fn test_only_native_is_not_correction() {
        assert!(!ContactSource::Native.is_correction());
        assert!(ContactSource::SweptVolume.is_correction());
        assert!(ContactSource::ProbeGrid.is_correction());
    }
}
