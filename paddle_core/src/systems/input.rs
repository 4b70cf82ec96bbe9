use hecs::World;

use crate::components::*;
use crate::resources::*;

/// Ingest pose source samples into paddle targets
pub fn ingest_poses(world: &mut World, poses: &mut PoseQueue) {
    for (actor, sample) in poses.samples.drain(..) {
        match world.get::<&mut PoseTarget>(actor) {
            Ok(mut target) => target.0 = sample,
            Err(_) => log::trace!("pose sample for {actor:?} has no PoseTarget, dropped"),
        }
    }
}
