use crate::contact::{add_forces, is_touching, push_outside};
use crate::engine::World;

/// Step the world forward by dt.
///
/// Position correction runs as its own pass and finishes before any contact
/// force is computed.
pub fn step(world: &mut World, dt: f64, epsilon: f64) {
    let World { field, projectile } = world;

    // Contact correction
    for spring in field.iter_mut() {
        if is_touching(spring, projectile, epsilon) {
            push_outside(spring, projectile, epsilon);
        }
    }

    // Force accumulation, then projectile integration
    let force = add_forces(field, projectile, epsilon);
    projectile.update(force, dt);

    // Springs relax under the reaction of the force they last exerted,
    // touching or not
    for spring in field.iter_mut() {
        let reaction = -spring.force();
        spring.update(reaction, dt);
    }
}
