//! Contact model between the projectile and individual spring tips
//!
//! A spring tip is a point. It touches the projectile when it lies within
//! `R + epsilon` of the projectile centre. Contact resolution runs in two
//! passes each step: `push_outside` removes penetration by moving the tip onto
//! the projectile boundary, then `add_forces` sums the normal forces of every
//! touching spring.

use crate::engine::{Projectile, Spring, SpringField};
use glam::DVec2;

/// Unit normal pointing from the spring tip towards the projectile centre,
/// together with the tip-to-centre distance.
///
/// A tip sitting exactly at the centre has no defined direction; the surface
/// lies below the projectile, so `+Y` is used.
pub fn contact_normal(spring: &Spring, projectile: &Projectile) -> (DVec2, f64) {
    let offset = projectile.pos - spring.tip();
    let distance = offset.length();
    let normal = offset.try_normalize().unwrap_or(DVec2::Y);
    (normal, distance)
}

/// Whether the spring tip lies within `R + epsilon` of the projectile centre
pub fn is_touching(spring: &Spring, projectile: &Projectile, epsilon: f64) -> bool {
    let distance = projectile.pos.distance(spring.tip());
    distance <= projectile.radius + epsilon
}

/// Move a penetrating spring tip back onto the projectile boundary.
///
/// Only positions change. The projectile stays where it is and no velocity is
/// touched. A tip already at or outside the boundary is left alone, so after
/// this call the tip sits at distance `>= R`, within `epsilon` of tangency when
/// it was touching.
pub fn push_outside(spring: &mut Spring, projectile: &Projectile, _epsilon: f64) {
    let (normal, distance) = contact_normal(spring, projectile);
    if distance < projectile.radius {
        spring.set_tip(projectile.pos - normal * projectile.radius);
    }
}

/// Normal force one spring exerts on the projectile.
///
/// The spring's elastic force is projected on the contact normal and clamped at
/// zero: a tip can push the projectile away but never pull it in.
pub fn contact_force(spring: &Spring, projectile: &Projectile) -> DVec2 {
    let (normal, _) = contact_normal(spring, projectile);
    let magnitude = spring.elastic_force().dot(normal).max(0.0);
    normal * magnitude
}

/// Recompute each spring's contact force and return the sum on the projectile.
///
/// Springs that are not touching have their stored force reset to zero, so the
/// relaxation phase sees no reaction from them.
pub fn add_forces(field: &mut SpringField, projectile: &Projectile, epsilon: f64) -> DVec2 {
    let mut total = DVec2::ZERO;
    for spring in field.iter_mut() {
        spring.force = if is_touching(spring, projectile, epsilon) {
            contact_force(spring, projectile)
        } else {
            DVec2::ZERO
        };
        total += spring.force;
    }
    total
}
