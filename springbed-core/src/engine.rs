use glam::DVec2;

/// A single 1-D oscillator anchored on the surface line `y = 0`
#[derive(Debug, Clone)]
pub struct Spring {
    anchor_x: f64,
    /// Tip offset from the rest position `(anchor_x, 0)`
    pub displacement: DVec2,
    pub velocity: DVec2,
    pub k: f64,
    pub m: f64,
    /// Contact force this spring last exerted on the projectile
    pub force: DVec2,
}

impl Spring {
    pub fn new(anchor_x: f64, k: f64, m: f64) -> Self {
        Self {
            anchor_x,
            displacement: DVec2::ZERO,
            velocity: DVec2::ZERO,
            k,
            m,
            force: DVec2::ZERO,
        }
    }

    pub fn anchor_x(&self) -> f64 {
        self.anchor_x
    }

    /// Current world-space position of the spring tip
    pub fn tip(&self) -> DVec2 {
        DVec2::new(self.anchor_x + self.displacement.x, self.displacement.y)
    }

    /// Move the tip to a world-space position, keeping the anchor fixed
    pub fn set_tip(&mut self, tip: DVec2) {
        self.displacement = DVec2::new(tip.x - self.anchor_x, tip.y);
    }

    /// Elastic force pulling the tip back towards rest
    pub fn elastic_force(&self) -> DVec2 {
        -self.k * self.displacement
    }

    /// Advance one step under `applied` plus the spring's own elastic force
    /// (semi-implicit Euler: v += a*dt, then x += v*dt)
    pub fn update(&mut self, applied: DVec2, dt: f64) {
        let accel = (applied + self.elastic_force()) / self.m;
        self.velocity += accel * dt;
        self.displacement += self.velocity * dt;
    }

    pub fn force(&self) -> DVec2 {
        self.force
    }

    pub fn get_f_x(&self) -> f64 {
        self.force.x
    }

    pub fn get_f_y(&self) -> f64 {
        self.force.y
    }

    pub fn is_finite(&self) -> bool {
        self.displacement.is_finite() && self.velocity.is_finite() && self.force.is_finite()
    }
}

/// A rigid circular body falling onto the spring field
#[derive(Debug, Clone)]
pub struct Projectile {
    pub mass: f64,
    pub radius: f64,
    pub pos: DVec2,
    pub vel: DVec2,
}

impl Projectile {
    pub fn new(mass: f64, vel: DVec2, pos: DVec2, radius: f64) -> Self {
        Self {
            mass,
            radius,
            pos,
            vel,
        }
    }

    /// Apply the net force for one step (semi-implicit Euler, velocity first)
    pub fn update(&mut self, force: DVec2, dt: f64) {
        self.vel += force / self.mass * dt;
        self.pos += self.vel * dt;
    }

    /// Kinetic energy, ½·M·|v|²
    pub fn energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// Springs spaced `dx` apart from `x = 0`, ordered left to right
#[derive(Debug, Clone, Default)]
pub struct SpringField {
    springs: Vec<Spring>,
}

impl SpringField {
    pub fn new(count: usize, dx: f64, k: f64, m: f64) -> Self {
        let springs = (0..count)
            .map(|i| Spring::new(i as f64 * dx, k, m))
            .collect();
        Self { springs }
    }

    pub fn len(&self) -> usize {
        self.springs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spring> {
        self.springs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Spring> {
        self.springs.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Spring> {
        self.springs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Spring> {
        self.springs.get_mut(index)
    }
}

/// Everything one run owns: the spring field and the projectile
#[derive(Debug, Clone)]
pub struct World {
    pub field: SpringField,
    pub projectile: Projectile,
}

impl World {
    pub fn new(field: SpringField, projectile: Projectile) -> Self {
        Self { field, projectile }
    }

    pub fn is_finite(&self) -> bool {
        self.projectile.is_finite() && self.field.iter().all(Spring::is_finite)
    }
}
