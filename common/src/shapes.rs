use crate::collision_detection;
use rand::Rng;
use std::f32::consts::PI;
use std::fmt::Debug;

/// Half of `sqrt(2)`, truncated so an inscribed square stays strictly inside its circle.
pub const HALF_SQRT2: f32 = 0.7071;

/// A query shape as seen by the grid traversal.
///
/// `safe_circle` must describe a disc that lies entirely inside the shape:
/// any entity whose center falls inside that disc is accepted without
/// calling `overlaps_circle`.
pub trait Shape: Debug {
    fn bounding_box(&self) -> Aabb;
    fn safe_circle(&self) -> Option<Circle>;
    fn overlaps_circle(&self, x: f32, z: f32, radius: f32) -> bool;

    /// Upper bound, in entity radii, on how far outside `bounding_box` the
    /// center of an accepted entity may lie.
    fn reach(&self) -> u32 {
        1
    }
}

/// Axis-aligned box in world coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min_x: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_z: f32,
}

impl Aabb {
    pub fn new(min_x: f32, min_z: f32, max_x: f32, max_z: f32) -> Self {
        Self {
            min_x,
            min_z,
            max_x,
            max_z,
        }
    }

    pub fn from_point(x: f32, z: f32) -> Self {
        Self::new(x, z, x, z)
    }

    pub fn around(x: f32, z: f32, half_x: f32, half_z: f32) -> Self {
        Self::new(x - half_x, z - half_z, x + half_x, z + half_z)
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_z - self.min_z
    }

    pub fn is_finite(&self) -> bool {
        self.min_x.is_finite()
            && self.min_z.is_finite()
            && self.max_x.is_finite()
            && self.max_z.is_finite()
    }

    pub fn contains_point(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    pub fn expand_to_include(&mut self, x: f32, z: f32) {
        self.min_x = self.min_x.min(x);
        self.min_z = self.min_z.min(z);
        self.max_x = self.max_x.max(x);
        self.max_z = self.max_z.max(z);
    }

    pub fn random_point_inside<R: Rng>(&self, margin: f32, rng: &mut R) -> (f32, f32) {
        (
            safe_randf32(rng, self.min_x + margin, self.max_x - margin),
            safe_randf32(rng, self.min_z + margin, self.max_z - margin),
        )
    }
}

fn safe_randf32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..max)
}

/// Scales `(dir_x, dir_z)` to unit length. Zero vectors are returned untouched.
pub fn normalize(dir_x: f32, dir_z: f32) -> (f32, f32) {
    let len = (dir_x * dir_x + dir_z * dir_z).sqrt();
    if len > 0.0 && len != 1.0 {
        (dir_x / len, dir_z / len)
    } else {
        (dir_x, dir_z)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, z: f32, radius: f32) -> Self {
        Self { x, z, radius }
    }
}

impl Shape for Circle {
    fn bounding_box(&self) -> Aabb {
        Aabb::around(self.x, self.z, self.radius, self.radius)
    }

    fn safe_circle(&self) -> Option<Circle> {
        (self.radius > 0.0).then_some(*self)
    }

    fn overlaps_circle(&self, x: f32, z: f32, radius: f32) -> bool {
        collision_detection::circle_circle(self.x, self.z, self.radius, x, z, radius)
    }
}

/// Rectangle centered on `(x, z)`. `half_height` runs along the facing
/// direction, `half_width` across it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrientedRect {
    pub x: f32,
    pub z: f32,
    pub dir_x: f32,
    pub dir_z: f32,
    pub half_width: f32,
    pub half_height: f32,
}

impl OrientedRect {
    pub fn new(x: f32, z: f32, dir_x: f32, dir_z: f32, half_width: f32, half_height: f32) -> Self {
        let (dir_x, dir_z) = normalize(dir_x, dir_z);
        Self {
            x,
            z,
            dir_x,
            dir_z,
            half_width,
            half_height,
        }
    }

    /// Corners in order: front-left, front-right, back-left, back-right.
    pub fn corners(&self) -> [(f32, f32); 4] {
        let front_x = self.dir_x * self.half_height;
        let front_z = self.dir_z * self.half_height;
        let left_x = -self.dir_z * self.half_width;
        let left_z = self.dir_x * self.half_width;
        [
            (self.x + front_x + left_x, self.z + front_z + left_z),
            (self.x + front_x - left_x, self.z + front_z - left_z),
            (self.x - front_x + left_x, self.z - front_z + left_z),
            (self.x - front_x - left_x, self.z - front_z - left_z),
        ]
    }
}

impl Shape for OrientedRect {
    fn bounding_box(&self) -> Aabb {
        let half_x = self.dir_x.abs() * self.half_height + self.dir_z.abs() * self.half_width;
        let half_z = self.dir_z.abs() * self.half_height + self.dir_x.abs() * self.half_width;
        Aabb::around(self.x, self.z, half_x, half_z)
    }

    fn safe_circle(&self) -> Option<Circle> {
        let radius = self.half_width.min(self.half_height);
        (radius > 0.0).then(|| Circle::new(self.x, self.z, radius))
    }

    fn overlaps_circle(&self, x: f32, z: f32, radius: f32) -> bool {
        collision_detection::circle_rect(self, x, z, radius)
    }
}

/// Circular sector with its apex at `(x, z)`, opening `half_angle` radians
/// to either side of the facing direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sector {
    pub x: f32,
    pub z: f32,
    pub dir_x: f32,
    pub dir_z: f32,
    pub half_angle: f32,
    pub radius: f32,
    cos_half: f32,
    sin_half: f32,
}

impl Sector {
    pub fn new(x: f32, z: f32, dir_x: f32, dir_z: f32, half_angle: f32, radius: f32) -> Self {
        let (dir_x, dir_z) = normalize(dir_x, dir_z);
        let half_angle = half_angle.clamp(0.0, PI);
        let (sin_half, cos_half) = half_angle.sin_cos();
        Self {
            x,
            z,
            dir_x,
            dir_z,
            half_angle,
            radius,
            cos_half,
            sin_half,
        }
    }

    /// `angle_degrees` is the full opening angle of the sector.
    pub fn from_degrees(
        x: f32,
        z: f32,
        dir_x: f32,
        dir_z: f32,
        angle_degrees: f32,
        radius: f32,
    ) -> Self {
        let half_angle = if angle_degrees >= 360.0 {
            PI
        } else {
            (angle_degrees.max(0.0) * 0.5).to_radians()
        };
        Self::new(x, z, dir_x, dir_z, half_angle, radius)
    }

    pub fn cos_half(&self) -> f32 {
        self.cos_half
    }

    pub fn sin_half(&self) -> f32 {
        self.sin_half
    }

    pub fn is_full_circle(&self) -> bool {
        self.half_angle >= PI
    }

    /// End points of the two straight edges.
    pub fn edge_points(&self) -> [(f32, f32); 2] {
        let (c, s) = (self.cos_half, self.sin_half);
        let left = (self.dir_x * c - self.dir_z * s, self.dir_x * s + self.dir_z * c);
        let right = (self.dir_x * c + self.dir_z * s, -self.dir_x * s + self.dir_z * c);
        [
            (self.x + left.0 * self.radius, self.z + left.1 * self.radius),
            (self.x + right.0 * self.radius, self.z + right.1 * self.radius),
        ]
    }
}

impl Shape for Sector {
    fn bounding_box(&self) -> Aabb {
        if self.is_full_circle() {
            return Aabb::around(self.x, self.z, self.radius, self.radius);
        }
        let mut bounding_box = Aabb::from_point(self.x, self.z);
        for (x, z) in self.edge_points() {
            bounding_box.expand_to_include(x, z);
        }
        // An axis direction inside the angular span pushes the box out to the arc.
        for (axis_x, axis_z) in [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)] {
            let dot = axis_x * self.dir_x + axis_z * self.dir_z;
            if dot >= self.cos_half - 1e-6 {
                bounding_box
                    .expand_to_include(self.x + axis_x * self.radius, self.z + axis_z * self.radius);
            }
        }
        bounding_box
    }

    fn safe_circle(&self) -> Option<Circle> {
        if !(self.radius > 0.0) || self.half_angle <= 0.0 {
            return None;
        }
        if self.half_angle < PI * 0.5 {
            let distance = self.radius / (1.0 + self.sin_half);
            Some(Circle::new(
                self.x + self.dir_x * distance,
                self.z + self.dir_z * distance,
                distance * self.sin_half,
            ))
        } else {
            let distance = self.radius * 0.5;
            Some(Circle::new(
                self.x + self.dir_x * distance,
                self.z + self.dir_z * distance,
                distance,
            ))
        }
    }

    fn overlaps_circle(&self, x: f32, z: f32, radius: f32) -> bool {
        collision_detection::circle_sector(self, x, z, radius)
    }

    // The pulled-back apex lets accepted centers drift past the box by up
    // to about 1.3 radii.
    fn reach(&self) -> u32 {
        if self.is_full_circle() {
            1
        } else {
            2
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeEnum {
    Circle(Circle),
    Rect(OrientedRect),
    Sector(Sector),
}

impl Shape for ShapeEnum {
    fn bounding_box(&self) -> Aabb {
        match self {
            ShapeEnum::Circle(circle) => circle.bounding_box(),
            ShapeEnum::Rect(rect) => rect.bounding_box(),
            ShapeEnum::Sector(sector) => sector.bounding_box(),
        }
    }

    fn safe_circle(&self) -> Option<Circle> {
        match self {
            ShapeEnum::Circle(circle) => circle.safe_circle(),
            ShapeEnum::Rect(rect) => rect.safe_circle(),
            ShapeEnum::Sector(sector) => sector.safe_circle(),
        }
    }

    fn overlaps_circle(&self, x: f32, z: f32, radius: f32) -> bool {
        match self {
            ShapeEnum::Circle(circle) => circle.overlaps_circle(x, z, radius),
            ShapeEnum::Rect(rect) => rect.overlaps_circle(x, z, radius),
            ShapeEnum::Sector(sector) => sector.overlaps_circle(x, z, radius),
        }
    }

    fn reach(&self) -> u32 {
        match self {
            ShapeEnum::Circle(circle) => circle.reach(),
            ShapeEnum::Rect(rect) => rect.reach(),
            ShapeEnum::Sector(sector) => sector.reach(),
        }
    }
}
