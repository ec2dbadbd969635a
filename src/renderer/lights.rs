use glam::{Mat4, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum LightKind {
    Point = 0,
    Directional = 1,
    Spot = 2,
}

impl LightKind {
    pub fn tag(self) -> f32 {
        self as u32 as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
    pub falloff: f32,
    pub inner_angle: f32,
    pub outer_angle: f32,
}

impl Light {
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            position: Vec3::ZERO,
            direction: direction.normalize_or_zero(),
            color,
            intensity,
            range: f32::INFINITY,
            falloff: 0.0,
            inner_angle: 0.0,
            outer_angle: 0.0,
        }
    }

    pub fn point(position: Vec3, color: Vec3, intensity: f32, range: f32) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            direction: Vec3::NEG_Y,
            color,
            intensity,
            range,
            falloff: 1.0,
            inner_angle: 0.0,
            outer_angle: 0.0,
        }
    }

    pub fn spot(
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        intensity: f32,
        range: f32,
        inner_angle: f32,
        outer_angle: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot,
            position,
            direction: direction.normalize_or_zero(),
            color,
            intensity,
            range,
            falloff: 1.0,
            inner_angle,
            outer_angle,
        }
    }

    /// Packs the light into a matrix so it can travel through the same
    /// uniform channel as transforms.
    ///
    /// Columns: `(kind, intensity, range, falloff)`, `(color, 1)`,
    /// `(position, cos inner)`, `(direction, cos outer)`.
    pub fn packed(&self) -> Mat4 {
        let mut inner = self.inner_angle;
        let mut outer = self.outer_angle;
        if inner > outer {
            std::mem::swap(&mut inner, &mut outer);
        }
        let range = if self.range.is_finite() { self.range } else { f32::MAX };

        Mat4::from_cols(
            Vec4::new(self.kind.tag(), self.intensity, range, self.falloff),
            self.color.extend(1.0),
            self.position.extend(inner.cos()),
            self.direction.extend(outer.cos()),
        )
    }
}

/// Packs up to `max` lights, in insertion order, for a uniform upload.
pub fn pack_lights(lights: &[Light], max: usize) -> Vec<[[f32; 4]; 4]> {
    lights
        .iter()
        .take(max)
        .map(|light| light.packed().to_cols_array_2d())
        .collect()
}
