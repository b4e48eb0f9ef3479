use super::constants::*;
use glam::{EulerRot, Mat4, Vec3};
use rand::Rng;

/// Tunables the controller is built with.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneParams {
    pub particle_count: usize,
    pub particle_spread: f32,
    pub particle_spin: Vec3,
    pub torus_spin: Vec3,
    pub camera_ease: f32,
    pub resize_debounce_ms: u32,
    pub visibility_threshold: f64,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            particle_spread: PARTICLE_SPREAD,
            particle_spin: PARTICLE_SPIN,
            torus_spin: TORUS_SPIN,
            camera_ease: CAMERA_EASE,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            visibility_threshold: VISIBILITY_THRESHOLD,
        }
    }
}

/// Static point positions with a mutable whole-cloud rotation.
#[derive(Clone, Debug)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub rotation: Vec3,
}

impl PointCloud {
    /// Sample `count` points uniformly in a cube of side `spread` centered at origin.
    pub fn scatter<R: Rng + ?Sized>(count: usize, spread: f32, rng: &mut R) -> Self {
        let mut coord = || (rng.gen::<f32>() - 0.5) * spread;
        let positions = (0..count)
            .map(|_| {
                let x = coord();
                let y = coord();
                let z = coord();
                Vec3::new(x, y, z)
            })
            .collect();
        Self {
            positions,
            rotation: Vec3::ZERO,
        }
    }

    pub fn model(&self) -> Mat4 {
        rotation_matrix(self.rotation)
    }
}

/// Torus vertices plus a line list covering every triangle edge once.
#[derive(Clone, Debug)]
pub struct TorusGeometry {
    pub vertices: Vec<Vec3>,
    pub line_indices: Vec<u32>,
}

impl TorusGeometry {
    pub fn new(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial = radial_segments.max(2);
        let tubular = tubular_segments.max(3);
        let tau = std::f32::consts::TAU;

        let mut vertices = Vec::with_capacity(((radial + 1) * (tubular + 1)) as usize);
        for j in 0..=radial {
            let v = j as f32 / radial as f32 * tau;
            for i in 0..=tubular {
                let u = i as f32 / tubular as f32 * tau;
                let ring = radius + tube * v.cos();
                vertices.push(Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin()));
            }
        }

        let idx = |j: u32, i: u32| j * (tubular + 1) + i;
        let mut line_indices =
            Vec::with_capacity(((3 * radial * tubular + radial + tubular) * 2) as usize);
        for j in 1..=radial {
            for i in 1..=tubular {
                let a = idx(j, i - 1);
                let b = idx(j - 1, i - 1);
                let c = idx(j - 1, i);
                let d = idx(j, i);
                line_indices.extend_from_slice(&[a, d, c, d, b, d]);
                // Leading edges are shared with a neighbour quad except on the first row/column
                if i == 1 {
                    line_indices.extend_from_slice(&[a, b]);
                }
                if j == 1 {
                    line_indices.extend_from_slice(&[b, c]);
                }
            }
        }

        Self {
            vertices,
            line_indices,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Torus {
    pub geometry: TorusGeometry,
    pub rotation: Vec3,
}

impl Torus {
    pub fn new(geometry: TorusGeometry) -> Self {
        Self {
            geometry,
            rotation: Vec3::ZERO,
        }
    }

    pub fn model(&self) -> Mat4 {
        rotation_matrix(self.rotation)
    }
}

/// The two decorative entities. Either may be absent; frame steps skip what is missing.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    pub points: Option<PointCloud>,
    pub torus: Option<Torus>,
}

impl SceneGraph {
    pub fn build<R: Rng + ?Sized>(params: &SceneParams, rng: &mut R) -> Self {
        let points = PointCloud::scatter(params.particle_count, params.particle_spread, rng);
        let torus = Torus::new(TorusGeometry::new(
            TORUS_RADIUS,
            TORUS_TUBE,
            TORUS_RADIAL_SEGMENTS,
            TORUS_TUBULAR_SEGMENTS,
        ));
        Self {
            points: Some(points),
            torus: Some(torus),
        }
    }

    pub fn spin_points(&mut self, step: Vec3) {
        if let Some(points) = &mut self.points {
            points.rotation += step;
        }
    }

    pub fn spin_torus(&mut self, step: Vec3) {
        if let Some(torus) = &mut self.torus {
            torus.rotation += step;
        }
    }
}

/// Rotation in X, then Y, then Z intrinsic order.
#[inline]
pub fn rotation_matrix(rotation: Vec3) -> Mat4 {
    Mat4::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z)
}
