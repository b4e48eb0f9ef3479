use glam::Vec3;

// Shared scene tuning constants. Visual values are taste, not contracts.

// Particle field
pub const PARTICLE_COUNT: usize = 800;
pub const PARTICLE_SPREAD: f32 = 10.0; // side of the sampling cube centered at origin
pub const PARTICLE_SIZE: f32 = 0.025; // world-space sprite size
pub const PARTICLE_COLOR: [f32; 4] = [0.831, 0.686, 0.216, 0.6]; // #d4af37 @ 0.6

// Wireframe torus
pub const TORUS_RADIUS: f32 = 1.5;
pub const TORUS_TUBE: f32 = 0.3;
pub const TORUS_RADIAL_SEGMENTS: u32 = 16;
pub const TORUS_TUBULAR_SEGMENTS: u32 = 100;
pub const TORUS_COLOR: [f32; 4] = [0.753, 0.753, 0.753, 0.25]; // #c0c0c0 @ 0.25

// Per-frame rotation increments (radians)
pub const PARTICLE_SPIN: Vec3 = Vec3::new(0.0003, 0.0006, 0.0);
pub const TORUS_SPIN: Vec3 = Vec3::new(0.006, 0.003, 0.006);

// Camera
pub const CAMERA_FOV_Y_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_Z: f32 = 5.0;
pub const CAMERA_EASE: f32 = 0.03; // fraction of the remaining distance covered per frame

// Surface
pub const MAX_PIXEL_RATIO: f64 = 1.5;
pub const ANTIALIAS_MAX_DEVICE_RATIO: f64 = 2.0; // MSAA only at or below this density

// Lifecycle
pub const RESIZE_DEBOUNCE_MS: u32 = 150;
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

// Page interactions
pub const CURSOR_FOLLOW_EASE: f64 = 0.2;
pub const NAV_ACTIVE_OFFSET_PX: f64 = 200.0;
pub const NAV_SCROLL_OFFSET_PX: f64 = 70.0;
pub const PARALLAX_SPEED: f64 = 0.3;
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;
pub const SKILL_FILL_DELAY_MS: i32 = 200;
pub const FORM_SENDING_MS: i32 = 1500;
pub const FORM_SENT_MS: i32 = 2000;
