//! Orbit camera for product viewing.

use glam::{Mat4, Vec3};

/// A turntable camera orbiting the displayed stone piece.
///
/// The camera always looks at `target`; interaction moves it on a sphere
/// around that point. Polar angle and distance are clamped so the user can
/// never flip over the pole or clip through the product.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Closest allowed orbit distance.
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    pub max_distance: f32,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 1.2, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_4, // 45 degrees
            aspect_ratio,
            near: 0.01,
            far: 1000.0,
            min_distance: 0.1,
            max_distance: 100.0,
        }
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Returns the camera's right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    /// Orbits the camera around the target.
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        let radius = (self.position - self.target).length();
        let mut theta = (self.position.x - self.target.x).atan2(self.position.z - self.target.z);
        let mut phi = ((self.position.y - self.target.y) / radius).acos();

        theta -= delta_x;
        phi = (phi - delta_y).clamp(0.01, std::f32::consts::PI - 0.01);

        self.position = self.target
            + Vec3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Pans the camera parallel to the view plane.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let right = self.right();
        let up = self.up;
        let offset = right * delta_x + up * delta_y;
        self.position += offset;
        self.target += offset;
    }

    /// Zooms by moving toward or away from the target, clamped to the
    /// configured distance range.
    pub fn zoom(&mut self, delta: f32) {
        let direction = self.forward();
        let distance = (self.position - self.target).length();
        let new_distance = (distance - delta).clamp(self.min_distance, self.max_distance);
        self.position = self.target - direction * new_distance;
    }

    /// Frames the given bounding box: centers the target on it and backs
    /// the camera off far enough to see the whole piece.
    pub fn look_at_box(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let size = (max - min).length().max(0.001);

        self.target = center;
        self.position = center + Vec3::new(0.0, size * 0.5, size * 1.4);
        self.near = (size * 0.001).max(0.001);
        self.far = size * 100.0;
        self.min_distance = size * 0.2;
        self.max_distance = size * 10.0;
    }

    /// Sets the field of view in radians.
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov.clamp(0.1, std::f32::consts::PI - 0.1);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::default();
        assert_eq!(camera.target, Vec3::ZERO);
        assert_eq!(camera.up, Vec3::Y);
        assert!(camera.min_distance < camera.max_distance);
    }

    #[test]
    fn test_orbit_preserves_radius() {
        let mut camera = Camera::new(1.0);
        let radius = (camera.position - camera.target).length();
        camera.orbit(0.3, 0.2);
        let new_radius = (camera.position - camera.target).length();
        assert!((radius - new_radius).abs() < 1e-4);
    }

    #[test]
    fn test_orbit_never_flips_over_pole() {
        let mut camera = Camera::new(1.0);
        for _ in 0..100 {
            camera.orbit(0.0, 0.5);
        }
        // The camera stays on the positive side of the up axis.
        let phi = ((camera.position.y - camera.target.y)
            / (camera.position - camera.target).length())
        .acos();
        assert!(phi >= 0.005);
    }

    #[test]
    fn test_zoom_clamped_to_distance_range() {
        let mut camera = Camera::new(1.0);
        camera.zoom(1000.0);
        let distance = (camera.position - camera.target).length();
        assert!((distance - camera.min_distance).abs() < 1e-3);

        camera.zoom(-1000.0);
        let distance = (camera.position - camera.target).length();
        assert!((distance - camera.max_distance).abs() < 1e-2);
    }

    #[test]
    fn test_pan_moves_target_with_position() {
        let mut camera = Camera::new(1.0);
        let offset_before = camera.position - camera.target;
        camera.pan(0.5, -0.3);
        let offset_after = camera.position - camera.target;
        assert!((offset_before - offset_after).length() < 1e-5);
    }

    #[test]
    fn test_look_at_box_centers_target() {
        let mut camera = Camera::new(1.0);
        camera.look_at_box(Vec3::new(-1.0, 0.0, -0.5), Vec3::new(1.0, 0.2, 0.5));
        assert!((camera.target - Vec3::new(0.0, 0.1, 0.0)).length() < 1e-5);
        assert!(camera.position.z > camera.target.z);
    }

    #[test]
    fn test_set_fov_clamping() {
        let mut camera = Camera::new(1.0);
        camera.set_fov(0.0);
        assert!(camera.fov >= 0.1);
        camera.set_fov(std::f32::consts::PI);
        assert!(camera.fov < std::f32::consts::PI);
    }
}
