//! Math utilities and types
//!
//! Provides fundamental math types for scene transforms and physics queries.

pub use nalgebra::{
    Vector3,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Combine this transform with another
    ///
    /// `self` is treated as the parent frame, `other` as a pose local to it.
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> Transform {
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        let inv_rotation = self.rotation.inverse();
        let inv_position = inv_rotation * (-self.position.component_mul(&inv_scale));

        Transform {
            position: inv_position,
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Rotation helpers using the Euler conventions of the scene format
pub mod euler {
    use super::{Quat, Vec3};

    /// Rotation from intrinsic X, then Y, then Z angles (radians)
    ///
    /// This is the order scene descriptions use for `rotation: [x, y, z]`.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Quat {
        Quat::from_axis_angle(&Vec3::x_axis(), x)
            * Quat::from_axis_angle(&Vec3::y_axis(), y)
            * Quat::from_axis_angle(&Vec3::z_axis(), z)
    }

    /// Rotation from yaw about Y, then pitch about X, then roll about Z
    ///
    /// First-person orientation: yaw never tilts the horizon.
    pub fn from_yxz(pitch: f32, yaw: f32, roll: f32) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), yaw)
            * Quat::from_axis_angle(&Vec3::x_axis(), pitch)
            * Quat::from_axis_angle(&Vec3::z_axis(), roll)
    }

    /// Rotate a vector about the vertical axis
    pub fn rotate_about_y(vector: &Vec3, angle: f32) -> Vec3 {
        Quat::from_axis_angle(&Vec3::y_axis(), angle) * *vector
    }
}
