//! Physics module
//!
//! Game objects never talk to a physics engine directly. They hold a
//! [`BodyHandle`] and go through the [`PhysicsBackend`] command/query surface,
//! implemented for rapier by [`RapierPhysicsWorld`].
//!
//! Rigid bodies are described declaratively by [`RigidBodyOptions`], which is
//! what a scene description's `rigidBody` entry deserializes into.

pub mod rapier_world;

pub use rapier_world::RapierPhysicsWorld;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::collections::BodyHandle;
use crate::foundation::math::{Quat, Transform, Vec3};

/// Command and query surface of a physics world
pub trait PhysicsBackend {
    /// Create a rigid body and its colliders, posed at `transform`
    fn create_rigid_body(
        &mut self,
        options: &RigidBodyOptions,
        transform: &Transform,
    ) -> Result<BodyHandle, PhysicsError>;

    /// Remove a body and every collider attached to it; returns whether it existed
    fn remove_rigid_body(&mut self, handle: BodyHandle) -> bool;

    /// Teleport the body's orientation
    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) -> Result<(), PhysicsError>;

    /// Apply an instantaneous velocity-changing impulse at the center of mass
    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> Result<(), PhysicsError>;

    /// Current position of the body
    fn translation(&self, handle: BodyHandle) -> Option<Vec3>;

    /// Current orientation of the body
    fn rotation(&self, handle: BodyHandle) -> Option<Quat>;

    /// Current linear velocity of the body
    fn linvel(&self, handle: BodyHandle) -> Option<Vec3>;

    /// Cast a ray against every collider as of the last completed step
    ///
    /// `max_toi` is measured in multiples of the ray direction's length. With
    /// `solid` set, a ray starting inside a collider hits it at time zero.
    fn cast_ray(&self, ray: &Ray, max_toi: f32, solid: bool) -> Option<RayHit>;

    /// Advance the simulation by `dt` seconds
    fn step(&mut self, dt: f32);

    /// Number of live bodies
    fn body_count(&self) -> usize;
}

/// A ray with an unnormalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// Direction; its length scales the time of impact
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point at time of impact `t`
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Body the hit collider is attached to, if any
    pub body: Option<BodyHandle>,
    /// Time of impact in multiples of the ray direction
    pub time_of_impact: f32,
    /// The point of intersection in world space
    pub point: Vec3,
}

/// How the simulation treats a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyType {
    /// Moved by forces, impulses, and contacts
    Dynamic,
    /// Never moves
    Fixed,
    /// Moved by setting its next position
    KinematicPositionBased,
    /// Moved by setting its velocity
    KinematicVelocityBased,
}

/// Per-axis rotation locks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledRotations {
    /// Rotation about X (pitch)
    pub x: bool,
    /// Rotation about Y (yaw)
    pub y: bool,
    /// Rotation about Z (roll)
    pub z: bool,
}

impl EnabledRotations {
    /// Only yaw is simulated
    pub const YAW_ONLY: Self = Self { x: false, y: true, z: false };
}

impl Default for EnabledRotations {
    fn default() -> Self {
        Self { x: true, y: true, z: true }
    }
}

/// Collider shape attached to a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum ColliderOptions {
    /// Capsule aligned with the Y axis
    #[serde(rename_all = "camelCase")]
    Capsule {
        /// Half the length of the cylindrical segment
        half_height: f32,
        /// Radius of the hemispherical caps
        radius: f32,
        /// Mass density
        density: f32,
    },
    /// Box
    #[serde(rename_all = "camelCase")]
    Cuboid {
        /// Half extents along X, Y, Z
        half_extents: [f32; 3],
        /// Mass density
        density: f32,
    },
    /// Sphere
    Ball {
        /// Radius
        radius: f32,
        /// Mass density
        density: f32,
    },
}

impl ColliderOptions {
    /// Check that every dimension is finite and positive
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let (dimensions, density): (Vec<f32>, f32) = match *self {
            Self::Capsule { half_height, radius, density } => (vec![half_height, radius], density),
            Self::Cuboid { half_extents, density } => (half_extents.to_vec(), density),
            Self::Ball { radius, density } => (vec![radius], density),
        };

        if dimensions.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return Err(PhysicsError::InvalidCollider(format!("non-positive dimensions in {:?}", self)));
        }
        if !density.is_finite() || density < 0.0 {
            return Err(PhysicsError::InvalidCollider(format!("invalid density {}", density)));
        }
        Ok(())
    }
}

/// Declarative description of a rigid body
///
/// Every field is optional so that caller options can be layered over
/// defaults with [`RigidBodyOptions::merged_over`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RigidBodyOptions {
    /// Body type; dynamic when unset
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub body_type: Option<BodyType>,
    /// Attached colliders; none when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colliders: Option<Vec<ColliderOptions>>,
    /// Rotation locks; all axes free when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_rotations: Option<EnabledRotations>,
}

impl RigidBodyOptions {
    /// Layer `self` over `defaults`: fields set here win, unset fields come from `defaults`
    pub fn merged_over(self, defaults: Self) -> Self {
        Self {
            body_type: self.body_type.or(defaults.body_type),
            colliders: self.colliders.or(defaults.colliders),
            enabled_rotations: self.enabled_rotations.or(defaults.enabled_rotations),
        }
    }

    /// Body type with the default applied
    pub fn body_type(&self) -> BodyType {
        self.body_type.unwrap_or(BodyType::Dynamic)
    }

    /// Colliders with the default applied
    pub fn colliders(&self) -> &[ColliderOptions] {
        self.colliders.as_deref().unwrap_or(&[])
    }

    /// Rotation locks with the default applied
    pub fn enabled_rotations(&self) -> EnabledRotations {
        self.enabled_rotations.unwrap_or_default()
    }
}

/// Physics errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Collider geometry the engine cannot build
    #[error("Invalid collider: {0}")]
    InvalidCollider(String),

    /// Handle does not name a live body
    #[error("Unknown rigid body {0:?}")]
    UnknownBody(BodyHandle),
}
