//! 3D physics world using Rapier3D

use rapier3d::prelude::*;
use slotmap::SlotMap;
use std::collections::HashMap;

use super::{BodyType, ColliderOptions, PhysicsBackend, PhysicsError, Ray as WorldRay, RayHit, RigidBodyOptions};
use crate::core::PhysicsOptions;
use crate::foundation::collections::BodyHandle;
use crate::foundation::math::{Quat, Transform, Vec3};

/// Manages the Rapier3D physics world of one scene
pub struct RapierPhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    query_pipeline: QueryPipeline,
    ccd_solver: CCDSolver,
    handles: SlotMap<BodyHandle, RigidBodyHandle>,
    owners: HashMap<RigidBodyHandle, BodyHandle>,
}

impl RapierPhysicsWorld {
    /// Create an empty world with the configured gravity
    pub fn new(options: &PhysicsOptions) -> Self {
        let [x, y, z] = options.gravity;
        Self {
            gravity: vector![x, y, z],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            ccd_solver: CCDSolver::new(),
            handles: SlotMap::with_key(),
            owners: HashMap::new(),
        }
    }

    /// Gravity acceleration
    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.handles.get(handle).and_then(|h| self.bodies.get(*h))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        self.handles
            .get(handle)
            .and_then(|h| self.bodies.get_mut(*h))
            .ok_or(PhysicsError::UnknownBody(handle))
    }
}

impl Default for RapierPhysicsWorld {
    fn default() -> Self {
        Self::new(&PhysicsOptions::default())
    }
}

fn body_builder(body_type: BodyType) -> RigidBodyBuilder {
    match body_type {
        BodyType::Dynamic => RigidBodyBuilder::dynamic(),
        BodyType::Fixed => RigidBodyBuilder::fixed(),
        BodyType::KinematicPositionBased => RigidBodyBuilder::kinematic_position_based(),
        BodyType::KinematicVelocityBased => RigidBodyBuilder::kinematic_velocity_based(),
    }
}

fn collider_builder(options: &ColliderOptions) -> ColliderBuilder {
    match *options {
        ColliderOptions::Capsule { half_height, radius, density } => {
            ColliderBuilder::capsule_y(half_height, radius).density(density)
        }
        ColliderOptions::Cuboid { half_extents: [hx, hy, hz], density } => {
            ColliderBuilder::cuboid(hx, hy, hz).density(density)
        }
        ColliderOptions::Ball { radius, density } => ColliderBuilder::ball(radius).density(density),
    }
}

impl PhysicsBackend for RapierPhysicsWorld {
    fn create_rigid_body(
        &mut self,
        options: &RigidBodyOptions,
        transform: &Transform,
    ) -> Result<BodyHandle, PhysicsError> {
        for collider in options.colliders() {
            collider.validate()?;
        }

        let rotations = options.enabled_rotations();
        let pose = Isometry::from_parts(transform.position.into(), transform.rotation);
        let body = body_builder(options.body_type())
            .position(pose)
            .enabled_rotations(rotations.x, rotations.y, rotations.z)
            .build();

        let rapier_handle = self.bodies.insert(body);
        for collider in options.colliders() {
            self.colliders
                .insert_with_parent(collider_builder(collider).build(), rapier_handle, &mut self.bodies);
        }

        let handle = self.handles.insert(rapier_handle);
        self.owners.insert(rapier_handle, handle);
        log::debug!(
            "RapierPhysicsWorld: created {:?} body with {} collider(s)",
            options.body_type(),
            options.colliders().len()
        );
        Ok(handle)
    }

    fn remove_rigid_body(&mut self, handle: BodyHandle) -> bool {
        let Some(rapier_handle) = self.handles.remove(handle) else {
            return false;
        };
        self.owners.remove(&rapier_handle);
        self.bodies
            .remove(
                rapier_handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.set_rotation(rotation, true);
        Ok(())
    }

    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(handle)?.apply_impulse(impulse, true);
        Ok(())
    }

    fn translation(&self, handle: BodyHandle) -> Option<Vec3> {
        self.body(handle).map(|body| *body.translation())
    }

    fn rotation(&self, handle: BodyHandle) -> Option<Quat> {
        self.body(handle).map(|body| *body.rotation())
    }

    fn linvel(&self, handle: BodyHandle) -> Option<Vec3> {
        self.body(handle).map(|body| *body.linvel())
    }

    fn cast_ray(&self, ray: &WorldRay, max_toi: f32, solid: bool) -> Option<RayHit> {
        let rapier_ray = Ray::new(ray.origin.into(), ray.direction);
        let (collider_handle, time_of_impact) = self.query_pipeline.cast_ray(
            &self.bodies,
            &self.colliders,
            &rapier_ray,
            max_toi,
            solid,
            QueryFilter::default(),
        )?;

        let body = self
            .colliders
            .get(collider_handle)
            .and_then(Collider::parent)
            .and_then(|parent| self.owners.get(&parent).copied());

        Some(RayHit {
            body,
            time_of_impact,
            point: ray.point_at(time_of_impact),
        })
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn body_count(&self) -> usize {
        self.handles.len()
    }
}
