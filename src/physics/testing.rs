//! Recording physics world for unit tests
//!
//! No collision response. Dynamic bodies integrate velocity, kinematic
//! bodies jump to their targets on `step`, and the ray cast answers whatever
//! the test configured.

use std::cell::Cell;
use std::collections::BTreeMap;

use glam::{Quat, Vec3};

use super::{BodyDesc, BodyHandle, BodyKind, ColliderDesc, PhysicsWorld, Ray};

#[derive(Debug, Clone)]
pub struct FakeBody {
    pub desc: BodyDesc,
    pub translation: Vec3,
    pub rotation: Quat,
    pub linvel: Vec3,
    pub angvel: Vec3,
    pub colliders: Vec<ColliderDesc>,
    pub next_translation: Option<Vec3>,
    pub next_rotation: Option<Quat>,
}

#[derive(Debug, Default)]
pub struct FakeWorld {
    pub bodies: BTreeMap<BodyHandle, FakeBody>,
    pub impulses: Vec<(BodyHandle, Vec3)>,
    pub torques: Vec<(BodyHandle, Vec3)>,
    /// Answer for every ray cast
    pub ray_toi: Option<f32>,
    /// Most recent ray cast with its max toi and solid flag
    pub last_ray: Cell<Option<(Ray, f32, bool)>>,
    pub steps: u32,
    next_id: u64,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self, handle: BodyHandle) -> &FakeBody {
        &self.bodies[&handle]
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> &mut FakeBody {
        self.bodies.get_mut(&handle).expect("unknown body")
    }

    pub fn count_kind(&self, kind: BodyKind) -> usize {
        self.bodies.values().filter(|b| b.desc.kind == kind).count()
    }
}

impl PhysicsWorld for FakeWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        self.next_id += 1;
        let handle = BodyHandle(self.next_id);
        self.bodies.insert(
            handle,
            FakeBody {
                desc: desc.clone(),
                translation: desc.translation,
                rotation: Quat::IDENTITY,
                linvel: Vec3::ZERO,
                angvel: Vec3::ZERO,
                colliders: Vec::new(),
                next_translation: None,
                next_rotation: None,
            },
        );
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        self.bodies.remove(&body);
    }

    fn add_collider(&mut self, body: BodyHandle, desc: &ColliderDesc) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.colliders.push(desc.clone());
        }
    }

    fn remove_colliders(&mut self, body: BodyHandle) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.colliders.clear();
        }
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    fn translation(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.translation)
    }

    fn linvel(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.linvel)
    }

    fn angvel(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.angvel)
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.linvel += impulse;
            self.impulses.push((body, impulse));
        }
    }

    fn apply_torque_impulse(&mut self, body: BodyHandle, torque: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.angvel += torque;
            self.torques.push((body, torque));
        }
    }

    fn set_translation(&mut self, body: BodyHandle, translation: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.translation = translation;
        }
    }

    fn set_linvel(&mut self, body: BodyHandle, linvel: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.linvel = linvel;
        }
    }

    fn set_angvel(&mut self, body: BodyHandle, angvel: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.angvel = angvel;
        }
    }

    fn set_next_kinematic_translation(&mut self, body: BodyHandle, translation: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.next_translation = Some(translation);
        }
    }

    fn set_next_kinematic_rotation(&mut self, body: BodyHandle, rotation: Quat) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.next_rotation = Some(rotation);
        }
    }

    fn cast_ray(&self, ray: &Ray, max_toi: f32, solid: bool) -> Option<f32> {
        self.last_ray.set(Some((*ray, max_toi, solid)));
        self.ray_toi.filter(|toi| *toi <= max_toi)
    }

    fn step(&mut self, dt: f32) {
        self.steps += 1;
        for body in self.bodies.values_mut() {
            match body.desc.kind {
                BodyKind::Dynamic => body.translation += body.linvel * dt,
                BodyKind::KinematicPosition => {
                    if let Some(t) = body.next_translation.take() {
                        body.translation = t;
                    }
                    if let Some(r) = body.next_rotation.take() {
                        body.rotation = r;
                    }
                }
                BodyKind::Fixed => {}
            }
        }
    }
}
