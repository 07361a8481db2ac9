//! Rapier implementation of [`PhysicsWorld`]

mod conversions;

use std::collections::HashMap;

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use self::conversions::{from_rapier_vec, to_rapier_point, to_rapier_quat, to_rapier_vec};
use super::{BodyDesc, BodyHandle, BodyKind, ColliderDesc, PhysicsWorld, Ray, Shape};

/// Standard earth gravity along -Y
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

pub struct RapierWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhaseMultiSap,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    handles: HashMap<BodyHandle, RigidBodyHandle>,
    next_id: u64,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: to_rapier_vec(GRAVITY),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseMultiSap::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            handles: HashMap::new(),
            next_id: 0,
        }
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    fn rb(&self, body: BodyHandle) -> Option<&RigidBody> {
        self.handles
            .get(&body)
            .and_then(|h| self.rigid_body_set.get(*h))
    }

    fn rb_mut(&mut self, body: BodyHandle) -> Option<&mut RigidBody> {
        let handle = *self.handles.get(&body)?;
        self.rigid_body_set.get_mut(handle)
    }
}

impl PhysicsWorld for RapierWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let rb_type = match desc.kind {
            BodyKind::Dynamic => RigidBodyType::Dynamic,
            BodyKind::KinematicPosition => RigidBodyType::KinematicPositionBased,
            BodyKind::Fixed => RigidBodyType::Fixed,
        };
        let rigid_body = RigidBodyBuilder::new(rb_type)
            .translation(to_rapier_vec(desc.translation))
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .can_sleep(desc.can_sleep)
            .build();

        let rb_handle = self.rigid_body_set.insert(rigid_body);
        self.next_id += 1;
        let handle = BodyHandle(self.next_id);
        self.handles.insert(handle, rb_handle);
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        let Some(rb_handle) = self.handles.remove(&body) else {
            return;
        };
        self.rigid_body_set.remove(
            rb_handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    fn add_collider(&mut self, body: BodyHandle, desc: &ColliderDesc) {
        let Some(rb_handle) = self.handles.get(&body).copied() else {
            log::warn!("Collider for unknown body {:?} dropped", body);
            return;
        };
        let builder = match desc.shape {
            Shape::Ball { radius } => ColliderBuilder::ball(radius),
            Shape::Cuboid { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
        };
        let collider = builder
            .translation(to_rapier_vec(desc.offset))
            .restitution(desc.restitution)
            .friction(desc.friction)
            .build();
        self.collider_set
            .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
    }

    fn remove_colliders(&mut self, body: BodyHandle) {
        let Some(colliders) = self.rb(body).map(|rb| rb.colliders().to_vec()) else {
            return;
        };
        for handle in colliders {
            self.collider_set.remove(
                handle,
                &mut self.island_manager,
                &mut self.rigid_body_set,
                true,
            );
        }
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.rb(body).is_some()
    }

    fn translation(&self, body: BodyHandle) -> Option<Vec3> {
        self.rb(body).map(|rb| from_rapier_vec(rb.translation()))
    }

    fn linvel(&self, body: BodyHandle) -> Option<Vec3> {
        self.rb(body).map(|rb| from_rapier_vec(rb.linvel()))
    }

    fn angvel(&self, body: BodyHandle) -> Option<Vec3> {
        self.rb(body).map(|rb| from_rapier_vec(rb.angvel()))
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        if let Some(rb) = self.rb_mut(body) {
            rb.apply_impulse(to_rapier_vec(impulse), true);
        }
    }

    fn apply_torque_impulse(&mut self, body: BodyHandle, torque: Vec3) {
        if let Some(rb) = self.rb_mut(body) {
            rb.apply_torque_impulse(to_rapier_vec(torque), true);
        }
    }

    fn set_translation(&mut self, body: BodyHandle, translation: Vec3) {
        if let Some(rb) = self.rb_mut(body) {
            rb.set_translation(to_rapier_vec(translation), true);
        }
    }

    fn set_linvel(&mut self, body: BodyHandle, linvel: Vec3) {
        if let Some(rb) = self.rb_mut(body) {
            rb.set_linvel(to_rapier_vec(linvel), true);
        }
    }

    fn set_angvel(&mut self, body: BodyHandle, angvel: Vec3) {
        if let Some(rb) = self.rb_mut(body) {
            rb.set_angvel(to_rapier_vec(angvel), true);
        }
    }

    fn set_next_kinematic_translation(&mut self, body: BodyHandle, translation: Vec3) {
        if let Some(rb) = self.rb_mut(body) {
            rb.set_next_kinematic_translation(to_rapier_vec(translation));
        }
    }

    fn set_next_kinematic_rotation(&mut self, body: BodyHandle, rotation: Quat) {
        if let Some(rb) = self.rb_mut(body) {
            rb.set_next_kinematic_rotation(to_rapier_quat(rotation));
        }
    }

    fn cast_ray(&self, ray: &Ray, max_toi: f32, solid: bool) -> Option<f32> {
        let ray = rapier3d::geometry::Ray::new(to_rapier_point(ray.origin), to_rapier_vec(ray.dir));
        self.collider_set
            .iter()
            .filter_map(|(_, collider)| {
                collider
                    .shape()
                    .cast_ray(collider.position(), &ray, max_toi, solid)
            })
            .min_by(|a, b| a.total_cmp(b))
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{GameConfig, MarbleAppearance};
    use crate::sim::{Control, ControlState, Session};

    const DT: f32 = 1.0 / 60.0;

    fn with_floor() -> RapierWorld {
        let mut world = RapierWorld::new();
        let floor = world.create_body(&BodyDesc::fixed());
        world.add_collider(
            floor,
            &ColliderDesc::cuboid(Vec3::new(2.0, 0.1, 2.0))
                .at(Vec3::new(0.0, -0.1, 0.0))
                .material(0.0, 1.0),
        );
        world
    }

    #[test]
    fn test_ball_settles_on_floor() {
        let mut world = with_floor();
        let ball = world.create_body(&BodyDesc::new(BodyKind::Dynamic, Vec3::new(0.0, 1.0, 0.0)));
        world.add_collider(ball, &ColliderDesc::ball(0.3));

        for _ in 0..240 {
            world.step(DT);
        }
        let y = world.translation(ball).unwrap().y;
        assert!((y - 0.3).abs() < 0.05, "resting height {y}");
    }

    #[test]
    fn test_ray_hits_floor_top() {
        let mut world = with_floor();
        world.step(DT);
        let toi = world.cast_ray(&Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y), 10.0, true);
        assert!((toi.unwrap() - 1.0).abs() < 1e-3);

        let miss = world.cast_ray(&Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y), 10.0, true);
        assert_eq!(miss, None);
    }

    #[test]
    fn test_destroy_removes_colliders() {
        let mut world = with_floor();
        let ball = world.create_body(&BodyDesc::new(BodyKind::Dynamic, Vec3::ONE));
        world.add_collider(ball, &ColliderDesc::ball(0.3));
        assert_eq!(world.collider_count(), 2);

        world.destroy_body(ball);
        assert!(!world.contains(ball));
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.collider_count(), 1);

        // Stale handles are ignored
        world.apply_impulse(ball, Vec3::Y);
        assert_eq!(world.translation(ball), None);
    }

    #[test]
    fn test_remove_colliders_keeps_body() {
        let mut world = RapierWorld::new();
        let ball = world.create_body(&BodyDesc::new(BodyKind::Dynamic, Vec3::ZERO));
        world.add_collider(ball, &ColliderDesc::ball(0.3));
        world.remove_colliders(ball);
        world.add_collider(ball, &ColliderDesc::ball(0.45));
        assert_eq!(world.collider_count(), 1);
        assert!(world.contains(ball));
    }

    #[test]
    fn test_kinematic_target_applied_on_step() {
        let mut world = RapierWorld::new();
        let bar = world.create_body(&BodyDesc::new(BodyKind::KinematicPosition, Vec3::ZERO));
        world.set_next_kinematic_translation(bar, Vec3::new(1.0, 0.3, -4.0));
        world.step(DT);
        let t = world.translation(bar).unwrap();
        assert!(t.abs_diff_eq(Vec3::new(1.0, 0.3, -4.0), 1e-5));
    }

    fn settled_session(radius: f32) -> Session<RapierWorld> {
        let config = GameConfig {
            seed: 42,
            marble: MarbleAppearance {
                radius,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut session = Session::new(config, RapierWorld::new()).unwrap();
        for _ in 0..120 {
            session.tick(DT, ControlState::default());
        }
        session
    }

    fn marble_vy(session: &Session<RapierWorld>) -> f32 {
        let body = session.player().body().unwrap();
        session.world().linvel(body).unwrap().y
    }

    #[test]
    fn test_marble_rests_on_track_floor() {
        let session = settled_session(0.3);
        let body = session.player().body().unwrap();
        let y = session.world().translation(body).unwrap().y;
        assert!((y - 0.3).abs() < 0.05, "resting height {y}");
        assert!(marble_vy(&session).abs() < 0.05);
    }

    #[test]
    fn test_grounded_marble_jumps() {
        for (radius, min_vy) in [(0.3, 2.0), (0.45, 0.5)] {
            let mut session = settled_session(radius);
            session.tick(DT, ControlState::default().with(Control::Jump));
            let vy = marble_vy(&session);
            assert!(vy > min_vy, "radius {radius} jumped with vy {vy}");
        }
    }

    #[test]
    fn test_airborne_marble_at_spawn_cannot_jump() {
        let mut session = Session::new(GameConfig::default(), RapierWorld::new()).unwrap();
        session.tick(DT, ControlState::default().with(Control::Jump));
        assert!(marble_vy(&session) <= 0.0);
    }
}
