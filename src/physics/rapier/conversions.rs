use glam::{Quat, Vec3};
use rapier3d::na::{Point3, Quaternion, UnitQuaternion, Vector3};
use rapier3d::prelude::Real;

pub fn to_rapier_vec(v: Vec3) -> Vector3<Real> {
    Vector3::new(v.x, v.y, v.z)
}

pub fn to_rapier_point(v: Vec3) -> Point3<Real> {
    Point3::new(v.x, v.y, v.z)
}

pub fn to_rapier_quat(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub fn from_rapier_vec(v: &Vector3<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}
