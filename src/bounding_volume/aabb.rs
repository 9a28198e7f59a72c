//! Axis Aligned Bounding Box.

use crate::math::{Point, Real, Vector, DIM};
use crate::query::Ray;
use num::Zero;

/// An Axis-Aligned Bounding Box (AABB).
///
/// Invariant: `mins[i] <= maxs[i]` on every axis.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Aabb {
    /// The point with the smallest coordinates of this AABB.
    pub mins: Point<Real>,
    /// The point with the greatest coordinates of this AABB.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` components set to `+∞` and `maxs`
    /// components set to `-∞`.
    ///
    /// This is useful as the neutral element of [`Aabb::merge`].
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Point::new(Real::MAX, Real::MAX, Real::MAX),
            Point::new(-Real::MAX, -Real::MAX, -Real::MAX),
        )
    }

    /// Computes the AABB of a set of points.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point<Real>>) -> Self {
        let mut result = Self::new_invalid();

        for pt in points {
            result.take_point(*pt);
        }

        result
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    #[inline]
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// The smallest AABB which contains both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.coords.inf(&other.mins.coords).into(),
            maxs: self.maxs.coords.sup(&other.maxs.coords).into(),
        }
    }

    /// Enlarges this AABB so it also contains `other`.
    #[inline]
    pub fn merge(&mut self, other: &Aabb) {
        *self = self.merged(other);
    }

    /// Dilates this AABB by `amount` on every axis.
    #[inline]
    pub fn loosened(&self, amount: Real) -> Aabb {
        let amount = Vector::repeat(amount);
        Aabb {
            mins: self.mins - amount,
            maxs: self.maxs + amount,
        }
    }

    /// Does this AABB contain the point `pt`?
    #[inline]
    pub fn contains_local_point(&self, pt: &Point<Real>) -> bool {
        for i in 0..DIM {
            if pt[i] < self.mins[i] || pt[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// The point of this AABB closest to `pt` (which is `pt` itself if it is
    /// inside of the AABB).
    #[inline]
    pub fn clamp_local_point(&self, pt: &Point<Real>) -> Point<Real> {
        pt.coords
            .sup(&self.mins.coords)
            .inf(&self.maxs.coords)
            .into()
    }

    /// The squared distance between `pt` and this AABB, zero if `pt` is inside.
    #[inline]
    pub fn distance_squared_to_local_point(&self, pt: &Point<Real>) -> Real {
        na::distance_squared(&self.clamp_local_point(pt), pt)
    }

    /// Computes the time of impact between a ray and this AABB, using the
    /// slab test on each axis.
    ///
    /// Returns `None` if the ray misses or only hits past `max_toi`.
    pub fn cast_local_ray(&self, ray: &Ray, max_toi: Real) -> Option<Real> {
        let mut tmin: Real = 0.0;
        let mut tmax: Real = max_toi;

        for i in 0..DIM {
            if ray.dir[i].is_zero() {
                if ray.origin[i] < self.mins[i] || ray.origin[i] > self.maxs[i] {
                    return None;
                }
            } else {
                let denom = 1.0 / ray.dir[i];
                let mut inter_with_near_halfspace = (self.mins[i] - ray.origin[i]) * denom;
                let mut inter_with_far_halfspace = (self.maxs[i] - ray.origin[i]) * denom;

                if inter_with_near_halfspace > inter_with_far_halfspace {
                    std::mem::swap(
                        &mut inter_with_near_halfspace,
                        &mut inter_with_far_halfspace,
                    )
                }

                tmin = tmin.max(inter_with_near_halfspace);
                tmax = tmax.min(inter_with_far_halfspace);

                if tmin > tmax {
                    // This covers the case where tmax is negative because tmin is
                    // initialized at zero.
                    return None;
                }
            }
        }

        Some(tmin)
    }
}
