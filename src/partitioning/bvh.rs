//! A bounding-volume-hierarchy over a set of axis-aligned bounding boxes.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::query::Ray;
use arrayvec::ArrayVec;

/// Number of primitives below which a node is kept as a leaf.
const LEAF_SIZE: usize = 8;

/// Upper bound on the depth-first traversal stacks. Median splits keep the
/// tree balanced, so the depth never exceeds `log2` of the (u32) primitive
/// count.
const TRAVERSAL_STACK_CAP: usize = 64;

#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
struct BvhNode {
    aabb: Aabb,
    /// Leaf: index of the first primitive in `prim_ids`.
    /// Internal: index of the left child (the right child is `first + 1`).
    first: u32,
    /// Number of primitives for a leaf, zero for an internal node.
    count: u32,
}

impl BvhNode {
    #[inline]
    fn is_leaf(&self) -> bool {
        self.count != 0
    }
}

/// A binary bounding-volume-hierarchy built over a set of primitive AABBs.
///
/// The tree is built once, by recursive median split along the longest
/// centroid axis. Primitives are identified by their index in the AABB
/// slice given at construction; queries hand these indices back to a
/// caller-provided closure that runs the exact primitive test.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    prim_ids: Vec<u32>,
}

impl Bvh {
    /// Builds a BVH from one AABB per primitive.
    ///
    /// An empty slice yields an empty tree for which every query returns `None`.
    pub fn new(aabbs: &[Aabb]) -> Self {
        let mut result = Bvh {
            nodes: Vec::new(),
            prim_ids: (0..aabbs.len() as u32).collect(),
        };

        if aabbs.is_empty() {
            return result;
        }

        let root_aabb = aabbs.iter().fold(Aabb::new_invalid(), |a, b| a.merged(b));
        result.nodes.push(BvhNode {
            aabb: root_aabb,
            first: 0,
            count: aabbs.len() as u32,
        });
        result.split(0, aabbs);
        result
    }

    /// The AABB of the whole tree.
    pub fn root_aabb(&self) -> Option<Aabb> {
        self.nodes.first().map(|n| n.aabb)
    }

    fn split(&mut self, node_id: usize, aabbs: &[Aabb]) {
        let node = self.nodes[node_id];

        if (node.count as usize) <= LEAF_SIZE {
            return;
        }

        let first = node.first as usize;
        let count = node.count as usize;

        // Median split along the longest axis of the centroid bounds.
        let centroid_bounds = self.prim_ids[first..first + count]
            .iter()
            .fold(Aabb::new_invalid(), |mut a, id| {
                a.take_point(aabbs[*id as usize].center());
                a
            });
        let axis = centroid_bounds.extents().imax();

        let mid = count / 2;
        let _ = self.prim_ids[first..first + count].select_nth_unstable_by(mid, |a, b| {
            let ca = aabbs[*a as usize].center()[axis];
            let cb = aabbs[*b as usize].center()[axis];
            ca.partial_cmp(&cb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let bounds_of = |ids: &[u32]| {
            ids.iter()
                .fold(Aabb::new_invalid(), |a, id| a.merged(&aabbs[*id as usize]))
        };

        let left = BvhNode {
            aabb: bounds_of(&self.prim_ids[first..first + mid]),
            first: first as u32,
            count: mid as u32,
        };
        let right = BvhNode {
            aabb: bounds_of(&self.prim_ids[first + mid..first + count]),
            first: (first + mid) as u32,
            count: (count - mid) as u32,
        };

        let left_id = self.nodes.len();
        self.nodes.push(left);
        self.nodes.push(right);
        self.nodes[node_id].first = left_id as u32;
        self.nodes[node_id].count = 0;

        self.split(left_id, aabbs);
        self.split(left_id + 1, aabbs);
    }

    /// Casts a ray against the tree, returning the closest hit among the
    /// primitives for which `cast_prim` reports an intersection.
    ///
    /// `cast_prim` receives a primitive index and must return the
    /// time-of-impact of the ray on that primitive, if any.
    pub fn cast_ray(
        &self,
        ray: &Ray,
        max_toi: Real,
        mut cast_prim: impl FnMut(u32) -> Option<Real>,
    ) -> Option<(u32, Real)> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut best: Option<(u32, Real)> = None;
        let mut best_toi = max_toi;
        let mut stack: ArrayVec<u32, TRAVERSAL_STACK_CAP> = ArrayVec::new();
        stack.push(0);

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];

            if node.aabb.cast_local_ray(ray, best_toi).is_none() {
                continue;
            }

            if node.is_leaf() {
                let first = node.first as usize;
                for id in &self.prim_ids[first..first + node.count as usize] {
                    if let Some(toi) = cast_prim(*id) {
                        if toi <= best_toi {
                            best_toi = toi;
                            best = Some((*id, toi));
                        }
                    }
                }
            } else {
                stack.push(node.first);
                stack.push(node.first + 1);
            }
        }

        best
    }

    /// Tests whether the ray hits any primitive within `max_toi`.
    ///
    /// Unlike [`Bvh::cast_ray`] this stops at the first confirmed hit.
    pub fn intersects_ray(
        &self,
        ray: &Ray,
        max_toi: Real,
        mut cast_prim: impl FnMut(u32) -> Option<Real>,
    ) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let mut stack: ArrayVec<u32, TRAVERSAL_STACK_CAP> = ArrayVec::new();
        stack.push(0);

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];

            if node.aabb.cast_local_ray(ray, max_toi).is_none() {
                continue;
            }

            if node.is_leaf() {
                let first = node.first as usize;
                for id in &self.prim_ids[first..first + node.count as usize] {
                    if cast_prim(*id).is_some_and(|toi| toi <= max_toi) {
                        return true;
                    }
                }
            } else {
                stack.push(node.first);
                stack.push(node.first + 1);
            }
        }

        false
    }

    /// Finds the primitive closest to `pt`, pruning subtrees farther than the
    /// best candidate found so far.
    ///
    /// `project_prim` receives a primitive index and must return the point of
    /// that primitive closest to `pt`.
    pub fn project_point(
        &self,
        pt: &Point<Real>,
        mut project_prim: impl FnMut(u32) -> Point<Real>,
    ) -> Option<(u32, Point<Real>)> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut best: Option<(u32, Point<Real>)> = None;
        let mut best_dist2 = Real::MAX;
        let mut stack: ArrayVec<u32, TRAVERSAL_STACK_CAP> = ArrayVec::new();
        stack.push(0);

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];

            if node.aabb.distance_squared_to_local_point(pt) > best_dist2 {
                continue;
            }

            if node.is_leaf() {
                let first = node.first as usize;
                for id in &self.prim_ids[first..first + node.count as usize] {
                    let proj = project_prim(*id);
                    let dist2 = na::distance_squared(&proj, pt);
                    if dist2 < best_dist2 {
                        best_dist2 = dist2;
                        best = Some((*id, proj));
                    }
                }
            } else {
                // Visit the nearer child first so pruning kicks in earlier.
                let left = &self.nodes[node.first as usize];
                let right = &self.nodes[node.first as usize + 1];
                if left.aabb.distance_squared_to_local_point(pt)
                    <= right.aabb.distance_squared_to_local_point(pt)
                {
                    stack.push(node.first + 1);
                    stack.push(node.first);
                } else {
                    stack.push(node.first);
                    stack.push(node.first + 1);
                }
            }
        }

        best
    }
}
