//! Movement domain: the shape query seam between the controller and physics.
//!
//! The controller never talks to a physics engine directly. Everything it
//! needs to know about the world comes through [`ShapeQuery`], which the
//! game implements on top of avian2d and the tests implement with canned
//! results. A query that finds nothing is a normal answer, not an error.

use std::cell::RefCell;

use bevy::prelude::*;

/// Which part of the world a query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFilter {
    /// Everything that blocks movement (ground, walls, platforms).
    Solid,
    /// Walls the character can grab, slide on and climb over.
    Climbable,
    Ladder,
    Interactable,
    Player,
    Enemy,
}

/// Opaque identity of the collider that produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub collider: ColliderId,
    pub point: Vec2,
    pub normal: Vec2,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeHit {
    pub collider: ColliderId,
    pub point: Vec2,
    pub normal: Vec2,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapHit {
    pub collider: ColliderId,
    /// Center of the overlapped collider.
    pub center: Vec2,
    /// Closest point on the overlapped collider to the query center.
    pub point: Vec2,
}

pub trait ShapeQuery {
    /// Sweep an upright capsule of `size` from `center` along `direction`.
    fn cast_capsule(
        &self,
        center: Vec2,
        size: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Vec<ShapeHit>;

    fn overlap_box(&self, center: Vec2, size: Vec2, filter: QueryFilter) -> Vec<OverlapHit>;

    /// True when an upright capsule of `size` at `center` touches anything.
    fn overlap_capsule(&self, center: Vec2, size: Vec2, filter: QueryFilter) -> bool;

    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RayHit>;
}

type RayKey = ([u32; 5], QueryFilter);
type BoxKey = ([u32; 4], QueryFilter);

/// Memoizes ray and box queries for the duration of one tick.
///
/// Built fresh at the start of every tick and dropped at its end, so no
/// result ever outlives the world state it was computed from.
pub struct FrameQueryCache<'a> {
    inner: &'a dyn ShapeQuery,
    rays: RefCell<Vec<(RayKey, Option<RayHit>)>>,
    boxes: RefCell<Vec<(BoxKey, Vec<OverlapHit>)>>,
}

impl<'a> FrameQueryCache<'a> {
    pub fn new(inner: &'a dyn ShapeQuery) -> Self {
        Self {
            inner,
            rays: RefCell::new(Vec::new()),
            boxes: RefCell::new(Vec::new()),
        }
    }
}

impl ShapeQuery for FrameQueryCache<'_> {
    fn cast_capsule(
        &self,
        center: Vec2,
        size: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Vec<ShapeHit> {
        self.inner
            .cast_capsule(center, size, direction, max_distance, filter)
    }

    fn overlap_box(&self, center: Vec2, size: Vec2, filter: QueryFilter) -> Vec<OverlapHit> {
        let key = (
            [
                center.x.to_bits(),
                center.y.to_bits(),
                size.x.to_bits(),
                size.y.to_bits(),
            ],
            filter,
        );
        if let Some((_, hits)) = self.boxes.borrow().iter().find(|(k, _)| *k == key) {
            return hits.clone();
        }
        let hits = self.inner.overlap_box(center, size, filter);
        self.boxes.borrow_mut().push((key, hits.clone()));
        hits
    }

    fn overlap_capsule(&self, center: Vec2, size: Vec2, filter: QueryFilter) -> bool {
        self.inner.overlap_capsule(center, size, filter)
    }

    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RayHit> {
        let key = (
            [
                origin.x.to_bits(),
                origin.y.to_bits(),
                direction.x.to_bits(),
                direction.y.to_bits(),
                max_distance.to_bits(),
            ],
            filter,
        );
        if let Some((_, hit)) = self.rays.borrow().iter().find(|(k, _)| *k == key) {
            return *hit;
        }
        let hit = self.inner.raycast(origin, direction, max_distance, filter);
        self.rays.borrow_mut().push((key, hit));
        hit
    }
}
