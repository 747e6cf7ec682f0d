//! Movement domain: shape queries answered by avian's spatial query pipeline.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{
    ColliderId, GameLayer, OverlapHit, QueryFilter, RayHit, ShapeHit, ShapeQuery,
};

const MAX_SHAPE_HITS: u32 = 4;

/// Pose of every collider, for closest-point lookups on overlap hits.
pub(crate) type ColliderPose = (&'static Collider, &'static Position, &'static Rotation);

pub fn collider_id(entity: Entity) -> ColliderId {
    ColliderId(entity.to_bits())
}

pub fn collider_entity(id: ColliderId) -> Entity {
    Entity::from_bits(id.0)
}

fn layer_mask(filter: QueryFilter) -> LayerMask {
    match filter {
        QueryFilter::Solid => [GameLayer::Ground, GameLayer::Wall].into(),
        QueryFilter::Climbable => GameLayer::Wall.into(),
        QueryFilter::Ladder => GameLayer::Ladder.into(),
        QueryFilter::Interactable => GameLayer::Interactable.into(),
        QueryFilter::Player => GameLayer::Player.into(),
        QueryFilter::Enemy => GameLayer::Enemy.into(),
    }
}

/// Upright capsule whose bounding box is `size`.
pub(crate) fn capsule(size: Vec2) -> Collider {
    let radius = size.x * 0.5;
    Collider::capsule(radius, (size.y - size.x).max(0.0))
}

pub struct AvianShapeQuery<'a, 'w, 's> {
    spatial: &'a SpatialQuery<'w, 's>,
    colliders: &'a Query<'w, 's, ColliderPose>,
    excluded: Vec<Entity>,
}

impl<'a, 'w, 's> AvianShapeQuery<'a, 'w, 's> {
    /// `excluded` are the querying body's own colliders.
    pub(crate) fn new(
        spatial: &'a SpatialQuery<'w, 's>,
        colliders: &'a Query<'w, 's, ColliderPose>,
        excluded: Vec<Entity>,
    ) -> Self {
        Self {
            spatial,
            colliders,
            excluded,
        }
    }

    fn filter(&self, filter: QueryFilter) -> SpatialQueryFilter {
        SpatialQueryFilter::from_mask(layer_mask(filter))
            .with_excluded_entities(self.excluded.iter().copied())
    }
}

impl ShapeQuery for AvianShapeQuery<'_, '_, '_> {
    fn cast_capsule(
        &self,
        center: Vec2,
        size: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Vec<ShapeHit> {
        let Ok(dir) = Dir2::new(direction) else {
            return Vec::new();
        };
        let config = ShapeCastConfig::from_max_distance(max_distance);
        self.spatial
            .shape_hits(
                &capsule(size),
                center,
                0.0,
                dir,
                MAX_SHAPE_HITS,
                &config,
                &self.filter(filter),
            )
            .into_iter()
            // Contacts already touching on the far side are not in the way
            .filter(|hit| (hit.point1 - center).dot(direction) > 0.0)
            .map(|hit| ShapeHit {
                collider: collider_id(hit.entity),
                point: hit.point1,
                normal: hit.normal1,
                distance: hit.distance,
            })
            .collect()
    }

    fn overlap_box(&self, center: Vec2, size: Vec2, filter: QueryFilter) -> Vec<OverlapHit> {
        let shape = Collider::rectangle(size.x, size.y);
        self.spatial
            .shape_intersections(&shape, center, 0.0, &self.filter(filter))
            .into_iter()
            .filter_map(|entity| {
                let (collider, position, rotation) = self.colliders.get(entity).ok()?;
                let (point, _) = collider.project_point(*position, *rotation, center, true);
                Some(OverlapHit {
                    collider: collider_id(entity),
                    center: position.0,
                    point,
                })
            })
            .collect()
    }

    fn overlap_capsule(&self, center: Vec2, size: Vec2, filter: QueryFilter) -> bool {
        !self
            .spatial
            .shape_intersections(&capsule(size), center, 0.0, &self.filter(filter))
            .is_empty()
    }

    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RayHit> {
        let dir = Dir2::new(direction).ok()?;
        self.spatial
            .cast_ray(origin, dir, max_distance, true, &self.filter(filter))
            .map(|hit| RayHit {
                collider: collider_id(hit.entity),
                point: origin + *dir * hit.distance,
                normal: hit.normal,
                distance: hit.distance,
            })
    }
}
