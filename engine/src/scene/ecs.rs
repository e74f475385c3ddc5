//! Scene binding backed by a hecs entity world
//!
//! Each visual is one entity carrying [`Transform`], [`VisualMesh`],
//! [`Material`], [`ShadowSettings`] and a [`PoseRevision`] counter. A renderer
//! consumes it through [`EcsScene::drawables`].

use super::components::{Material, PoseRevision, ShadowSettings, Transform, VisualMesh};
use super::{SceneBinding, VisualDesc, VisualHandle};
use crate::core::Pose;
use hecs::{Entity, World};
use tracing::{trace, warn};

/// One drawable as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    /// Handle of the visual
    pub handle: VisualHandle,
    /// Current transform
    pub transform: Transform,
    /// Geometry
    pub mesh: VisualMesh,
    /// Material
    pub material: Material,
    /// Shadow flags
    pub shadows: ShadowSettings,
}

/// In-memory scene of visual entities
#[derive(Default)]
pub struct EcsScene {
    world: World,
}

impl EcsScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    fn entity(handle: VisualHandle) -> Option<Entity> {
        Entity::from_bits(handle.raw())
    }

    /// Current pose of a visual
    pub fn pose(&self, handle: VisualHandle) -> Option<Pose> {
        let entity = Self::entity(handle)?;
        self.world
            .get::<&Transform>(entity)
            .ok()
            .map(|transform| transform.pose())
    }

    /// Number of pose writes a visual has received since creation
    pub fn pose_revision(&self, handle: VisualHandle) -> Option<u64> {
        let entity = Self::entity(handle)?;
        self.world
            .get::<&PoseRevision>(entity)
            .ok()
            .map(|revision| revision.0)
    }

    /// Geometry of a visual
    pub fn mesh(&self, handle: VisualHandle) -> Option<VisualMesh> {
        let entity = Self::entity(handle)?;
        self.world.get::<&VisualMesh>(entity).ok().map(|mesh| *mesh)
    }

    /// Whether the handle names a live visual
    pub fn contains(&self, handle: VisualHandle) -> bool {
        Self::entity(handle).is_some_and(|entity| self.world.contains(entity))
    }

    /// Number of visuals in the drawable set
    pub fn visual_count(&self) -> usize {
        self.world.len() as usize
    }

    /// Snapshot of every drawable
    pub fn drawables(&self) -> Vec<Drawable> {
        self.world
            .query::<(&Transform, &VisualMesh, &Material, &ShadowSettings)>()
            .iter()
            .map(|(entity, (transform, mesh, material, shadows))| Drawable {
                handle: VisualHandle::from_raw(entity.to_bits().get()),
                transform: *transform,
                mesh: *mesh,
                material: *material,
                shadows: *shadows,
            })
            .collect()
    }
}

impl SceneBinding for EcsScene {
    fn create_visual(&mut self, desc: &VisualDesc) -> VisualHandle {
        let entity = self.world.spawn((
            Transform::from_pose(desc.pose),
            VisualMesh(desc.shape),
            desc.material,
            desc.shadows,
            PoseRevision::default(),
        ));
        trace!("Created visual {:?} for {:?}", entity, desc.shape);
        VisualHandle::from_raw(entity.to_bits().get())
    }

    fn set_pose(&mut self, handle: VisualHandle, pose: Pose) {
        let Some(entity) = Self::entity(handle) else {
            warn!("set_pose on malformed visual handle {:?}", handle);
            return;
        };
        match self
            .world
            .query_one_mut::<(&mut Transform, &mut PoseRevision)>(entity)
        {
            Ok((transform, revision)) => {
                transform.position = pose.position;
                transform.rotation = pose.rotation;
                revision.0 += 1;
            }
            Err(_) => warn!("set_pose on missing visual {:?}", entity),
        }
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        let removed = Self::entity(handle).is_some_and(|entity| self.world.despawn(entity).is_ok());
        if !removed {
            warn!("remove_visual on missing visual {:?}", handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::VisualShape;
    use glam::{Quat, Vec3};

    #[test]
    fn test_create_and_update_visual() {
        let mut scene = EcsScene::new();
        let handle = scene.create_visual(&VisualDesc::dynamic_box(
            Vec3::splat(2.0),
            Pose::from_position(Vec3::new(0.0, 10.0, 0.0)),
        ));

        assert_eq!(scene.visual_count(), 1);
        assert_eq!(scene.pose_revision(handle), Some(0));
        assert_eq!(
            scene.mesh(handle),
            Some(VisualMesh(VisualShape::Box {
                size: Vec3::splat(2.0)
            }))
        );

        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_x(0.4));
        scene.set_pose(handle, pose);
        assert_eq!(scene.pose(handle), Some(pose));
        assert_eq!(scene.pose_revision(handle), Some(1));
    }

    #[test]
    fn test_remove_visual() {
        let mut scene = EcsScene::new();
        let a = scene.create_visual(&VisualDesc::dynamic_sphere(1.0, Pose::default()));
        let b = scene.create_visual(&VisualDesc::dynamic_sphere(2.0, Pose::default()));

        scene.remove_visual(a);
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
        assert_eq!(scene.visual_count(), 1);
        assert_eq!(scene.drawables().len(), 1);
        assert_eq!(scene.drawables()[0].handle, b);

        // Writing to a removed visual is ignored
        scene.set_pose(a, Pose::default());
        assert!(scene.pose(a).is_none());
    }
}
