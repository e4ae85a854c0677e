//! Scene binding.
//!
//! The core does not dictate a rendering API. A model's visual footprint is
//! a fixed set of [`Marker`]s (position + radius) created in a [`Scene`]
//! during `initialize`, re-placed every update, and destroyed in `cleanup`.
//! [`SceneResources`] is the helper that enforces that discipline so no
//! model has to write its own disposal code.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::kinematics::Vec3;

/// Opaque handle to a visual created in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

/// Render-visible description of one body or particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// World-space position.
    pub position: Vec3,
    /// Display radius.
    pub radius: f64,
}

impl Marker {
    /// Create a marker.
    #[must_use]
    pub const fn new(position: Vec3, radius: f64) -> Self {
        Self { position, radius }
    }
}

/// Something that can host markers (a render scene, or nothing at all).
pub trait Scene {
    /// Create a visual and return its handle.
    fn spawn(&mut self, marker: Marker) -> MarkerId;

    /// Move or resize an existing visual.
    fn place(&mut self, id: MarkerId, marker: Marker);

    /// Destroy a visual. Unknown handles are ignored.
    fn despawn(&mut self, id: MarkerId);
}

/// In-memory scene used for headless runs and tests.
///
/// Counts every spawn so callers can verify that updates reuse handles and
/// that cleanup releases everything initialize created.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScene {
    markers: IndexMap<MarkerId, Marker>,
    next_id: u64,
    spawned_total: u64,
    placements: u64,
}

impl HeadlessScene {
    /// Empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers currently alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.markers.len()
    }

    /// Markers ever created.
    #[must_use]
    pub const fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Number of `place` calls received.
    #[must_use]
    pub const fn placements(&self) -> u64 {
        self.placements
    }

    /// Look up a live marker.
    #[must_use]
    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(&id)
    }

    /// Iterate live markers in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&MarkerId, &Marker)> {
        self.markers.iter()
    }
}

impl Scene for HeadlessScene {
    fn spawn(&mut self, marker: Marker) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.spawned_total += 1;
        self.markers.insert(id, marker);
        id
    }

    fn place(&mut self, id: MarkerId, marker: Marker) {
        if let Some(slot) = self.markers.get_mut(&id) {
            *slot = marker;
            self.placements += 1;
        }
    }

    fn despawn(&mut self, id: MarkerId) {
        self.markers.shift_remove(&id);
    }
}

/// Acquire-on-initialize, release-on-cleanup ownership of scene markers.
#[derive(Debug, Clone, Default)]
pub struct SceneResources {
    handles: Vec<MarkerId>,
}

impl SceneResources {
    /// No resources held.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Spawn one handle per marker. Releases anything previously held first.
    pub fn acquire(&mut self, scene: &mut dyn Scene, markers: &[Marker]) {
        self.release(scene);
        self.handles = markers.iter().map(|m| scene.spawn(*m)).collect();
    }

    /// Re-place existing handles; only spawns or despawns if the count changed.
    pub fn sync(&mut self, scene: &mut dyn Scene, markers: &[Marker]) {
        for (id, marker) in self.handles.iter().zip(markers) {
            scene.place(*id, *marker);
        }
        if markers.len() > self.handles.len() {
            let extra = &markers[self.handles.len()..];
            self.handles.extend(extra.iter().map(|m| scene.spawn(*m)));
        } else {
            for id in self.handles.drain(markers.len()..) {
                scene.despawn(id);
            }
        }
    }

    /// Despawn every held handle.
    pub fn release(&mut self, scene: &mut dyn Scene) {
        for id in self.handles.drain(..) {
            scene.despawn(id);
        }
    }

    /// Number of held handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers(n: usize) -> Vec<Marker> {
        (0..n)
            .map(|i| Marker::new(Vec3::new(i as f64, 0.0, 0.0), 0.5))
            .collect()
    }

    #[test]
    fn test_acquire_and_release() {
        let mut scene = HeadlessScene::new();
        let mut res = SceneResources::new();

        res.acquire(&mut scene, &markers(3));
        assert_eq!(scene.live_count(), 3);
        assert_eq!(res.len(), 3);

        res.release(&mut scene);
        assert_eq!(scene.live_count(), 0);
        assert!(res.is_empty());
    }

    #[test]
    fn test_sync_reuses_handles() {
        let mut scene = HeadlessScene::new();
        let mut res = SceneResources::new();
        res.acquire(&mut scene, &markers(4));

        let moved: Vec<Marker> = markers(4)
            .into_iter()
            .map(|m| Marker::new(m.position + Vec3::UP, m.radius))
            .collect();
        for _ in 0..10 {
            res.sync(&mut scene, &moved);
        }

        assert_eq!(scene.spawned_total(), 4);
        assert_eq!(scene.placements(), 40);
        let (_, first) = scene.iter().next().expect("marker");
        assert_eq!(first.position, Vec3::UP);
    }

    #[test]
    fn test_sync_adjusts_count() {
        let mut scene = HeadlessScene::new();
        let mut res = SceneResources::new();
        res.acquire(&mut scene, &markers(2));

        res.sync(&mut scene, &markers(5));
        assert_eq!(scene.live_count(), 5);

        res.sync(&mut scene, &markers(1));
        assert_eq!(scene.live_count(), 1);
        assert_eq!(res.len(), 1);
    }

    #[test]
    fn test_reacquire_releases_previous() {
        let mut scene = HeadlessScene::new();
        let mut res = SceneResources::new();
        res.acquire(&mut scene, &markers(3));
        res.acquire(&mut scene, &markers(2));
        assert_eq!(scene.live_count(), 2);
    }

    #[test]
    fn test_despawn_unknown_is_ignored() {
        let mut scene = HeadlessScene::new();
        scene.despawn(MarkerId(99));
        scene.place(MarkerId(99), Marker::new(Vec3::ZERO, 1.0));
        assert_eq!(scene.live_count(), 0);
        assert_eq!(scene.placements(), 0);
    }
}
