//! Snapshot undo/redo history.

use crate::scene::Scene;

/// Full scene snapshots plus a cursor.
///
/// `index` always points at a valid snapshot. Entries after it are redo
/// states and are dropped by the next commit. When the history grows past
/// `cap` the oldest entry is evicted and the index shifted down, so the
/// current snapshot never changes because of eviction.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Scene>,
    index: usize,
    cap: usize,
}

impl History {
    /// Start a history whose only entry is `initial`. A `cap` below 1 is
    /// treated as 1.
    pub fn new(initial: Scene, cap: usize) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
            cap: cap.max(1),
        }
    }

    /// Record `scene` as the newest state.
    pub fn commit(&mut self, scene: &Scene) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(scene.clone());
        self.index += 1;

        if self.snapshots.len() > self.cap {
            self.snapshots.remove(0);
            self.index -= 1;
        }
        log::debug!(
            "history commit: {} shapes, {}/{} snapshots",
            scene.len(),
            self.index + 1,
            self.snapshots.len()
        );
    }

    /// Step back one snapshot. `None` when already at the oldest entry.
    pub fn undo(&mut self) -> Option<&Scene> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.snapshots.get(self.index)
    }

    /// Step forward one snapshot. `None` when already at the newest entry.
    pub fn redo(&mut self) -> Option<&Scene> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        self.snapshots.get(self.index)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn current(&self) -> &Scene {
        &self.snapshots[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Shape};
    use kurbo::Point;

    fn scene_with(n: usize) -> Scene {
        (0..n)
            .map(|i| Shape::Circle(Circle::new(Point::new(i as f64, 0.0), 1.0)))
            .collect()
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut history = History::new(Scene::new(), 50);
        let states: Vec<Scene> = (1..=5).map(scene_with).collect();
        for s in &states {
            history.commit(s);
        }

        for _ in 0..5 {
            assert!(history.undo().is_some());
        }
        assert!(history.current().is_empty());
        assert!(history.undo().is_none());

        for _ in 0..5 {
            assert!(history.redo().is_some());
        }
        assert_eq!(history.current(), &states[4]);
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_truncates_redo() {
        let mut history = History::new(Scene::new(), 50);
        history.commit(&scene_with(1));
        history.commit(&scene_with(2));
        history.undo();
        assert!(history.can_redo());

        history.commit(&scene_with(3));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().len(), 3);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let cap = 5;
        let mut history = History::new(Scene::new(), cap);
        for n in 1..=cap + 1 {
            history.commit(&scene_with(n));
            assert!(history.len() <= cap);
        }
        assert_eq!(history.current().len(), cap + 1);

        let mut steps = 0;
        while history.undo().is_some() {
            steps += 1;
        }
        assert_eq!(steps, cap - 1);
        // The empty initial scene and the first commit are both gone.
        assert_eq!(history.current().len(), 2);
    }

    #[test]
    fn test_snapshot_does_not_alias_live_scene() {
        let mut history = History::new(Scene::new(), 50);
        let mut live = scene_with(1);
        history.commit(&live);
        live.add(Shape::Circle(Circle::new(Point::ZERO, 3.0)));
        assert_eq!(history.current().len(), 1);
    }
}
