//! Two-slot scene switching.

use crate::batch::Batch;
use crate::core::EngineCtx;

/// One screen of the application.
pub trait Scene: Send {
    fn update(&mut self, ctx: &mut EngineCtx, delta: f64) -> anyhow::Result<()>;

    fn render(&mut self, batch: &mut Batch<'_>) -> anyhow::Result<()>;

    /// Called when the scene becomes current.
    fn on_init(&mut self) {}

    /// Called when another scene replaces this one.
    fn on_end(&mut self) {}
}

/// Holds the current scene and the one it replaced.
#[derive(Default)]
pub struct SceneManager {
    current: Option<Box<dyn Scene>>,
    previous: Option<Box<dyn Scene>>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `scene` current. The old current scene, if any, becomes the
    /// previous one and is ended; `None` leaves no scene running.
    pub fn set_scene(&mut self, scene: Option<Box<dyn Scene>>) {
        let old = std::mem::replace(&mut self.current, scene);
        self.previous = old;
        if let Some(prev) = self.previous.as_mut() {
            prev.on_end();
        }
        if let Some(cur) = self.current.as_mut() {
            cur.on_init();
        }
    }

    /// Swaps the previous scene back in. No-op without a previous scene.
    pub fn restore_previous(&mut self) {
        if let Some(prev) = self.previous.take() {
            self.set_scene(Some(prev));
        }
    }

    #[inline]
    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    #[inline]
    pub fn has_current(&self) -> bool {
        self.current.is_some()
    }

    pub fn update(&mut self, ctx: &mut EngineCtx, delta: f64) -> anyhow::Result<()> {
        match self.current.as_mut() {
            Some(scene) => scene.update(ctx, delta),
            None => Ok(()),
        }
    }

    pub fn render(&mut self, batch: &mut Batch<'_>) -> anyhow::Result<()> {
        match self.current.as_mut() {
            Some(scene) => scene.render(batch),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::coords::Size;

    struct Probe {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Scene for Probe {
        fn update(&mut self, _ctx: &mut EngineCtx, _delta: f64) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("update {}", self.name));
            Ok(())
        }

        fn render(&mut self, _batch: &mut Batch<'_>) -> anyhow::Result<()> {
            Ok(())
        }

        fn on_init(&mut self) {
            self.log.lock().unwrap().push(format!("init {}", self.name));
        }

        fn on_end(&mut self) {
            self.log.lock().unwrap().push(format!("end {}", self.name));
        }
    }

    fn probe(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Option<Box<dyn Scene>> {
        Some(Box::new(Probe { name, log: Arc::clone(log) }))
    }

    // ── switching ─────────────────────────────────────────────────────────

    #[test]
    fn set_scene_ends_old_and_inits_new() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scenes = SceneManager::new();
        scenes.set_scene(probe("menu", &log));
        assert!(!scenes.has_previous());
        scenes.set_scene(probe("level", &log));
        assert!(scenes.has_previous());
        assert_eq!(*log.lock().unwrap(), ["init menu", "end menu", "init level"]);
    }

    #[test]
    fn restore_previous_swaps_slots() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scenes = SceneManager::new();
        scenes.set_scene(probe("menu", &log));
        scenes.set_scene(probe("level", &log));
        log.lock().unwrap().clear();

        scenes.restore_previous();
        let mut ctx = EngineCtx::new(Size::new(64, 64));
        scenes.update(&mut ctx, 1.0).unwrap();
        assert_eq!(*log.lock().unwrap(), ["end level", "init menu", "update menu"]);
        assert!(scenes.has_previous());
    }

    #[test]
    fn clearing_leaves_nothing_current() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut scenes = SceneManager::new();
        scenes.set_scene(probe("menu", &log));
        scenes.set_scene(None);
        assert!(!scenes.has_current());
        let mut ctx = EngineCtx::new(Size::new(64, 64));
        scenes.update(&mut ctx, 1.0).unwrap();
        assert_eq!(*log.lock().unwrap(), ["init menu", "end menu"]);
    }

    #[test]
    fn restore_without_previous_is_noop() {
        let mut scenes = SceneManager::new();
        scenes.restore_previous();
        assert!(!scenes.has_current());
    }
}
