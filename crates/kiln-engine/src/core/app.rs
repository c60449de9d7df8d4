use crate::batch::Batch;

use super::ctx::EngineCtx;

/// Control directive returned by update.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract.
///
/// All three callbacks run on the loop thread. Any error they return is
/// fatal.
pub trait App: Send + 'static {
    /// Called once before the first pass.
    fn init(&mut self, ctx: &mut EngineCtx) -> anyhow::Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called once per owed update step. `delta` is the live step
    /// accumulator, which is at least 1.0.
    fn update(&mut self, ctx: &mut EngineCtx, delta: f64) -> anyhow::Result<AppControl>;

    /// Called once per visible frame.
    fn render(&mut self, batch: &mut Batch<'_>) -> anyhow::Result<()>;
}
