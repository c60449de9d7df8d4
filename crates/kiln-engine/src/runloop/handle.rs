use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crossbeam_channel::Sender;

use super::Command;

/// Frames rendered and updates run during the last full second.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LoopStats {
    pub fps: u32,
    pub ups: u32,
}

impl fmt::Display for LoopStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fps, {} ups", self.fps, self.ups)
    }
}

/// Flags and counters shared between the loop thread and its handles.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub running: AtomicBool,
    pub stop: AtomicBool,
    fps: AtomicU32,
    ups: AtomicU32,
}

impl Shared {
    pub fn publish(&self, stats: LoopStats) {
        self.fps.store(stats.fps, Ordering::Relaxed);
        self.ups.store(stats.ups, Ordering::Relaxed);
    }

    pub fn stats(&self) -> LoopStats {
        LoopStats {
            fps: self.fps.load(Ordering::Relaxed),
            ups: self.ups.load(Ordering::Relaxed),
        }
    }
}

/// Cross-thread control surface of a [`RunLoop`](super::RunLoop).
#[derive(Debug, Clone)]
pub struct LoopHandle {
    shared: Arc<Shared>,
    commands: Sender<Command>,
}

impl LoopHandle {
    pub(crate) fn new(shared: Arc<Shared>, commands: Sender<Command>) -> Self {
        Self { shared, commands }
    }

    /// Requests a stop. The pass in flight completes first.
    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Queues `command` for the loop thread. Returns `false` once the loop
    /// has been dropped.
    pub fn post(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn stats(&self) -> LoopStats {
        self.shared.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_display() {
        let stats = LoopStats { fps: 60, ups: 59 };
        assert_eq!(stats.to_string(), "60 fps, 59 ups");
    }

    #[test]
    fn post_fails_after_receiver_drops() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = LoopHandle::new(Arc::new(Shared::default()), tx);
        assert!(handle.post(Command::Invalidate));
        assert_eq!(rx.try_recv(), Ok(Command::Invalidate));
        drop(rx);
        assert!(!handle.post(Command::Invalidate));
    }

    #[test]
    fn stop_sets_flag_and_stats_round_trip() {
        let shared = Arc::new(Shared::default());
        let (tx, _rx) = crossbeam_channel::unbounded();
        let handle = LoopHandle::new(Arc::clone(&shared), tx);
        handle.stop();
        assert!(shared.stop.load(Ordering::Acquire));
        shared.publish(LoopStats { fps: 30, ups: 60 });
        assert_eq!(handle.stats(), LoopStats { fps: 30, ups: 60 });
    }
}
