//! Phase timing capability.
//!
//! Operators bracket their public entry points with named phases. The
//! collector behind [`PhaseTimer`] is injected by the caller; timing has
//! no effect on results.

/// Receives start/stop notifications for named phases.
pub trait PhaseTimer: Send + Sync {
    /// A phase began.
    fn start(&self, name: &str);
    /// A phase ended.
    fn stop(&self, name: &str);
}

/// Timer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTimer;

impl PhaseTimer for NoopTimer {
    fn start(&self, _name: &str) {}
    fn stop(&self, _name: &str) {}
}

/// Starts a phase on creation and stops it on drop, so early returns
/// still close the phase.
pub struct PhaseGuard<'a> {
    timer: &'a dyn PhaseTimer,
    name: &'a str,
}

impl<'a> PhaseGuard<'a> {
    /// Start `name` on `timer`.
    pub fn new(timer: &'a dyn PhaseTimer, name: &'a str) -> Self {
        timer.start(name);
        Self { timer, name }
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.timer.stop(self.name);
    }
}
