//! Capability traits for the presentation layer.
//!
//! The core never touches the DOM: it reports through a `NotificationSink`
//! and fires an optional `CelebrationEffect` per level-up. The session
//! discards effect failures on purpose.

use crate::progression::LevelUpEvent;

/// Receives user-visible, non-blocking notifications (toasts on the web).
pub trait NotificationSink {
    fn notify(&mut self, message: &str);
}

/// Routes notifications to the log (native builds, tests).
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, message: &str) {
        log::info!("{message}");
    }
}

/// One-shot visual effect for a level-up (confetti on the web).
///
/// Callers ignore the result by contract: a missing or broken effect must
/// never affect progression.
pub trait CelebrationEffect {
    fn fire(&mut self, event: &LevelUpEvent) -> Result<(), String>;
}

/// Effect that does nothing (native builds, tests).
#[derive(Debug, Default)]
pub struct NoCelebration;

impl CelebrationEffect for NoCelebration {
    fn fire(&mut self, _event: &LevelUpEvent) -> Result<(), String> {
        Ok(())
    }
}
