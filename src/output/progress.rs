use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, trace};

/// Starts animated status lines.
///
/// The channel owns at most one handle at a time and talks to the terminal
/// animation only through these two traits.
pub trait SpinnerDriver: Send + Sync {
    /// Begins a status line that starts animating once `delay` has elapsed.
    fn start(&self, message: &str, delay: Duration) -> Box<dyn SpinnerHandle>;
}

pub trait SpinnerHandle: Send {
    /// Replaces the displayed text in place.
    fn set_text(&mut self, message: &str);

    /// Halts the animation and clears the line.
    fn stop(self: Box<Self>);
}

/// Spinner driver drawing `indicatif` spinners on stderr.
#[derive(Debug, Clone)]
pub struct IndicatifDriver {
    tick: Duration,
}

impl IndicatifDriver {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }
}

impl Default for IndicatifDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(80))
    }
}

impl SpinnerDriver for IndicatifDriver {
    fn start(&self, message: &str, delay: Duration) -> Box<dyn SpinnerHandle> {
        let pb = create_spinner(message.to_string());
        let slot = Arc::new(Mutex::new(Some(pb.clone())));

        debug!("Starting spinner with a {}ms delay", delay.as_millis());
        let pending = Arc::clone(&slot);
        let tick = self.tick;
        thread::spawn(move || {
            thread::sleep(delay);
            let guard = pending.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(pb) = guard.as_ref() {
                trace!("Revealing spinner");
                pb.set_draw_target(ProgressDrawTarget::stderr());
                pb.enable_steady_tick(tick);
            }
        });

        Box::new(IndicatifHandle { pb, slot })
    }
}

/// A spinner that stays hidden until its reveal thread fires.
///
/// The slot is shared with that thread; emptying it under the lock
/// guarantees nothing is drawn after `stop`.
struct IndicatifHandle {
    pb: ProgressBar,
    slot: Arc<Mutex<Option<ProgressBar>>>,
}

impl SpinnerHandle for IndicatifHandle {
    fn set_text(&mut self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn stop(self: Box<Self>) {
        let mut guard = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        guard.take();
        self.pb.finish_and_clear();
        trace!("Spinner stopped");
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb
}
