use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Paces the run loop: `tick` returns when the next cycle is due.
pub trait Clock {
    fn tick(&mut self);
}

/// any `FnMut()` can pace the loop
impl<F: FnMut()> Clock for F {
    fn tick(&mut self) {
        self()
    }
}

/// Real-time clock ticking `hz` times a second.
///
/// Sleeps against a running deadline rather than a fixed period, so time spent
/// executing the cycle is absorbed. If we fall behind (e.g. a long render) the
/// deadline is reset instead of firing a burst of catch-up ticks.
pub struct SpinClock {
    period: Duration,
    next: Option<Instant>,
}

impl SpinClock {
    pub fn new(hz: u32) -> Self {
        SpinClock {
            period: Duration::from_secs(1) / hz.max(1),
            next: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Clock for SpinClock {
    fn tick(&mut self) {
        let now = Instant::now();
        match self.next {
            Some(due) if due > now => {
                spin_sleep::sleep(due - now);
                self.next = Some(due + self.period);
            }
            _ => self.next = Some(now + self.period),
        }
    }
}

/// never waits; for tests and running flat out
pub struct FreeRunning;

impl Clock for FreeRunning {
    fn tick(&mut self) {}
}

/// Cooperative stop request shared between the run loop and whoever wants it
/// to halt. Cloning hands out another handle to the same flag; stopping more
/// than once is harmless.
#[derive(Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Stop when the process gets SIGINT, SIGTERM or SIGHUP. A process can
    /// only install this once.
    pub fn stop_on_signals(&self) -> Result<(), ctrlc::Error> {
        let handle = self.clone();
        ctrlc::set_handler(move || handle.stop())
    }
}
