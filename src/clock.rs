//! Fixed-period tick thread
//!
//! Each iteration records its start time, runs one step, then sleeps out the
//! rest of the period. A step that overruns the period is followed by the
//! next one immediately; lost time is never made up.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A running tick thread that owns its state `T` until stopped
pub struct GameClock<T: Send + 'static> {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<T>>,
    period: Duration,
}

impl<T: Send + 'static> GameClock<T> {
    /// Spawn a named thread calling `step(&mut state)` every `period`
    pub fn start<F>(name: &str, period: Duration, state: T, mut step: F) -> io::Result<Self>
    where
        F: FnMut(&mut T) + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                let mut state = state;
                while flag.load(Ordering::Acquire) {
                    let started = Instant::now();
                    step(&mut state);

                    let deadline = started + period;
                    let mut now = Instant::now();
                    if now > deadline {
                        log::debug!("Tick overran period by {:?}", now - deadline);
                    }
                    // Parked rather than slept so `stop` can cut the wait short
                    while now < deadline && flag.load(Ordering::Acquire) {
                        thread::park_timeout(deadline - now);
                        now = Instant::now();
                    }
                }
                state
            })?;

        log::debug!("Clock '{}' started at {:?} per tick", name, period);
        Ok(Self {
            running,
            handle: Some(handle),
            period,
        })
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the thread and wait for it to finish its current tick.
    ///
    /// Returns the state, or `None` if a step panicked.
    pub fn stop(mut self) -> Option<T> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<T> {
        self.running.store(false, Ordering::Release);
        let handle = self.handle.take()?;
        handle.thread().unpark();
        match handle.join() {
            Ok(state) => Some(state),
            Err(_) => {
                log::error!("Tick thread panicked");
                None
            }
        }
    }
}

impl<T: Send + 'static> Drop for GameClock<T> {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_and_returns_state() {
        let clock = GameClock::start("test-clock", Duration::from_millis(2), 0u32, |n| *n += 1)
            .unwrap();
        assert!(clock.is_running());
        assert_eq!(clock.period(), Duration::from_millis(2));
        thread::sleep(Duration::from_millis(40));
        let count = clock.stop().unwrap();
        assert!(count >= 1);
    }

    #[test]
    fn test_no_catch_up_after_overrun() {
        let period = Duration::from_millis(1);
        let step_time = Duration::from_millis(5);
        let begun = Instant::now();
        let clock = GameClock::start("overrun", period, 0u32, move |n| {
            thread::sleep(step_time);
            *n += 1;
        })
        .unwrap();
        thread::sleep(Duration::from_millis(50));
        let count = clock.stop().unwrap();
        let elapsed = begun.elapsed();
        // Every step takes longer than the period, so the count is bounded by
        // wall time over step time, never by wall time over period
        let ceiling = (elapsed.as_millis() / step_time.as_millis()) as u32 + 1;
        assert!(count <= ceiling, "{count} ticks in {elapsed:?}");
    }

    #[test]
    fn test_stop_does_not_wait_out_long_period() {
        let clock =
            GameClock::start("slow", Duration::from_secs(30), (), |_| {}).unwrap();
        thread::sleep(Duration::from_millis(10));
        let begun = Instant::now();
        assert!(clock.stop().is_some());
        assert!(begun.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_drop_stops_thread() {
        let seen = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&seen);
        {
            let _clock = GameClock::start("dropped", Duration::from_secs(30), (), move |_| {
                flag.store(true, Ordering::Release);
            })
            .unwrap();
            thread::sleep(Duration::from_millis(10));
        }
        assert!(seen.load(Ordering::Acquire));
    }
}
