use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// Rendering trigger mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Render at fixed intervals.
    Interval(Duration),
    /// Render after state changes (tick or crossterm event).
    #[default]
    OnDirty,
    /// Render after state changes, but with minimum interval between renders.
    ///
    /// If events occur faster than the interval, they are batched into one render.
    Throttled(Duration),
}

impl RenderMode {
    /// Creates `Interval` mode from frame rate (FPS).
    #[must_use]
    pub fn interval_from_rate(rate: f64) -> Self {
        Self::Interval(Duration::from_secs_f64(1.0 / rate))
    }

    /// Creates `Throttled` mode from frame rate (FPS).
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Tick deadline tracking for an interval that may change between ticks.
#[derive(Debug, Clone, Copy)]
struct TickTimer {
    interval: Option<Duration>,
    last_tick: Instant,
}

impl TickTimer {
    fn new(now: Instant) -> Self {
        Self {
            interval: None,
            last_tick: now,
        }
    }

    fn set_interval(&mut self, interval: Option<Duration>, now: Instant) {
        if self.interval.is_none() && interval.is_some() {
            self.last_tick = now;
        }
        self.interval = interval;
    }

    fn next_tick_at(&self) -> Option<Instant> {
        self.interval.map(|interval| self.last_tick + interval)
    }

    fn poll(&mut self, now: Instant) -> bool {
        match self.next_tick_at() {
            Some(at) if at <= now => {
                self.last_tick = now;
                true
            }
            _ => false,
        }
    }
}

/// Event loop state management.
///
/// Decides whether the next event is a tick, a render, or terminal input.
#[derive(Debug)]
pub(super) struct EventLoop {
    ticks: TickTimer,
    render_mode: RenderMode,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        let past_time = now.checked_sub(Duration::from_secs(86400)).unwrap_or(now);
        Self {
            ticks: TickTimer::new(now),
            render_mode: RenderMode::default(),
            last_render: past_time,
            dirty: true, // first frame
        }
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Returns the next event.
    ///
    /// Blocks until a tick/render time is reached or a crossterm event
    /// occurs. `tick_interval` is the app's current interval; `None` means
    /// no ticks are generated.
    pub(super) fn next(&mut self, tick_interval: Option<Duration>) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(tick_interval, now) {
                return Ok(event);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn due_event(&mut self, tick_interval: Option<Duration>, now: Instant) -> Option<TuiEvent> {
        self.ticks.set_interval(tick_interval, now);
        if self.ticks.poll(now) {
            self.dirty = true;
            return Some(TuiEvent::Tick);
        }

        let do_render = match self.render_mode {
            RenderMode::Interval(interval) => now.duration_since(self.last_render) >= interval,
            RenderMode::OnDirty => self.dirty,
            RenderMode::Throttled(interval) => {
                self.dirty && now.duration_since(self.last_render) >= interval
            }
        };
        if do_render {
            self.last_render = now;
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.ticks.next_tick_at();
        let next_render_at = match self.render_mode {
            RenderMode::Interval(interval) => Some(self.last_render + interval),
            RenderMode::OnDirty => self.dirty.then_some(now),
            RenderMode::Throttled(interval) => self.dirty.then(|| self.last_render + interval),
        };
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
