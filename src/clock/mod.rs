//! Clock domain: continuous time, day rollover and sleep.
//!
//! Responsible for:
//! - Advancing continuous in-game time from real frame time
//! - Detecting sunrise / sunset crossings (wrap-safe) and rolling the day
//! - Pausing / resuming time based on SimState
//! - The sleep fast-forward to the next sunrise
//!
//! All time math lives on `Clock` itself and returns `ClockSignal`s in
//! emission order; the systems here only translate those into events.

pub mod fast_forward;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::shared::*;

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (SimSet::Actions, SimSet::Clock, SimSet::DayReaction).chain(),
        )
        .add_systems(OnEnter(SimState::Playing), resume_time)
        .add_systems(OnExit(SimState::Playing), pause_time)
        // Ticks keep flowing while paused so dependents can resync.
        .add_systems(
            Update,
            (handle_sleep_request, tick_clock)
                .chain()
                .in_set(SimSet::Clock)
                .run_if(not(in_state(SimState::Loading))),
        );
    }
}

// ─── Time math ────────────────────────────────────────────────────────────────

/// Forward distance in hours from `from` to `to` around the 24h dial.
pub fn forward_distance(from: f32, to: f32) -> f32 {
    (to - from).rem_euclid(HOURS_PER_DAY)
}

/// True if moving forward from `prev` to `now` passes `threshold`.
///
/// The interval is closed at `now` and open at `prev`, and a move that wraps
/// past midnight is treated as `[prev, 24) ∪ [0, now]`, so one update can
/// report a given threshold at most once.
pub fn crossed_forward(prev: f32, now: f32, threshold: f32) -> bool {
    if (prev - now).abs() <= f32::EPSILON {
        return false;
    }
    if prev <= now {
        prev < threshold && now >= threshold
    } else {
        prev < threshold || now >= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Sunrise,
    Sunset,
}

impl Clock {
    /// Advance by `delta_seconds` of real time.
    ///
    /// Does nothing but tick while paused or while a fast-forward owns the
    /// clock.
    pub fn advance(&mut self, delta_seconds: f32) -> Vec<ClockSignal> {
        if self.paused || self.is_fast_forwarding() {
            return vec![ClockSignal::Tick(self.current_time)];
        }

        let prev = self.current_time;
        let hours = delta_seconds.max(0.0) * self.hours_per_second();
        self.current_time = (prev + hours).rem_euclid(HOURS_PER_DAY);

        let mut signals = self.boundary_signals(prev, self.current_time);
        signals.push(ClockSignal::Tick(self.current_time));
        signals
    }

    pub fn set_paused(&mut self, paused: bool) -> Vec<ClockSignal> {
        self.paused = paused;
        vec![ClockSignal::Tick(self.current_time)]
    }

    pub fn set_day(&mut self, day: u32) -> Vec<ClockSignal> {
        self.day_number = day.max(1);
        vec![ClockSignal::DayChanged(self.day_number)]
    }

    pub fn set_time(&mut self, hour: f32) -> Vec<ClockSignal> {
        self.current_time = hour.rem_euclid(HOURS_PER_DAY);
        vec![
            ClockSignal::PhaseChanged(self.is_daytime()),
            ClockSignal::Tick(self.current_time),
        ]
    }

    /// Sunrise / sunset crossings between `prev` and `now`, in chronological
    /// order. A sunrise crossing rolls the day.
    pub(crate) fn boundary_signals(&mut self, prev: f32, now: f32) -> Vec<ClockSignal> {
        let mut crossings: Vec<(f32, Boundary)> = Vec::with_capacity(2);
        if crossed_forward(prev, now, self.sunrise_hour) {
            crossings.push((forward_distance(prev, self.sunrise_hour), Boundary::Sunrise));
        }
        if crossed_forward(prev, now, self.sunset_hour) {
            crossings.push((forward_distance(prev, self.sunset_hour), Boundary::Sunset));
        }
        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut signals = Vec::new();
        for (_, boundary) in crossings {
            match boundary {
                Boundary::Sunrise => signals.extend(self.roll_day()),
                Boundary::Sunset => signals.push(ClockSignal::PhaseChanged(false)),
            }
        }
        signals
    }

    fn roll_day(&mut self) -> [ClockSignal; 3] {
        self.day_number = self.day_number.saturating_add(1);
        [
            ClockSignal::Sunrise,
            ClockSignal::DayChanged(self.day_number),
            ClockSignal::PhaseChanged(true),
        ]
    }
}

// ─── Event plumbing ───────────────────────────────────────────────────────────

/// Every notification the clock can produce.
#[derive(SystemParam)]
pub struct ClockWriters<'w> {
    pub sunrise: EventWriter<'w, SunriseEvent>,
    pub day_changed: EventWriter<'w, DayChangedEvent>,
    pub phase_changed: EventWriter<'w, PhaseChangedEvent>,
    pub tick: EventWriter<'w, ClockTickEvent>,
}

impl ClockWriters<'_> {
    pub fn emit(&mut self, signals: &[ClockSignal]) {
        for signal in signals {
            match *signal {
                ClockSignal::Sunrise => {
                    self.sunrise.send(SunriseEvent);
                }
                ClockSignal::DayChanged(day) => {
                    info!("[Clock] Day {} begins", day);
                    self.day_changed.send(DayChangedEvent { day });
                }
                ClockSignal::PhaseChanged(is_daytime) => {
                    self.phase_changed.send(PhaseChangedEvent { is_daytime });
                }
                ClockSignal::Tick(time) => {
                    self.tick.send(ClockTickEvent { time });
                }
            }
        }
    }
}

// ─── Systems ──────────────────────────────────────────────────────────────────

fn resume_time(mut clock: ResMut<Clock>, mut writers: ClockWriters) {
    let signals = clock.set_paused(false);
    writers.emit(&signals);
    info!(
        "[Clock] Time resumed at {}, day {}",
        clock.formatted_time(),
        clock.day_number
    );
}

fn pause_time(mut clock: ResMut<Clock>, mut writers: ClockWriters) {
    let signals = clock.set_paused(true);
    writers.emit(&signals);
    info!("[Clock] Time paused");
}

/// Starts the fast-forward. Requests that arrive mid-skip are ignored.
fn handle_sleep_request(mut requests: EventReader<SleepRequestEvent>, mut clock: ResMut<Clock>) {
    for request in requests.read() {
        let base = request.base_duration_secs.unwrap_or(clock.sleep_base_seconds);
        if clock.fast_forward_to_next_sunrise(base) {
            info!(
                "[Clock] Sleeping from {} (day {})",
                clock.formatted_time(),
                clock.day_number
            );
        } else {
            debug!("[Clock] Sleep request ignored, already fast-forwarding");
        }
    }
}

/// Drives either real-time advance or the fast-forward interpolation.
fn tick_clock(time: Res<Time>, mut clock: ResMut<Clock>, mut writers: ClockWriters) {
    let delta = time.delta_secs();
    let signals = if clock.is_fast_forwarding() && !clock.paused {
        clock.step_fast_forward(delta)
    } else {
        clock.advance(delta)
    };
    writers.emit(&signals);
}
