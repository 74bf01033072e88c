//! Sleep: an animated skip to the next sunrise.
//!
//! The skip is interpolated over several frames. Each step moves the clock
//! along an ease-in-out curve and reports every boundary the synthetic time
//! crosses, so day-driven effects fire exactly as they would in real time.
//! Once started, a run always completes.

use crate::shared::*;

use super::forward_distance;

/// Reference span the base duration is tuned for.
const REFERENCE_HOURS: f32 = 8.0;
const MIN_DURATION_SECS: f32 = 0.6;

/// Real seconds a skip of `hours_to_target` takes.
pub fn eased_duration(base_duration_secs: f32, hours_to_target: f32) -> f32 {
    let base = base_duration_secs.max(0.0);
    let scaled = (base * hours_to_target / REFERENCE_HOURS).max(MIN_DURATION_SECS);
    scaled.min(base)
}

/// Cubic ease-in-out on [0, 1].
pub fn ease_in_out(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    p * p * (3.0 - 2.0 * p)
}

impl Clock {
    /// Begin skipping to the next sunrise. Returns false if a skip is already
    /// running.
    pub fn fast_forward_to_next_sunrise(&mut self, base_duration_secs: f32) -> bool {
        if self.fast_forward.is_some() {
            return false;
        }

        let mut hours = forward_distance(self.current_time, self.sunrise_hour);
        if hours <= 0.0 {
            hours = HOURS_PER_DAY;
        }

        self.fast_forward = Some(FastForwardRun {
            start_time: self.current_time,
            hours_to_target: hours,
            duration: eased_duration(base_duration_secs, hours),
            elapsed: 0.0,
            crossed_sunrise: false,
        });
        true
    }

    /// Advance the running skip by `delta_seconds` of real time.
    ///
    /// The final step lands exactly on sunrise. If no step numerically crossed
    /// it, the sunrise and day change are reported once on that final step.
    pub fn step_fast_forward(&mut self, delta_seconds: f32) -> Vec<ClockSignal> {
        let Some(mut run) = self.fast_forward.take() else {
            return vec![ClockSignal::Tick(self.current_time)];
        };

        run.elapsed += delta_seconds.max(0.0);
        let progress = if run.duration <= 0.0 {
            1.0
        } else {
            (run.elapsed / run.duration).min(1.0)
        };
        let finished = progress >= 1.0;

        let prev = self.current_time;
        let was_daytime = self.is_daytime();
        let now = if finished {
            self.sunrise_hour.rem_euclid(HOURS_PER_DAY)
        } else {
            (run.start_time + run.hours_to_target * ease_in_out(progress)).rem_euclid(HOURS_PER_DAY)
        };
        self.current_time = now;

        let mut signals = self.boundary_signals(prev, now);
        if signals.contains(&ClockSignal::Sunrise) {
            run.crossed_sunrise = true;
        }

        if finished {
            if !run.crossed_sunrise {
                self.day_number = self.day_number.saturating_add(1);
                signals.push(ClockSignal::Sunrise);
                signals.push(ClockSignal::DayChanged(self.day_number));
                if !was_daytime && self.is_daytime() {
                    signals.push(ClockSignal::PhaseChanged(true));
                }
            }
        } else {
            self.fast_forward = Some(run);
        }

        signals.push(ClockSignal::Tick(self.current_time));
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_at(hour: f32) -> Clock {
        let mut clock = Clock::new(&ClockConfig::default());
        clock.current_time = hour;
        clock
    }

    /// Step until the run completes, collecting every signal.
    fn run_to_end(clock: &mut Clock, step: f32) -> Vec<ClockSignal> {
        let mut all = Vec::new();
        for _ in 0..10_000 {
            all.extend(clock.step_fast_forward(step));
            if !clock.is_fast_forwarding() {
                return all;
            }
        }
        panic!("fast-forward never finished");
    }

    fn sunrises(signals: &[ClockSignal]) -> usize {
        signals.iter().filter(|s| **s == ClockSignal::Sunrise).count()
    }

    #[test]
    fn test_eased_duration_clamps() {
        assert!((eased_duration(5.0, 8.0) - 5.0).abs() < 1e-6);
        assert!((eased_duration(5.0, 4.0) - 2.5).abs() < 1e-6);
        assert!((eased_duration(5.0, 0.1) - 0.6).abs() < 1e-6);
        assert!((eased_duration(5.0, 24.0) - 5.0).abs() < 1e-6);
        // base below the floor wins
        assert!((eased_duration(0.3, 8.0) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_ease_in_out_endpoints_and_monotonic() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = ease_in_out(i as f32 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_sleep_from_evening_lands_on_sunrise_next_day() {
        let mut clock = clock_at(22.0);
        assert!(clock.fast_forward_to_next_sunrise(5.0));
        let signals = run_to_end(&mut clock, 0.1);
        assert_eq!(clock.current_time, 8.0);
        assert_eq!(clock.day_number, 2);
        assert_eq!(sunrises(&signals), 1);
        assert!(signals.contains(&ClockSignal::DayChanged(2)));
    }

    #[test]
    fn test_sleep_before_sunset_reports_sunset_first() {
        let mut clock = clock_at(18.0);
        clock.fast_forward_to_next_sunrise(5.0);
        let signals = run_to_end(&mut clock, 0.05);
        let sunset = signals
            .iter()
            .position(|s| *s == ClockSignal::PhaseChanged(false))
            .unwrap();
        let sunrise = signals.iter().position(|s| *s == ClockSignal::Sunrise).unwrap();
        assert!(sunset < sunrise);
        assert_eq!(clock.day_number, 2);
    }

    #[test]
    fn test_sleep_at_sunrise_skips_a_full_day() {
        let mut clock = clock_at(8.0);
        clock.fast_forward_to_next_sunrise(5.0);
        assert_eq!(
            clock.fast_forward.as_ref().map(|r| r.hours_to_target),
            Some(HOURS_PER_DAY)
        );
        let signals = run_to_end(&mut clock, 0.1);
        assert_eq!(clock.day_number, 2);
        assert_eq!(sunrises(&signals), 1);
    }

    #[test]
    fn test_degenerate_duration_fires_sunrise_once() {
        let mut clock = clock_at(3.0);
        clock.fast_forward_to_next_sunrise(0.0);
        let signals = clock.step_fast_forward(0.0);
        assert!(!clock.is_fast_forwarding());
        assert_eq!(clock.current_time, 8.0);
        assert_eq!(clock.day_number, 2);
        assert_eq!(sunrises(&signals), 1);
    }

    #[test]
    fn test_second_request_is_ignored() {
        let mut clock = clock_at(22.0);
        assert!(clock.fast_forward_to_next_sunrise(5.0));
        let before = clock.fast_forward.clone();
        clock.step_fast_forward(0.2);
        assert!(!clock.fast_forward_to_next_sunrise(1.0));
        assert_eq!(
            clock.fast_forward.as_ref().map(|r| r.start_time),
            before.map(|r| r.start_time)
        );
    }

    #[test]
    fn test_real_time_advance_is_frozen_during_skip() {
        let mut clock = clock_at(22.0);
        clock.fast_forward_to_next_sunrise(5.0);
        let signals = clock.advance(100.0);
        assert_eq!(signals, vec![ClockSignal::Tick(22.0)]);
    }

    #[test]
    fn test_time_moves_forward_every_step() {
        let mut clock = clock_at(22.0);
        clock.fast_forward_to_next_sunrise(5.0);
        let mut travelled = 0.0;
        let mut prev = clock.current_time;
        while clock.is_fast_forwarding() {
            clock.step_fast_forward(0.25);
            let moved = forward_distance(prev, clock.current_time);
            assert!(moved < 12.0, "a single step jumped {} hours", moved);
            travelled += moved;
            prev = clock.current_time;
        }
        assert!((travelled - 10.0).abs() < 1e-3);
    }
}
