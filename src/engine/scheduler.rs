use std::collections::VecDeque;

use rand::Rng;
use tracing::debug;

use crate::{
    config::RetroConfig,
    engine::context::AudioContext,
    pattern::{generate_beat_event, BeatEvent},
    synth,
};

/*
Look-Ahead Scheduling
=====================

The host timer is coarse and jittery; the audio clock is sample accurate.
So the scheduler never plays anything "now". Every poll it looks a short
distance past the audio clock and books every beat that starts inside
that window, with its exact start time:

    audio clock ─────●───────────────────────────────────▶
                    now        now + schedule_ahead
                     │◀───────── horizon ─────────▶│
    beats       ─────┼─────▲───────────▲───────────┼──▲───
                           booked      booked         next poll

    poll interval (25 ms)  <  horizon (100 ms)

Because the poll interval is shorter than the horizon, a beat is always
booked at least one poll before it is due. A late poll still books it; the
mixer starts anything already in the past straight away.

`next_event_time` only moves forward, one beat at a time, so voices reach
the context in non-decreasing time order.
*/

/// Beats of history kept for display (one full progression).
pub const HISTORY_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleState {
    /// Audio-clock time of the next beat to book, in seconds
    pub next_event_time: f64,
    /// Beats booked since start. Never wraps; the pattern reduces it.
    pub beat_index: u64,
}

/// A beat that has been handed to the audio context.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatRecord {
    pub time: f64,
    pub event: BeatEvent,
    /// Voices the context accepted for this beat
    pub voices: usize,
}

pub struct Scheduler {
    state: ScheduleState,
    seconds_per_beat: f64,
    schedule_ahead: f64,
    syncopation: f64,
    history: VecDeque<BeatRecord>,
}

impl Scheduler {
    /// A fresh schedule whose first beat lands at `first_beat_time`.
    pub fn new(config: &RetroConfig, first_beat_time: f64) -> Self {
        Self {
            state: ScheduleState {
                next_event_time: first_beat_time,
                beat_index: 0,
            },
            seconds_per_beat: config.seconds_per_beat(),
            schedule_ahead: config.schedule_ahead,
            syncopation: config.syncopation,
            history: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    pub fn state(&self) -> ScheduleState {
        self.state
    }

    pub fn seconds_per_beat(&self) -> f64 {
        self.seconds_per_beat
    }

    /// Recently booked beats, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &BeatRecord> {
        self.history.iter()
    }

    pub fn last_beat(&self) -> Option<&BeatRecord> {
        self.history.back()
    }

    /// Book every beat that starts before `now + schedule_ahead`.
    ///
    /// Returns how many beats were booked.
    pub fn tick<R: Rng + ?Sized>(&mut self, context: &mut dyn AudioContext, rng: &mut R) -> usize {
        let horizon = context.current_time() + self.schedule_ahead;
        let mut booked = 0;

        while self.state.next_event_time < horizon {
            let ScheduleState {
                next_event_time: time,
                beat_index,
            } = self.state;

            let event = generate_beat_event(beat_index, self.seconds_per_beat, self.syncopation, rng);
            let voices = synth::play_beat(context, time, &event, rng);
            debug!(
                beat = beat_index,
                time,
                voices,
                chord = event.chord().name,
                "beat scheduled"
            );

            if self.history.len() == HISTORY_LEN {
                self.history.pop_front();
            }
            self.history.push_back(BeatRecord {
                time,
                event,
                voices,
            });

            self.state.next_event_time += self.seconds_per_beat;
            self.state.beat_index += 1;
            booked += 1;
        }

        booked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::CompressorSettings,
        error::Result,
        pattern::Instrument,
        voices::{Voice, VoiceKind},
    };
    use rand::{rngs::StdRng, SeedableRng};

    struct Clock {
        now: f64,
        starts: Vec<(f64, VoiceKind)>,
    }

    impl Clock {
        fn at(now: f64) -> Self {
            Self {
                now,
                starts: Vec::new(),
            }
        }
    }

    impl AudioContext for Clock {
        fn sample_rate(&self) -> f32 {
            48_000.0
        }

        fn current_time(&self) -> f64 {
            self.now
        }

        fn install_compressor(&mut self, _settings: CompressorSettings) -> Result<()> {
            Ok(())
        }

        fn schedule(&mut self, at: f64, voice: Voice) -> Result<()> {
            self.starts.push((at, voice.kind()));
            Ok(())
        }

        fn close(&mut self) {}

        fn is_closed(&self) -> bool {
            false
        }
    }

    fn config() -> RetroConfig {
        RetroConfig::default()
    }

    #[test]
    fn nothing_booked_before_the_first_beat_is_in_range() {
        let mut clock = Clock::at(0.0);
        let mut scheduler = Scheduler::new(&config(), 0.1);
        let mut rng = StdRng::seed_from_u64(0);

        // First beat at 0.1, horizon ends at 0.1: not yet
        assert_eq!(scheduler.tick(&mut clock, &mut rng), 0);
        clock.now = 0.025;
        assert_eq!(scheduler.tick(&mut clock, &mut rng), 1);
        assert_eq!(scheduler.state().beat_index, 1);
        assert!(clock.starts.iter().any(|(t, _)| *t == 0.1));
    }

    #[test]
    fn horizon_is_always_filled_but_never_overshot() {
        let config = config();
        let spb = config.seconds_per_beat();
        let mut clock = Clock::at(0.0);
        let mut scheduler = Scheduler::new(&config, 0.1);
        let mut rng = StdRng::seed_from_u64(1);

        for step in 0..2_000 {
            // Irregular polls, including a few long stalls
            clock.now += if step % 97 == 0 { 0.4 } else { 0.017 + (step % 5) as f64 * 0.004 };
            scheduler.tick(&mut clock, &mut rng);

            let next = scheduler.state().next_event_time;
            let horizon = clock.now + config.schedule_ahead;
            assert!(next >= horizon, "horizon not filled at step {step}");
            assert!(next < horizon + spb + 1e-9, "overshot at step {step}");
        }
    }

    #[test]
    fn booked_times_never_decrease() {
        let mut clock = Clock::at(0.0);
        let mut scheduler = Scheduler::new(&config(), 0.1);
        let mut rng = StdRng::seed_from_u64(2);

        let mut last_beat = f64::NEG_INFINITY;
        for _ in 0..400 {
            clock.now += 0.025;
            scheduler.tick(&mut clock, &mut rng);
            if let Some(record) = scheduler.last_beat() {
                assert!(record.time >= last_beat);
                last_beat = record.time;
            }
        }
        assert!(scheduler.state().beat_index > 10);
    }

    #[test]
    fn beats_advance_by_exactly_one_beat() {
        let config = config();
        let mut clock = Clock::at(10.0);
        let mut scheduler = Scheduler::new(&config, 10.0);
        let booked = scheduler.tick(&mut clock, &mut StdRng::seed_from_u64(3));
        assert_eq!(booked, 1);

        clock.now = 12.0;
        scheduler.tick(&mut clock, &mut StdRng::seed_from_u64(3));
        let times: Vec<_> = scheduler.history().map(|r| r.time).collect();
        for pair in times.windows(2) {
            assert!((pair[1] - pair[0] - config.seconds_per_beat()).abs() < 1e-9);
        }
    }

    #[test]
    fn history_keeps_one_progression() {
        let mut clock = Clock::at(0.0);
        let mut scheduler = Scheduler::new(&config(), 0.0);
        clock.now = 30.0;
        scheduler.tick(&mut clock, &mut StdRng::seed_from_u64(4));

        assert_eq!(scheduler.history().count(), HISTORY_LEN);
        let last = scheduler.last_beat().unwrap();
        assert_eq!(last.event.beat_index, scheduler.state().beat_index - 1);
        assert!(scheduler
            .history()
            .filter(|r| r.event.beat_index % 4 == 0)
            .all(|r| r.event.has(Instrument::Kick)));
    }
}
