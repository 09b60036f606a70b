use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::{
    config::RetroConfig,
    engine::{
        context::{AudioContext, ContextFactory},
        scheduler::{BeatRecord, ScheduleState, Scheduler},
        timer::{TimerHandle, TimerHost},
    },
    error::Result,
    pattern::chord_at,
    synth,
};

/*
Transport
=========

Two states, nothing in between:

    STOPPED ── start() ──▶ RUNNING
       ▲                      │
       └─────── stop() ───────┘

RUNNING means a session exists: an open audio context, a schedule, and
exactly one pending poll timer. The session is created whole by `start()`
and torn down whole by `stop()`, so a later `start()` begins again from
beat zero on a new context.

Nothing here returns an error to the caller. A device that will not open
leaves the transport stopped; a voice that will not build is skipped. The
only thing the host ever observes is `is_audio_on()`.

Timer hand-off
--------------

`start()` and every `fire()` arm one timer for `lookahead_ms`. The host
calls `fire(handle)` when it expires. `stop()` cancels the pending handle
before returning, and `fire()` ignores any handle that is not the current
session's, so a tick can never run against a closed context.
*/

struct Session {
    context: Box<dyn AudioContext>,
    scheduler: Scheduler,
    timer: TimerHandle,
}

/// What the host needs to draw the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportStatus {
    pub audio_on: bool,
    pub bpm: f64,
    /// Audio-clock time, seconds
    pub time: f64,
    /// Most recently booked beat
    pub beat_index: Option<u64>,
    pub chord: Option<&'static str>,
}

pub struct Transport<F, T, R = SmallRng>
where
    F: ContextFactory,
    T: TimerHost,
    R: Rng,
{
    config: RetroConfig,
    factory: F,
    timers: T,
    rng: R,
    session: Option<Session>,
}

impl<F, T> Transport<F, T, SmallRng>
where
    F: ContextFactory,
    T: TimerHost,
{
    /// A stopped transport. Uses `config.seed` when set, OS entropy otherwise.
    pub fn new(config: RetroConfig, factory: F, timers: T) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(config, factory, timers, rng)
    }
}

impl<F, T, R> Transport<F, T, R>
where
    F: ContextFactory,
    T: TimerHost,
    R: Rng,
{
    /// A stopped transport drawing every random decision from `rng`.
    pub fn with_rng(config: RetroConfig, factory: F, timers: T, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            factory,
            timers,
            rng,
            session: None,
        })
    }

    pub fn config(&self) -> &RetroConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn is_audio_on(&self) -> bool {
        self.session.is_some()
    }

    /// Open a context and begin the loop. Returns whether audio is now on.
    pub fn start(&mut self) -> bool {
        if self.session.is_some() {
            debug!("start ignored: already running");
            return true;
        }

        let mut context = match self.factory.open() {
            Ok(context) => context,
            Err(err) => {
                warn!(%err, "audio unavailable, staying off");
                return false;
            }
        };

        if let Err(err) = context.install_compressor(self.config.compressor) {
            warn!(%err, "master compressor not installed");
        }
        if let Err(err) =
            synth::start_noise_floor(context.as_mut(), self.config.noise_floor_gain, &mut self.rng)
        {
            warn!(%err, "noise floor not started");
        }

        let now = context.current_time();
        let mut scheduler = Scheduler::new(&self.config, now + self.config.start_delay);
        scheduler.tick(context.as_mut(), &mut self.rng);
        let timer = self.timers.arm(self.config.lookahead());

        info!(
            bpm = self.config.bpm,
            sample_rate = context.sample_rate(),
            "audio started"
        );
        self.session = Some(Session {
            context,
            scheduler,
            timer,
        });
        true
    }

    /// Cancel the poll timer and close the context. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        self.timers.cancel(session.timer);
        session.context.close();
        info!(
            beats = session.scheduler.state().beat_index,
            "audio stopped"
        );
    }

    pub fn toggle(&mut self) -> bool {
        if self.is_audio_on() {
            self.stop();
            false
        } else {
            self.start()
        }
    }

    /// Deliver an expired timer. Runs one scheduler pass and re-arms if the
    /// handle belongs to the running session; otherwise does nothing.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        let Some(session) = self.session.as_mut() else {
            trace!(timer = handle.id(), "timer fired while stopped");
            return false;
        };
        if session.timer != handle {
            trace!(timer = handle.id(), "stale timer ignored");
            return false;
        }
        if session.context.is_closed() {
            warn!("audio context closed underneath the transport");
            self.stop();
            return false;
        }

        session.scheduler.tick(session.context.as_mut(), &mut self.rng);
        session.timer = self.timers.arm(self.config.lookahead());
        true
    }

    pub fn schedule_state(&self) -> Option<ScheduleState> {
        self.session.as_ref().map(|s| s.scheduler.state())
    }

    /// Beats booked in the current session, oldest first.
    pub fn recent_beats(&self) -> Vec<BeatRecord> {
        self.session
            .as_ref()
            .map(|s| s.scheduler.history().cloned().collect())
            .unwrap_or_default()
    }

    pub fn status(&self) -> TransportStatus {
        let session = self.session.as_ref();
        let beat_index = session
            .and_then(|s| s.scheduler.last_beat())
            .map(|record| record.event.beat_index);

        TransportStatus {
            audio_on: session.is_some(),
            bpm: self.config.bpm,
            time: session.map_or(0.0, |s| s.context.current_time()),
            beat_index,
            chord: beat_index.map(|beat| chord_at(beat).name),
        }
    }

    /// Pull recent output samples for display. Empty while stopped.
    pub fn drain_monitor(&mut self, sink: &mut Vec<f32>) {
        if let Some(session) = self.session.as_mut() {
            session.context.drain_monitor(sink);
        }
    }
}

impl<F, T, R> Drop for Transport<F, T, R>
where
    F: ContextFactory,
    T: TimerHost,
    R: Rng,
{
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{offline::OfflineFactory, timer::DeadlineTimers};
    use std::time::Duration;

    fn transport() -> Transport<OfflineFactory, DeadlineTimers> {
        Transport::new(
            RetroConfig::default().seed(7),
            OfflineFactory::new(48_000.0),
            DeadlineTimers::new(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = RetroConfig::default().lookahead_ms(500);
        assert!(Transport::new(config, OfflineFactory::new(48_000.0), DeadlineTimers::new()).is_err());
    }

    #[test]
    fn start_arms_exactly_one_timer() {
        let mut t = transport();
        assert!(t.start());
        assert!(t.is_audio_on());
        assert_eq!(t.timers_mut().pending(), 1);

        // Second start is a no-op
        assert!(t.start());
        assert_eq!(t.factory().opened(), 1);
        assert_eq!(t.timers_mut().pending(), 1);
    }

    #[test]
    fn first_beat_lands_after_start_delay() {
        let mut t = transport();
        t.start();
        let state = t.schedule_state().unwrap();
        assert_eq!(state.beat_index, 0);
        assert!((state.next_event_time - 0.1).abs() < 1e-12);
    }

    #[test]
    fn fire_reticks_and_rearms() {
        let mut t = transport();
        t.start();
        let renderer = t.factory().renderer().unwrap();

        let mut buf = vec![0.0f32; 2 * 1_200];
        renderer.render_interleaved(&mut buf);
        let due = t.timers_mut().advance_to(Duration::from_millis(25));
        assert_eq!(due.len(), 1);
        assert!(t.fire(due[0]));

        assert_eq!(t.schedule_state().unwrap().beat_index, 1);
        assert_eq!(t.timers_mut().pending(), 1);
        assert_eq!(t.status().chord, Some("C"));
        assert_eq!(t.recent_beats().len(), 1);

        // The old handle is spent
        assert!(!t.fire(due[0]));
    }

    #[test]
    fn toggle_flips_state() {
        let mut t = transport();
        assert!(t.toggle());
        assert!(!t.toggle());
        assert!(!t.is_audio_on());
        assert_eq!(t.timers_mut().pending(), 0);
        assert_eq!(t.status().beat_index, None);
    }

    #[test]
    fn noise_floor_runs_from_start() {
        let mut t = transport();
        t.start();
        let renderer = t.factory().renderer().unwrap();
        assert_eq!(renderer.active_voices(), 1);
    }
}
