use tracing::trace;

use crate::{
    config::CompressorSettings,
    dsp::compressor::Compressor,
    error::{Result, RetroError},
    graph::node::RenderCtx,
    voices::Voice,
    RENDER_QUANTUM,
};

/*
Mixer
=====

The render graph behind every audio context. It owns:

  - a frame clock (frames rendered since the context opened)
  - a bounded pool of voices, each with a start frame, an optional end
    frame, and a static pan
  - the master-bus compressor, once installed

Rendering walks the output in quanta of RENDER_QUANTUM frames. For each
quantum, every voice overlapping it renders exactly the frames it owns:

    quantum       |..........|..........|..........|
    voice               [=================)
                        ^ start            ^ end
    rendered            [----|----------|--)

so starts and stops are sample accurate while block-rate modulation still
updates every quantum. A voice receives `note_on` at its first rendered
frame. It retires once the clock passes its end frame, or earlier if its
node reports `is_active() == false` (an envelope that has run out).
Continuous voices (no end frame) live until `clear()`.

Retired voices are not freed here. They wait in a preallocated list until
the owner calls `drain_retired()`. The device context ships them back to
the control thread and frees them there.
*/

/// Voices the mixer will hold at once. A 105 bpm loop keeps roughly 20 alive.
pub const MAX_VOICES: usize = 256;

struct ActiveVoice {
    voice: Voice,
    start_frame: u64,
    end_frame: Option<u64>,
    started: bool,
}

pub struct Mixer {
    sample_rate: f32,
    frame: u64,
    voices: Vec<ActiveVoice>,
    capacity: usize,
    compressor: Option<Compressor>,
    retired: Vec<Voice>,
    mono: Vec<f32>,
    left: Vec<f32>,
    right: Vec<f32>,
}

impl Mixer {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_capacity(sample_rate, MAX_VOICES)
    }

    pub fn with_capacity(sample_rate: f32, capacity: usize) -> Self {
        Self {
            sample_rate,
            frame: 0,
            voices: Vec::with_capacity(capacity),
            capacity,
            compressor: None,
            retired: Vec::with_capacity(capacity),
            mono: vec![0.0; RENDER_QUANTUM],
            left: vec![0.0; RENDER_QUANTUM],
            right: vec![0.0; RENDER_QUANTUM],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds rendered so far.
    pub fn time(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn set_compressor(&mut self, settings: CompressorSettings) {
        match &mut self.compressor {
            Some(compressor) => compressor.set_settings(settings),
            None => self.compressor = Some(Compressor::new(settings)),
        }
    }

    pub fn compressor(&self) -> Option<&Compressor> {
        self.compressor.as_ref()
    }

    /// Queue `voice` to start at `at` seconds on the mixer clock.
    pub fn add(&mut self, at: f64, voice: Voice) -> Result<()> {
        if !at.is_finite() {
            return Err(RetroError::InvalidVoice(format!(
                "{} start time must be finite, got {at}",
                voice.kind().label()
            )));
        }
        if self.voices.len() >= self.capacity {
            return Err(RetroError::VoiceLimit(self.voices.len()));
        }

        let sr = self.sample_rate as f64;
        let start_frame = (at.max(0.0) * sr).round() as u64;
        let end_frame = voice
            .duration()
            .map(|d| start_frame + ((d * sr).round() as u64).max(1));

        trace!(kind = voice.kind().label(), start_frame, ?end_frame, "voice queued");
        self.voices.push(ActiveVoice {
            voice,
            start_frame,
            end_frame,
            started: false,
        });
        Ok(())
    }

    /// Retire every voice, continuous ones included.
    pub fn clear(&mut self) {
        self.retired
            .extend(self.voices.drain(..).map(|active| active.voice));
    }

    /// Voices that have finished since the last call. Dropping them is the
    /// caller's business.
    pub fn drain_retired(&mut self) -> std::vec::Drain<'_, Voice> {
        self.retired.drain(..)
    }

    /// Take back one retired voice, newest first.
    pub fn pop_retired(&mut self) -> Option<Voice> {
        self.retired.pop()
    }

    pub fn retired_voices(&self) -> usize {
        self.retired.len()
    }

    /// Render stereo output, advancing the clock by `left.len()` frames.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        let frames = left.len().min(right.len());
        let mut offset = 0;
        while offset < frames {
            let len = (frames - offset).min(RENDER_QUANTUM);
            self.render_quantum(len);
            left[offset..offset + len].copy_from_slice(&self.left[..len]);
            right[offset..offset + len].copy_from_slice(&self.right[..len]);
            offset += len;
        }
    }

    /// Render into an interleaved device buffer.
    ///
    /// Mono devices get the average of both sides; channels past the second
    /// stay silent. `tap` sees one mono sample per frame.
    pub fn render_interleaved(
        &mut self,
        data: &mut [f32],
        channels: usize,
        mut tap: impl FnMut(f32),
    ) {
        if channels == 0 {
            return;
        }
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let len = (total_frames - frames_written).min(RENDER_QUANTUM);
            self.render_quantum(len);

            let out_off = frames_written * channels;
            for i in 0..len {
                let (l, r) = (self.left[i], self.right[i]);
                let mono = 0.5 * (l + r);
                let frame = &mut data[out_off + i * channels..out_off + (i + 1) * channels];
                match frame {
                    [only] => *only = mono,
                    [first, second, rest @ ..] => {
                        *first = l;
                        *second = r;
                        rest.fill(0.0);
                    }
                    [] => {}
                }
                tap(mono);
            }

            frames_written += len;
        }
    }

    fn render_quantum(&mut self, len: usize) {
        let quantum_start = self.frame;
        let quantum_end = quantum_start + len as u64;
        let ctx = RenderCtx::from_freq(self.sample_rate, 0.0, 1.0);

        self.left[..len].fill(0.0);
        self.right[..len].fill(0.0);

        for active in self.voices.iter_mut() {
            let from = active.start_frame.max(quantum_start);
            let to = active.end_frame.map_or(quantum_end, |end| end.min(quantum_end));
            if from >= to {
                continue;
            }

            if !active.started {
                active.voice.node_mut().note_on(&ctx);
                active.started = true;
            }

            let a = (from - quantum_start) as usize;
            let b = (to - quantum_start) as usize;
            let mono = &mut self.mono[..b - a];
            active.voice.node_mut().render_block(mono, &ctx);
            active
                .voice
                .pan()
                .mix_into(mono, &mut self.left[a..b], &mut self.right[a..b]);
        }

        let mut index = 0;
        while index < self.voices.len() {
            let active = &self.voices[index];
            let expired = active.end_frame.is_some_and(|end| end <= quantum_end);
            let silent = active.started && !active.voice.is_active();
            if expired || silent {
                let finished = self.voices.remove(index);
                self.retired.push(finished.voice);
            } else {
                index += 1;
            }
        }

        if let Some(compressor) = &mut self.compressor {
            compressor.process(&mut self.left[..len], &mut self.right[..len], self.sample_rate);
        }

        self.frame = quantum_end;
    }
}
