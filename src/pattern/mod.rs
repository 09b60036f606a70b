/*
Beat Pattern
============

One bar is four beats; the progression is four bars (16 beats) long.

    beat % 4:     0      1      2      3
    kick          x             (x)            (x) = syncopated, p = 0.7
    snare                x             x
    hi-hat        xx     xx     xx     xx      beat and the "and"
    bass          xx     xx     xx     xx      chord root, same offsets
    chord         x      x      x      x       full triad

Everything about a beat is a function of its index except the syncopated
kick, which is drawn from the random source passed in. Hand it a seeded or
stepped generator and the whole pattern is reproducible.

Within a beat, directives are listed kick → snare → hats → bass → chord.
Offsets are seconds after the beat's scheduled time.
*/

pub mod progression;

use rand::Rng;

pub use progression::{chord_at, chord_slot, Chord, BEATS_PER_CHORD, PATTERN_LENGTH, PROGRESSION};

/// Probability of the kick on the third beat of each bar.
pub const DEFAULT_SYNCOPATION: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    Kick,
    Snare,
    HiHat,
    Bass,
    Chord,
}

/// One sound to trigger within a beat.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Kick,
    Snare,
    HiHat { offset: f64 },
    Bass { offset: f64, frequency: f32 },
    Chord { frequencies: [f32; 3] },
}

impl Directive {
    pub fn instrument(&self) -> Instrument {
        match self {
            Directive::Kick => Instrument::Kick,
            Directive::Snare => Instrument::Snare,
            Directive::HiHat { .. } => Instrument::HiHat,
            Directive::Bass { .. } => Instrument::Bass,
            Directive::Chord { .. } => Instrument::Chord,
        }
    }

    /// Seconds after the beat time this directive sounds.
    pub fn offset(&self) -> f64 {
        match self {
            Directive::HiHat { offset } | Directive::Bass { offset, .. } => *offset,
            Directive::Kick | Directive::Snare | Directive::Chord { .. } => 0.0,
        }
    }
}

/// Everything that sounds on one beat.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatEvent {
    pub beat_index: u64,
    pub directives: Vec<Directive>,
}

impl BeatEvent {
    pub fn has(&self, instrument: Instrument) -> bool {
        self.directives.iter().any(|d| d.instrument() == instrument)
    }

    pub fn count(&self, instrument: Instrument) -> usize {
        self.directives
            .iter()
            .filter(|d| d.instrument() == instrument)
            .count()
    }

    pub fn chord(&self) -> &'static Chord {
        chord_at(self.beat_index)
    }
}

/// Decide what plays on `beat_index`.
///
/// `syncopation` is the chance of the extra kick on `beat % 4 == 2`; it is
/// the only draw made from `rng`.
pub fn generate_beat_event<R: Rng + ?Sized>(
    beat_index: u64,
    seconds_per_beat: f64,
    syncopation: f64,
    rng: &mut R,
) -> BeatEvent {
    let chord = chord_at(beat_index);
    let position = beat_index % 4;
    let half = seconds_per_beat / 2.0;
    let mut directives = Vec::with_capacity(7);

    let kick = match position {
        0 => true,
        2 => rng.gen_bool(syncopation.clamp(0.0, 1.0)),
        _ => false,
    };
    if kick {
        directives.push(Directive::Kick);
    }

    if position == 1 || position == 3 {
        directives.push(Directive::Snare);
    }

    for offset in [0.0, half] {
        directives.push(Directive::HiHat { offset });
    }

    for offset in [0.0, half] {
        directives.push(Directive::Bass {
            offset,
            frequency: chord.bass,
        });
    }

    directives.push(Directive::Chord {
        frequencies: chord.notes,
    });

    BeatEvent {
        beat_index,
        directives,
    }
}
