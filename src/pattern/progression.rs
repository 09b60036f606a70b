//! The I–V–vi–IV progression in C that the loop cycles through.

/// One harmonic position in the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    pub name: &'static str,
    /// Triad, lowest note first, in Hz
    pub notes: [f32; 3],
    /// Bass root in Hz
    pub bass: f32,
}

/// Beats each chord is held for.
pub const BEATS_PER_CHORD: u64 = 4;
/// Beats before the progression repeats.
pub const PATTERN_LENGTH: u64 = BEATS_PER_CHORD * PROGRESSION.len() as u64;

pub const PROGRESSION: [Chord; 4] = [
    // C4 E4 G4, C2
    Chord {
        name: "C",
        notes: [261.63, 329.63, 392.00],
        bass: 65.41,
    },
    // G3 B3 D4, G1
    Chord {
        name: "G",
        notes: [196.00, 246.94, 293.66],
        bass: 49.00,
    },
    // A3 C4 E4, A1
    Chord {
        name: "Am",
        notes: [220.00, 261.63, 329.63],
        bass: 55.00,
    },
    // F3 A3 C4, F1
    Chord {
        name: "F",
        notes: [174.61, 220.00, 261.63],
        bass: 43.65,
    },
];

/// Which of the four chords is sounding on `beat_index`.
#[inline]
pub fn chord_slot(beat_index: u64) -> usize {
    ((beat_index / BEATS_PER_CHORD) % PROGRESSION.len() as u64) as usize
}

#[inline]
pub fn chord_at(beat_index: u64) -> &'static Chord {
    &PROGRESSION[chord_slot(beat_index)]
}
