//! Static catalog of named EQ presets
//!
//! The catalog is compiled in, read-only and lives for the whole process.
//! Presets are not user-editable through this core; a UI may assemble its
//! own `BiquadParams` but persistence happens elsewhere.
//!
//! Descriptors carry no sample rate. The chain stamps its current rate in
//! at load time and designs every filter from scratch, so coefficients can
//! never drift out of sync with the playback format.

use serde::{Deserialize, Serialize};

use crate::biquad::FilterKind;

/// Most filter descriptors a preset may carry
pub const PRESET_MAX_FILTERS: usize = 10;

/// Preset identifier
///
/// The raw-index mapping (`from_index`) is the remote-control wire form;
/// an unknown index is an explicit `None`, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresetId {
    /// No filtering at all
    Flat,
    /// Low-end emphasis for rock
    Rock,
    /// Gentle warmth and presence
    Jazz,
    /// Subtle high-end air for orchestral material
    Classical,
    /// Mid scoop with tight bass
    Pop,
    /// Speech clarity, rolled-off rumble
    Vocal,
    /// Heavy low-shelf boost
    BassBoost,
    /// High-shelf boost
    TrebleBoost,
    /// Tuned for headphone listening (crossfeed reserved)
    Headphone,
}

impl PresetId {
    /// All catalog entries in index order
    pub const ALL: [Self; 9] = [
        Self::Flat,
        Self::Rock,
        Self::Jazz,
        Self::Classical,
        Self::Pop,
        Self::Vocal,
        Self::BassBoost,
        Self::TrebleBoost,
        Self::Headphone,
    ];

    /// Map a raw wire index to a preset id
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// The raw wire index of this preset
    pub fn index(self) -> u8 {
        Self::ALL.iter().position(|p| *p == self).unwrap_or(0) as u8
    }
}

/// One filter descriptor inside a preset (sample rate stamped at load time)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    /// Filter topology
    pub kind: FilterKind,
    /// Center/corner frequency in Hz
    pub frequency_hz: f32,
    /// Gain in dB (shelf/peak kinds only)
    pub gain_db: f32,
    /// Q factor
    pub q: f32,
}

impl FilterSpec {
    const fn new(kind: FilterKind, frequency_hz: f32, gain_db: f32, q: f32) -> Self {
        Self {
            kind,
            frequency_hz,
            gain_db,
            q,
        }
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    /// Identifier
    pub id: PresetId,
    /// Display name
    pub name: &'static str,
    /// Short description for the UI
    pub description: &'static str,
    /// Ordered filter cascade, at most `PRESET_MAX_FILTERS` entries
    pub filters: &'static [FilterSpec],
    /// Reserved: crossfeed processing is not wired into the signal path
    pub crossfeed: bool,
}

impl Preset {
    /// Fetch the catalog entry for an id
    ///
    /// Total over `PresetId`; the fallible boundary is
    /// [`PresetId::from_index`] where raw wire indices come in.
    pub fn lookup(id: PresetId) -> &'static Preset {
        // Index order matches PresetId::ALL
        &CATALOG[id.index() as usize]
    }

    /// The whole catalog in index order
    pub fn all() -> &'static [Preset] {
        CATALOG
    }
}

static CATALOG: &[Preset] = &[
    Preset {
        id: PresetId::Flat,
        name: "Flat",
        description: "No equalization",
        filters: &[],
        crossfeed: false,
    },
    Preset {
        id: PresetId::Rock,
        name: "Rock",
        description: "Low-end emphasis",
        filters: &[FilterSpec::new(FilterKind::LowShelf, 100.0, 6.0, 0.7)],
        crossfeed: false,
    },
    Preset {
        id: PresetId::Jazz,
        name: "Jazz",
        description: "Warm lows, relaxed presence",
        filters: &[
            FilterSpec::new(FilterKind::LowShelf, 80.0, 3.0, 0.7),
            FilterSpec::new(FilterKind::Peak, 1_000.0, -2.0, 1.0),
            FilterSpec::new(FilterKind::HighShelf, 8_000.0, 2.0, 0.7),
        ],
        crossfeed: false,
    },
    Preset {
        id: PresetId::Classical,
        name: "Classical",
        description: "Subtle air, controlled low mids",
        filters: &[
            FilterSpec::new(FilterKind::Peak, 300.0, -1.5, 1.0),
            FilterSpec::new(FilterKind::HighShelf, 10_000.0, 2.0, 0.7),
        ],
        crossfeed: false,
    },
    Preset {
        id: PresetId::Pop,
        name: "Pop",
        description: "Tight bass, mid scoop, bright top",
        filters: &[
            FilterSpec::new(FilterKind::LowShelf, 60.0, 4.0, 0.7),
            FilterSpec::new(FilterKind::Peak, 500.0, -2.0, 1.2),
            FilterSpec::new(FilterKind::Peak, 3_000.0, 2.0, 1.4),
            FilterSpec::new(FilterKind::HighShelf, 10_000.0, 3.0, 0.7),
        ],
        crossfeed: false,
    },
    Preset {
        id: PresetId::Vocal,
        name: "Vocal",
        description: "Speech clarity, no rumble",
        filters: &[
            FilterSpec::new(FilterKind::Highpass, 120.0, 0.0, 0.707),
            FilterSpec::new(FilterKind::Peak, 3_000.0, 4.0, 1.4),
            FilterSpec::new(FilterKind::Peak, 8_000.0, -2.0, 2.0),
        ],
        crossfeed: false,
    },
    Preset {
        id: PresetId::BassBoost,
        name: "Bass Boost",
        description: "Heavy low-shelf boost",
        filters: &[FilterSpec::new(FilterKind::LowShelf, 80.0, 8.0, 0.7)],
        crossfeed: false,
    },
    Preset {
        id: PresetId::TrebleBoost,
        name: "Treble Boost",
        description: "High-shelf boost",
        filters: &[FilterSpec::new(FilterKind::HighShelf, 8_000.0, 6.0, 0.7)],
        crossfeed: false,
    },
    Preset {
        id: PresetId::Headphone,
        name: "Headphone",
        description: "Headphone listening (crossfeed reserved)",
        filters: &[
            FilterSpec::new(FilterKind::Peak, 2_000.0, -1.0, 1.0),
            FilterSpec::new(FilterKind::HighShelf, 9_000.0, 1.5, 0.7),
        ],
        crossfeed: true,
    },
];
