//! Viseme categories and per-frame engine output.
//!
//! A viseme frame is one inference-engine result for a fixed-size window of
//! audio: a likelihood per mouth-shape category, stamped with the window's
//! start time in milliseconds.

use serde::{Deserialize, Serialize};

/// Number of viseme categories produced per frame.
pub const VISEME_COUNT: usize = 15;

/// Likelihood vector, one slot per [`Viseme`] in declaration order.
pub type VisemeVector = [f32; VISEME_COUNT];

/// Mouth-shape categories, in engine slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Viseme {
    #[serde(rename = "sil")]
    Sil,
    #[serde(rename = "PP")]
    Pp,
    #[serde(rename = "FF")]
    Ff,
    #[serde(rename = "TH")]
    Th,
    #[serde(rename = "DD")]
    Dd,
    #[serde(rename = "kk")]
    Kk,
    #[serde(rename = "CH")]
    Ch,
    #[serde(rename = "SS")]
    Ss,
    #[serde(rename = "nn")]
    Nn,
    #[serde(rename = "RR")]
    Rr,
    #[serde(rename = "aa")]
    Aa,
    E,
    #[serde(rename = "ih")]
    Ih,
    #[serde(rename = "oh")]
    Oh,
    #[serde(rename = "ou")]
    Ou,
}

/// Whether each category is drawn with the mouth open, indexed by slot.
pub const MOUTH_SHAPE_OPEN: [bool; VISEME_COUNT] = [
    false, // sil
    false, // PP
    false, // FF
    false, // TH
    true,  // DD
    true,  // kk
    true,  // CH
    false, // SS
    true,  // nn
    false, // RR
    true,  // aa
    true,  // E
    true,  // ih
    true,  // oh
    false, // ou
];

impl Viseme {
    /// All categories in slot order.
    pub const ALL: [Viseme; VISEME_COUNT] = [
        Viseme::Sil,
        Viseme::Pp,
        Viseme::Ff,
        Viseme::Th,
        Viseme::Dd,
        Viseme::Kk,
        Viseme::Ch,
        Viseme::Ss,
        Viseme::Nn,
        Viseme::Rr,
        Viseme::Aa,
        Viseme::E,
        Viseme::Ih,
        Viseme::Oh,
        Viseme::Ou,
    ];

    /// Category for a slot index, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Slot index of this category.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Conventional short name ("sil", "PP", "aa", ...).
    pub fn name(self) -> &'static str {
        match self {
            Viseme::Sil => "sil",
            Viseme::Pp => "PP",
            Viseme::Ff => "FF",
            Viseme::Th => "TH",
            Viseme::Dd => "DD",
            Viseme::Kk => "kk",
            Viseme::Ch => "CH",
            Viseme::Ss => "SS",
            Viseme::Nn => "nn",
            Viseme::Rr => "RR",
            Viseme::Aa => "aa",
            Viseme::E => "E",
            Viseme::Ih => "ih",
            Viseme::Oh => "oh",
            Viseme::Ou => "ou",
        }
    }

    /// Whether this category is an open-mouth shape.
    pub fn is_open_shape(self) -> bool {
        MOUTH_SHAPE_OPEN[self.index()]
    }
}

/// Open-shape lookup by raw slot index. Out-of-range indices are closed.
pub fn is_open_shape(index: usize) -> bool {
    MOUTH_SHAPE_OPEN.get(index).copied().unwrap_or(false)
}

/// One inference-engine result for a window of audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisemeFrame {
    /// Window index from the start of recognition.
    #[serde(default)]
    pub frame_number: i32,

    /// Window start time in milliseconds.
    #[serde(rename = "frame_delay")]
    pub time_ms: i64,

    /// Per-category likelihoods.
    pub visemes: VisemeVector,

    /// Probability of laughter presence.
    #[serde(default)]
    pub laughter_score: f32,
}

impl VisemeFrame {
    /// Create a frame from a likelihood vector.
    pub fn new(frame_number: i32, time_ms: i64, visemes: VisemeVector) -> Self {
        Self {
            frame_number,
            time_ms,
            visemes,
            laughter_score: 0.0,
        }
    }

    /// A frame whose entire likelihood mass sits on a single category.
    pub fn pure(frame_number: i32, time_ms: i64, viseme: Viseme) -> Self {
        let mut visemes = [0.0; VISEME_COUNT];
        visemes[viseme.index()] = 1.0;
        Self::new(frame_number, time_ms, visemes)
    }
}

/// Parse viseme frames from JSONL content (one JSON object per line).
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_viseme_frames(jsonl: &str) -> Result<Vec<VisemeFrame>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}
