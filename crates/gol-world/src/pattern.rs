//! Relative cell patterns derived from bit masks.

use gol_core::{Error, Offset, Position, Result};
use serde::{Deserialize, Serialize};

/// A bit-mask template registered under a name.
struct MaskTemplate {
    name: &'static str,
    mask: &'static [u8],
    width: usize,
    origin: Position,
}

const CENTRE: Position = Position { r: 1, c: 1 };

#[rustfmt::skip]
const TEMPLATES: &[MaskTemplate] = &[
    MaskTemplate {
        name: "adjacent",
        mask: &[
            1, 1, 1,
            1, 0, 1,
            1, 1, 1,
        ],
        width: 3,
        origin: CENTRE,
    },
    MaskTemplate {
        name: "r-pentomino",
        mask: &[
            0, 1, 1,
            1, 1, 0,
            0, 1, 0,
        ],
        width: 3,
        origin: CENTRE,
    },
    MaskTemplate {
        name: "glider",
        mask: &[
            0, 0, 1,
            1, 0, 1,
            0, 1, 1,
        ],
        width: 3,
        origin: CENTRE,
    },
    MaskTemplate {
        name: "blinker",
        mask: &[
            0, 0, 0,
            1, 1, 1,
            0, 0, 0,
        ],
        width: 3,
        origin: CENTRE,
    },
    MaskTemplate {
        name: "block",
        mask: &[
            1, 1,
            1, 1,
        ],
        width: 2,
        origin: Position { r: 0, c: 0 },
    },
];

/// Names accepted by [`RelativePattern::named`].
pub fn pattern_names() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|t| t.name)
}

/// Offsets of every set bit in a row-major `mask` of the given `width`,
/// relative to `origin` (a row/column inside the mask).
pub fn offsets_from_mask(mask: &[u8], width: usize, origin: Position) -> Result<Vec<Offset>> {
    if width == 0 || mask.len() % width != 0 {
        return Err(Error::InvalidPattern(format!(
            "mask of length {} is not a whole number of rows of width {}",
            mask.len(),
            width
        )));
    }
    let rows = (mask.len() / width) as i64;
    if origin.r < 0 || origin.r >= rows || origin.c < 0 || origin.c >= width as i64 {
        return Err(Error::InvalidPattern(format!(
            "origin {} lies outside the {}x{} mask",
            origin, width, rows
        )));
    }

    Ok(mask
        .iter()
        .enumerate()
        .filter(|&(_, &bit)| bit != 0)
        .map(|(idx, _)| {
            let (r, c) = ((idx / width) as i64, (idx % width) as i64);
            Offset::new(r - origin.r, c - origin.c)
        })
        .collect())
}

/// An immutable set of offsets relative to an origin cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativePattern {
    offsets: Vec<Offset>,
}

impl RelativePattern {
    pub fn from_mask(mask: &[u8], width: usize, origin: Position) -> Result<Self> {
        Ok(Self {
            offsets: offsets_from_mask(mask, width, origin)?,
        })
    }

    pub fn from_offsets(offsets: impl IntoIterator<Item = Offset>) -> Self {
        let mut offsets: Vec<Offset> = offsets.into_iter().collect();
        offsets.sort();
        offsets.dedup();
        Self { offsets }
    }

    /// The eight cells surrounding the origin, excluding the origin itself
    pub fn adjacent() -> Self {
        Self::template(&TEMPLATES[0])
    }

    /// Look up a catalogue pattern by (case-insensitive) name
    pub fn named(name: &str) -> Result<Self> {
        TEMPLATES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .map(Self::template)
            .ok_or_else(|| Error::UnknownPattern(name.to_string()))
    }

    fn template(t: &MaskTemplate) -> Self {
        // Catalogue masks are well formed.
        let offsets = offsets_from_mask(t.mask, t.width, t.origin).unwrap_or_default();
        Self { offsets }
    }

    pub fn offsets(&self) -> &[Offset] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Absolute wrapped positions of this pattern placed at `origin`
    pub fn to_grid(
        &self,
        origin: Position,
        width: usize,
        height: usize,
    ) -> impl Iterator<Item = Position> + '_ {
        // Reduce both terms first so the sum stays within two grid extents
        // for any i64 origin or offset.
        let origin = origin.wrap(width, height);
        self.offsets.iter().map(move |offset| {
            let shift = Position::new(offset.dr, offset.dc).wrap(width, height);
            origin.offset(Offset::new(shift.r, shift.c)).wrap(width, height)
        })
    }
}
