use crate::grid::CellState;

/// RGB triple
pub type Rgb = [u8; 3];

/// Fill and outline colour for one cell state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fill: Rgb,
    pub outline: Rgb,
}

pub const GREEN: Rgb = [0, 128, 0];
pub const RED: Rgb = [255, 0, 0];
pub const GRAY: Rgb = [128, 128, 128];
pub const BLACK: Rgb = [0, 0, 0];
pub const WHITE: Rgb = [255, 255, 255];

/// Lookup table indexed by [`style`]
const STYLES: [CellStyle; 3] = [
    CellStyle { fill: GREEN, outline: BLACK },
    CellStyle { fill: RED, outline: BLACK },
    CellStyle { fill: GRAY, outline: BLACK },
];

/// Drawing colours for a cell state
pub fn style(state: CellState) -> CellStyle {
    let idx = match state {
        CellState::Unburned => 0,
        CellState::Burning => 1,
        CellState::Burnt => 2,
    };
    STYLES[idx]
}

/// Every colour a rendered surface can contain, background first
pub const SURFACE_COLORS: [Rgb; 5] = [WHITE, GREEN, RED, GRAY, BLACK];
