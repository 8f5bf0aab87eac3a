use serde::{Deserialize, Serialize};

/// Shade level within a Material color family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shade {
    S50,
    S100,
    S200,
    S300,
    S400,
    S500,
    S600,
    S700,
    S800,
    S900,
    A100,
    A200,
    A400,
    A700,
}

impl Shade {
    fn slot(self) -> usize {
        match self {
            Self::S50 => 0,
            Self::S100 => 1,
            Self::S200 => 2,
            Self::S300 => 3,
            Self::S400 => 4,
            Self::S500 => 5,
            Self::S600 => 6,
            Self::S700 => 7,
            Self::S800 => 8,
            Self::S900 => 9,
            Self::A100 => 10,
            Self::A200 => 11,
            Self::A400 => 12,
            Self::A700 => 13,
        }
    }
}

/// Shade used for entities discovered while materializing events.
pub const ENTITY_SHADE: Shade = Shade::A100;

/// One Material color family with all of its shades.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorFamily {
    pub name: &'static str,
    shades: [&'static str; 14],
}

impl ColorFamily {
    #[must_use]
    pub fn shade(&self, shade: Shade) -> &'static str {
        self.shades[shade.slot()]
    }
}

const fn family(name: &'static str, shades: [&'static str; 14]) -> ColorFamily {
    ColorFamily { name, shades }
}

/// Material palette in allocation order.
pub const MATERIAL_PALETTE: [ColorFamily; 19] = [
    family(
        "red",
        [
            "#ffebee", "#ffcdd2", "#ef9a9a", "#e57373", "#ef5350", "#f44336", "#e53935",
            "#d32f2f", "#c62828", "#b71c1c", "#ff8a80", "#ff5252", "#ff1744", "#d50000",
        ],
    ),
    family(
        "pink",
        [
            "#fce4ec", "#f8bbd0", "#f48fb1", "#f06292", "#ec407a", "#e91e63", "#d81b60",
            "#c2185b", "#ad1457", "#880e4f", "#ff80ab", "#ff4081", "#f50057", "#c51162",
        ],
    ),
    family(
        "purple",
        [
            "#f3e5f5", "#e1bee7", "#ce93d8", "#ba68c8", "#ab47bc", "#9c27b0", "#8e24aa",
            "#7b1fa2", "#6a1b9a", "#4a148c", "#ea80fc", "#e040fb", "#d500f9", "#aa00ff",
        ],
    ),
    family(
        "deepPurple",
        [
            "#ede7f6", "#d1c4e9", "#b39ddb", "#9575cd", "#7e57c2", "#673ab7", "#5e35b1",
            "#512da8", "#4527a0", "#311b92", "#b388ff", "#7c4dff", "#651fff", "#6200ea",
        ],
    ),
    family(
        "indigo",
        [
            "#e8eaf6", "#c5cae9", "#9fa8da", "#7986cb", "#5c6bc0", "#3f51b5", "#3949ab",
            "#303f9f", "#283593", "#1a237e", "#8c9eff", "#536dfe", "#3d5afe", "#304ffe",
        ],
    ),
    family(
        "blue",
        [
            "#e3f2fd", "#bbdefb", "#90caf9", "#64b5f6", "#42a5f5", "#2196f3", "#1e88e5",
            "#1976d2", "#1565c0", "#0d47a1", "#82b1ff", "#448aff", "#2979ff", "#2962ff",
        ],
    ),
    family(
        "lightBlue",
        [
            "#e1f5fe", "#b3e5fc", "#81d4fa", "#4fc3f7", "#29b6f6", "#03a9f4", "#039be5",
            "#0288d1", "#0277bd", "#01579b", "#80d8ff", "#40c4ff", "#00b0ff", "#0091ea",
        ],
    ),
    family(
        "cyan",
        [
            "#e0f7fa", "#b2ebf2", "#80deea", "#4dd0e1", "#26c6da", "#00bcd4", "#00acc1",
            "#0097a7", "#00838f", "#006064", "#84ffff", "#18ffff", "#00e5ff", "#00b8d4",
        ],
    ),
    family(
        "teal",
        [
            "#e0f2f1", "#b2dfdb", "#80cbc4", "#4db6ac", "#26a69a", "#009688", "#00897b",
            "#00796b", "#00695c", "#004d40", "#a7ffeb", "#64ffda", "#1de9b6", "#00bfa5",
        ],
    ),
    family(
        "green",
        [
            "#e8f5e9", "#c8e6c9", "#a5d6a7", "#81c784", "#66bb6a", "#4caf50", "#43a047",
            "#388e3c", "#2e7d32", "#1b5e20", "#b9f6ca", "#69f0ae", "#00e676", "#00c853",
        ],
    ),
    family(
        "lightGreen",
        [
            "#f1f8e9", "#dcedc8", "#c5e1a5", "#aed581", "#9ccc65", "#8bc34a", "#7cb342",
            "#689f38", "#558b2f", "#33691e", "#ccff90", "#b2ff59", "#76ff03", "#64dd17",
        ],
    ),
    family(
        "lime",
        [
            "#f9fbe7", "#f0f4c3", "#e6ee9c", "#dce775", "#d4e157", "#cddc39", "#c0ca33",
            "#afb42b", "#9e9d24", "#827717", "#f4ff81", "#eeff41", "#c6ff00", "#aeea00",
        ],
    ),
    family(
        "yellow",
        [
            "#fffde7", "#fff9c4", "#fff59d", "#fff176", "#ffee58", "#ffeb3b", "#fdd835",
            "#fbc02d", "#f9a825", "#f57f17", "#ffff8d", "#ffff00", "#ffea00", "#ffd600",
        ],
    ),
    family(
        "amber",
        [
            "#fff8e1", "#ffecb3", "#ffe082", "#ffd54f", "#ffca28", "#ffc107", "#ffb300",
            "#ffa000", "#ff8f00", "#ff6f00", "#ffe57f", "#ffd740", "#ffc400", "#ffab00",
        ],
    ),
    family(
        "orange",
        [
            "#fff3e0", "#ffe0b2", "#ffcc80", "#ffb74d", "#ffa726", "#ff9800", "#fb8c00",
            "#f57c00", "#ef6c00", "#e65100", "#ffd180", "#ffab40", "#ff9100", "#ff6d00",
        ],
    ),
    family(
        "deepOrange",
        [
            "#fbe9e7", "#ffccbc", "#ffab91", "#ff8a65", "#ff7043", "#ff5722", "#f4511e",
            "#e64a19", "#d84315", "#bf360c", "#ff9e80", "#ff6e40", "#ff3d00", "#dd2c00",
        ],
    ),
    family(
        "brown",
        [
            "#efebe9", "#d7ccc8", "#bcaaa4", "#a1887f", "#8d6e63", "#795548", "#6d4c41",
            "#5d4037", "#4e342e", "#3e2723", "#d7ccc8", "#bcaaa4", "#8d6e63", "#5d4037",
        ],
    ),
    family(
        "grey",
        [
            "#fafafa", "#f5f5f5", "#eeeeee", "#e0e0e0", "#bdbdbd", "#9e9e9e", "#757575",
            "#616161", "#424242", "#212121", "#d5d5d5", "#aaaaaa", "#303030", "#616161",
        ],
    ),
    family(
        "blueGrey",
        [
            "#eceff1", "#cfd8dc", "#b0bec5", "#90a4ae", "#78909c", "#607d8b", "#546e7a",
            "#455a64", "#37474f", "#263238", "#cfd8dc", "#b0bec5", "#78909c", "#455a64",
        ],
    ),
];

/// Deterministic palette allocator.
///
/// Each `next` call returns the requested shade of the current family and
/// advances one family, wrapping after the last. Sessions own one cycler per
/// entity kind; there is no shared state between instances.
#[derive(Debug, Clone)]
pub struct ColorCycler {
    index: usize,
    palette: &'static [ColorFamily],
}

impl Default for ColorCycler {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorCycler {
    #[must_use]
    pub fn new() -> Self {
        Self::with_palette(&MATERIAL_PALETTE)
    }

    /// Builds a cycler over a custom palette. An empty palette falls back to
    /// the Material palette so `next` can never fail.
    #[must_use]
    pub fn with_palette(palette: &'static [ColorFamily]) -> Self {
        let palette = if palette.is_empty() {
            &MATERIAL_PALETTE[..]
        } else {
            palette
        };
        Self { index: 0, palette }
    }

    pub fn next(&mut self, shade: Shade) -> &'static str {
        let color = self.palette[self.index].shade(shade);
        self.index = if self.index + 1 == self.palette.len() {
            0
        } else {
            self.index + 1
        };
        color
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
