use crate::{Error, Result};

pub const ROWS: usize = 26;
pub const COLS: usize = 48;

pub const SEGMENT_ROWS: usize = 13;
pub const SEGMENT_COLS: usize = 24;

// Segment-local coordinate of the hole pixel, when enabled.
pub const HOLE_ROW: usize = 12;
pub const HOLE_COL: usize = 23;

pub const DEFAULT_GROUPS_PER_PAYLOAD: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    T90,
    T10,
    Hole,
}

impl PixelType {
    // Panics on Hole, which never forms a group.
    pub fn header(&self) -> u8 {
        match self {
            PixelType::T90 => 0x90,
            PixelType::T10 => 0x10,
            PixelType::Hole => unreachable!("Hole pixels do not have a wire header"),
        }
    }

    pub fn from_header(header: u8) -> Option<PixelType> {
        match header {
            0x90 => Some(PixelType::T90),
            0x10 => Some(PixelType::T10),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            PixelType::T90 => 0,
            PixelType::T10 => 1,
            PixelType::Hole => unreachable!("Hole pixels do not index a queue"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub name: &'static str,
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
    pub addr_t90: u8,
    pub addr_t10: u8,
}

impl Segment {
    pub fn is_top(&self) -> bool {
        self.row_start == 0
    }

    pub fn addr_for(&self, pixel_type: PixelType) -> u8 {
        match pixel_type {
            PixelType::T90 => self.addr_t90,
            PixelType::T10 => self.addr_t10,
            PixelType::Hole => unreachable!("Hole pixels do not use a bus address"),
        }
    }

    // Top segments scan top-to-bottom/left-to-right, bottom segments
    // bottom-to-top/right-to-left. Outer loop is always rows, inner is
    // columns, so matrix_to_queues and queues_to_matrix stay exact inverses.
    pub fn scan_order(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let rows: Box<dyn Iterator<Item = usize>> = if self.is_top() {
            Box::new(self.row_start..self.row_end)
        } else {
            Box::new((self.row_start..self.row_end).rev())
        };
        let is_top = self.is_top();
        let (col_start, col_end) = (self.col_start, self.col_end);
        rows.flat_map(move |row| {
            let cols: Box<dyn Iterator<Item = usize>> = if is_top {
                Box::new(col_start..col_end)
            } else {
                Box::new((col_start..col_end).rev())
            };
            cols.map(move |col| (row, col))
        })
    }
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub segments: [Segment; 4],
    pub hole_enabled: bool,
    pub groups_per_payload: usize,
}

impl PanelConfig {
    pub fn new(
        segments: [Segment; 4],
        hole_enabled: bool,
        groups_per_payload: usize,
    ) -> Result<Self> {
        if groups_per_payload == 0 {
            return Err(Error::ConfigurationError(
                "groups_per_payload must be at least 1".into(),
            ));
        }

        let mut addrs = Vec::with_capacity(8);
        for seg in &segments {
            if seg.row_end <= seg.row_start || seg.col_end <= seg.col_start {
                return Err(Error::ConfigurationError(format!(
                    "segment {} has an empty or inverted span",
                    seg.name
                )));
            }
            addrs.push(seg.addr_t90);
            addrs.push(seg.addr_t10);
        }
        addrs.sort_unstable();
        if addrs.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::ConfigurationError(
                "segment table reuses a bus address".into(),
            ));
        }

        Ok(PanelConfig {
            segments,
            hole_enabled,
            groups_per_payload,
        })
    }

    pub fn standard() -> Self {
        Self::new(Self::standard_segments(), false, DEFAULT_GROUPS_PER_PAYLOAD)
            .expect("standard segment table is always valid")
    }

    pub fn standard_with_hole() -> Self {
        Self::new(Self::standard_segments(), true, DEFAULT_GROUPS_PER_PAYLOAD)
            .expect("standard segment table is always valid")
    }

    fn standard_segments() -> [Segment; 4] {
        [
            Segment {
                name: "top-left",
                row_start: 0,
                row_end: 13,
                col_start: 0,
                col_end: 24,
                addr_t90: 0x7,
                addr_t10: 0x3,
            },
            Segment {
                name: "top-right",
                row_start: 0,
                row_end: 13,
                col_start: 24,
                col_end: 48,
                addr_t90: 0x8,
                addr_t10: 0x4,
            },
            Segment {
                name: "bottom-left",
                row_start: 13,
                row_end: 26,
                col_start: 0,
                col_end: 24,
                addr_t90: 0x6,
                addr_t10: 0x2,
            },
            Segment {
                name: "bottom-right",
                row_start: 13,
                row_end: 26,
                col_start: 24,
                col_end: 48,
                addr_t90: 0x5,
                addr_t10: 0x1,
            },
        ]
    }

    pub fn segment_by_name(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    // Hole (if enabled) sits at (12, 23). Rows 0..11 alternate by row
    // parity, row 12 alternates by column parity.
    pub fn type_at(&self, seg_row: usize, seg_col: usize) -> PixelType {
        if self.hole_enabled && seg_row == HOLE_ROW && seg_col == HOLE_COL {
            return PixelType::Hole;
        }
        if seg_row < HOLE_ROW {
            if seg_row % 2 == 0 {
                PixelType::T90
            } else {
                PixelType::T10
            }
        } else if seg_col % 2 == 0 {
            PixelType::T90
        } else {
            PixelType::T10
        }
    }
}
