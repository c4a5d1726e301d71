// Turns already-read ANSI-art lines into a Matrix, returning warnings as
// data instead of printing them to stderr like the source's reader does.

use crate::codec::Matrix;
use crate::config::{PanelConfig, COLS, ROWS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnsiWarning {
    LineLength { line: usize, len: usize },
    TooFewLines { total: usize },
    TooManyLines { total: usize },
}

fn is_on(ch: char) -> bool {
    matches!(ch, 'X' | 'x' | '█')
}

// Hole cells stay off even if the source art marks them on: the format has
// no way to address a hole directly.
pub fn parse_ansi_matrix(lines: &[&str], config: &PanelConfig) -> (Matrix, Vec<AnsiWarning>) {
    let mut matrix = Matrix::zero();
    let mut warnings = Vec::new();

    let total = lines.len();
    for (row, line) in lines.iter().take(ROWS).enumerate() {
        let len = line.chars().count();
        if len != COLS {
            warnings.push(AnsiWarning::LineLength { line: row + 1, len });
        }

        for (col, ch) in line.chars().take(COLS).enumerate() {
            matrix.set(row, col, is_on(ch));
        }
    }

    if total < ROWS {
        warnings.push(AnsiWarning::TooFewLines { total });
    } else if total > ROWS {
        warnings.push(AnsiWarning::TooManyLines { total });
    }

    apply_hole_invariant(&mut matrix, config);
    (matrix, warnings)
}

fn apply_hole_invariant(matrix: &mut Matrix, config: &PanelConfig) {
    if !config.hole_enabled {
        return;
    }
    for seg in &config.segments {
        for (row, col) in seg.scan_order() {
            if config.type_at(row - seg.row_start, col - seg.col_start) == crate::PixelType::Hole {
                matrix.set(row, col, false);
            }
        }
    }
}
