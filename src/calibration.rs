// Invalid coordinates are never an Err here: they return None, matching
// the source's get_pixel_info/generate_single_pixel_command returning
// {}/[] on bad input.

use std::collections::VecDeque;

use crate::codec::{queues_to_payloads, BitQueues, Matrix, Payload};
use crate::config::{PanelConfig, PixelType, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelInfo {
    pub pixel_type: PixelType,
    // None only for a hole pixel, which has no bus address.
    pub address: Option<u8>,
    // -1 for a hole pixel.
    pub bit_index: i32,
}

fn local_coords_in_range(seg: &Segment, seg_row: usize, seg_col: usize) -> bool {
    seg_row < seg.row_end - seg.row_start && seg_col < seg.col_end - seg.col_start
}

pub fn pixel_info(
    config: &PanelConfig,
    segment_name: &str,
    seg_row: usize,
    seg_col: usize,
) -> Option<PixelInfo> {
    let seg = config.segment_by_name(segment_name)?;
    if !local_coords_in_range(seg, seg_row, seg_col) {
        return None;
    }

    let pixel_type = config.type_at(seg_row, seg_col);
    if pixel_type == PixelType::Hole {
        return Some(PixelInfo {
            pixel_type,
            address: None,
            bit_index: -1,
        });
    }

    let address = seg.addr_for(pixel_type);
    let index = bit_index(config, segment_name, seg_row, seg_col).unwrap_or(-1);
    Some(PixelInfo {
        pixel_type,
        address: Some(address),
        bit_index: index,
    })
}

// Walks the segment's scan order in the same outer=row, inner=col
// direction the encoder uses. The source's calculate_bit_index walked
// col-outer/row-inner instead, which looks like a bug there.
pub fn bit_index(
    config: &PanelConfig,
    segment_name: &str,
    seg_row: usize,
    seg_col: usize,
) -> Option<i32> {
    let seg = config.segment_by_name(segment_name)?;
    if !local_coords_in_range(seg, seg_row, seg_col) {
        return None;
    }

    let target_type = config.type_at(seg_row, seg_col);
    if target_type == PixelType::Hole {
        return None;
    }

    let target_row = seg.row_start + seg_row;
    let target_col = seg.col_start + seg_col;

    let mut counter = 0i32;
    for (row, col) in seg.scan_order() {
        if row == target_row && col == target_col {
            return Some(counter);
        }
        let pixel_type = config.type_at(row - seg.row_start, col - seg.col_start);
        if pixel_type == target_type {
            counter += 1;
        }
    }
    None
}

// Builds the full active column: a zero matrix with just the target bit
// set, encoded, then picks out the one payload that actually carries it
// (the rest of that address's groups still ride along, all zero).
pub fn single_pixel_payload(
    config: &PanelConfig,
    segment_name: &str,
    seg_row: usize,
    seg_col: usize,
) -> Option<Payload> {
    let seg = config.segment_by_name(segment_name)?;
    if !local_coords_in_range(seg, seg_row, seg_col) {
        return None;
    }

    let pixel_type = config.type_at(seg_row, seg_col);
    if pixel_type == PixelType::Hole {
        return Some(Payload::empty());
    }

    let address = seg.addr_for(pixel_type);
    let mut matrix = Matrix::zero();
    matrix.set(seg.row_start + seg_row, seg.col_start + seg_col, true);

    let payloads =
        crate::codec::encode(&matrix, config).expect("a single bit always packs cleanly");
    Some(
        payloads
            .into_iter()
            .find(|p| p.address == address && p.groups.iter().any(|g| g.data != [0u8; 5]))
            .unwrap_or_else(Payload::empty),
    )
}

// Used to replay a stored calibration bit position without needing the
// segment geometry again.
pub fn payload_from_bit_index(
    config: &PanelConfig,
    address: u8,
    pixel_type: PixelType,
    bit_index: usize,
) -> Option<Payload> {
    if pixel_type == PixelType::Hole {
        return None;
    }

    let length = ceil_to_40(std::cmp::max(160, bit_index + 1));
    let mut bits: VecDeque<bool> = VecDeque::from(vec![false; length]);
    bits[bit_index] = true;

    let mut queues = BitQueues::new();
    *queues.get_mut(address, pixel_type) = bits;

    let payloads =
        queues_to_payloads(&queues, config).expect("a single bit always packs cleanly");
    payloads.into_iter().find(|p| p.address == address)
}

fn ceil_to_40(n: usize) -> usize {
    if n % 40 == 0 {
        n
    } else {
        n + (40 - n % 40)
    }
}

pub fn blank_payloads(config: &PanelConfig) -> Vec<Payload> {
    crate::codec::encode(&crate::codec::Matrix::zero(), config)
        .expect("the all-zero matrix always packs cleanly")
}
