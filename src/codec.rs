use std::collections::VecDeque;

use crate::bitops::{pack_bits_to_bytes, unpack_byte_to_bits};
use crate::config::{PanelConfig, PixelType, COLS, ROWS};
use crate::frame::parse_legacy_frame;
use crate::{Error, Result};

// A 40-bit slice of a queue, as transmitted: a header byte plus 5 data bytes.
const GROUP_BITS: usize = 40;
const GROUP_DATA_BYTES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    bits: [[bool; COLS]; ROWS],
}

impl Matrix {
    pub fn zero() -> Self {
        Matrix {
            bits: [[false; COLS]; ROWS],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.bits[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        self.bits[row][col] = value;
    }

    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn cols(&self) -> usize {
        COLS
    }
}

// None marks a hole cell.
#[derive(Debug, Clone)]
pub struct TypeMap {
    types: [[Option<PixelType>; COLS]; ROWS],
}

impl TypeMap {
    fn empty() -> Self {
        TypeMap {
            types: [[None; COLS]; ROWS],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<PixelType> {
        self.types[row][col]
    }
}

// Dense table indexed by address (0..16) and a 0/1 type index.
#[derive(Debug, Clone)]
pub struct BitQueues {
    queues: [[VecDeque<bool>; 2]; 16],
}

impl Default for BitQueues {
    fn default() -> Self {
        BitQueues {
            queues: Default::default(),
        }
    }
}

impl BitQueues {
    pub fn new() -> Self {
        Self::default()
    }

    // Panics if pixel_type is Hole, which never has a queue.
    pub fn get(&self, address: u8, pixel_type: PixelType) -> &VecDeque<bool> {
        &self.queues[address as usize & 0xF][pixel_type.index()]
    }

    pub fn get_mut(&mut self, address: u8, pixel_type: PixelType) -> &mut VecDeque<bool> {
        &mut self.queues[address as usize & 0xF][pixel_type.index()]
    }

    pub fn non_empty(&self) -> impl Iterator<Item = (u8, PixelType, &VecDeque<bool>)> {
        self.queues.iter().enumerate().flat_map(|(addr, pair)| {
            pair.iter().enumerate().filter_map(move |(idx, q)| {
                if q.is_empty() {
                    None
                } else {
                    let pixel_type = if idx == 0 { PixelType::T90 } else { PixelType::T10 };
                    Some((addr as u8, pixel_type, q))
                }
            })
        })
    }

    pub fn total_bits(&self) -> usize {
        self.queues
            .iter()
            .flat_map(|pair| pair.iter())
            .map(|q| q.len())
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Group {
    pub pixel_type: PixelType,
    pub data: [u8; GROUP_DATA_BYTES],
}

impl Group {
    pub fn to_bytes(&self) -> [u8; 1 + GROUP_DATA_BYTES] {
        let mut out = [0u8; 1 + GROUP_DATA_BYTES];
        out[0] = self.pixel_type.header();
        out[1..].copy_from_slice(&self.data);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub address: u8,
    pub groups: Vec<Group>,
}

impl Payload {
    // Sentinel value for a calibration lookup that targets a hole pixel.
    pub fn empty() -> Self {
        Payload {
            address: 0,
            groups: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.groups.len() * (1 + GROUP_DATA_BYTES));
        out.push(self.address);
        for group in &self.groups {
            out.extend_from_slice(&group.to_bytes());
        }
        out
    }
}

pub fn matrix_to_queues(matrix: &Matrix, config: &PanelConfig) -> BitQueues {
    let mut queues = BitQueues::new();
    for seg in &config.segments {
        for (row, col) in seg.scan_order() {
            let pixel_type = config.type_at(row - seg.row_start, col - seg.col_start);
            if pixel_type == PixelType::Hole {
                continue; // holes contribute no bit to any queue
            }
            let bit = matrix.get(row, col);
            queues.get_mut(seg.addr_for(pixel_type), pixel_type).push_back(bit);
        }
    }
    queues
}

pub fn queues_to_matrix(queues: &BitQueues, config: &PanelConfig) -> (Matrix, TypeMap) {
    let mut matrix = Matrix::zero();
    let mut types = TypeMap::empty();
    let mut queues = queues.clone();

    for seg in &config.segments {
        for (row, col) in seg.scan_order() {
            let pixel_type = config.type_at(row - seg.row_start, col - seg.col_start);
            if pixel_type == PixelType::Hole {
                matrix.set(row, col, false);
                continue;
            }
            // A queue shorter than the segment's demand just yields false
            // for the remaining cells instead of erroring.
            let bit = queues
                .get_mut(seg.addr_for(pixel_type), pixel_type)
                .pop_front()
                .unwrap_or(false);
            matrix.set(row, col, bit);
            types.types[row][col] = Some(pixel_type);
        }
    }
    (matrix, types)
}

fn groups_for_queue(pixel_type: PixelType, bits: &VecDeque<bool>) -> Result<Vec<Group>> {
    let bits: Vec<bool> = bits.iter().copied().collect();
    let mut groups = Vec::with_capacity(bits.len().div_ceil(GROUP_BITS));

    for chunk in bits.chunks(GROUP_BITS) {
        let mut padded = chunk.to_vec();
        padded.resize(GROUP_BITS, false); // zero-pad a short final chunk

        let data_bytes = pack_bits_to_bytes(&padded);
        if data_bytes.len() != GROUP_DATA_BYTES {
            return Err(Error::InternalError(format!(
                "expected {} data bytes for a {}-bit chunk, got {}",
                GROUP_DATA_BYTES,
                GROUP_BITS,
                data_bytes.len()
            )));
        }

        let mut data = [0u8; GROUP_DATA_BYTES];
        data.copy_from_slice(&data_bytes);
        groups.push(Group { pixel_type, data });
    }
    Ok(groups)
}

pub fn queues_to_payloads(queues: &BitQueues, config: &PanelConfig) -> Result<Vec<Payload>> {
    let mut used_addrs: Vec<u8> = queues
        .non_empty()
        .map(|(addr, _, _)| addr)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    used_addrs.sort_unstable_by(|a, b| b.cmp(a)); // descending address order

    let mut payloads = Vec::new();
    for addr in used_addrs {
        let mut groups = Vec::new();
        for pixel_type in [PixelType::T90, PixelType::T10] { // T90 groups before T10
            let bits = queues.get(addr, pixel_type);
            if bits.is_empty() {
                continue;
            }
            groups.extend(groups_for_queue(pixel_type, bits)?);
        }

        for chunk in groups.chunks(config.groups_per_payload) {
            payloads.push(Payload {
                address: addr,
                groups: chunk.to_vec(),
            });
        }
    }
    Ok(payloads)
}

pub fn encode(matrix: &Matrix, config: &PanelConfig) -> Result<Vec<Payload>> {
    let queues = matrix_to_queues(matrix, config);
    queues_to_payloads(&queues, config)
}

// Soft, per-input decode problem. Never aborts a batch: the offending
// payload or frame just stops contributing further bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeIssue {
    MalformedPayloadGroup { address: u8, header: u8 },
    TruncatedPayload { address: u8, remaining: usize },
    InvalidFrame { reason: String },
}

impl std::fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeIssue::MalformedPayloadGroup { address, header } => write!(
                f,
                "payload for address 0x{:X}: unknown group header 0x{:02X}",
                address, header
            ),
            DecodeIssue::TruncatedPayload { address, remaining } => write!(
                f,
                "payload for address 0x{:X}: {} trailing bytes do not form a full group",
                address, remaining
            ),
            DecodeIssue::InvalidFrame { reason } => write!(f, "invalid frame: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecodeReport {
    pub queues: BitQueues,
    pub issues: Vec<DecodeIssue>,
}

#[derive(Debug, Clone, Copy)]
pub enum InputSource<'a> {
    Payload(&'a [u8]),
    Frame(&'a [u8]),
}

fn record_issue(issues: &mut Vec<DecodeIssue>, issue: DecodeIssue) {
    #[cfg(feature = "logging")]
    log::warn!("{}", issue);
    issues.push(issue);
}

// Stops at the first malformed group or truncated tail; does not fail the
// rest of the batch.
fn decode_payload_body(body: &[u8], queues: &mut BitQueues, issues: &mut Vec<DecodeIssue>) {
    if body.is_empty() {
        return;
    }
    let address = body[0];
    let mut rest = &body[1..];

    while !rest.is_empty() {
        if rest.len() < 1 + GROUP_DATA_BYTES {
            record_issue(
                issues,
                DecodeIssue::TruncatedPayload {
                    address,
                    remaining: rest.len(),
                },
            );
            break;
        }

        let header = rest[0];
        let Some(pixel_type) = PixelType::from_header(header) else {
            record_issue(
                issues,
                DecodeIssue::MalformedPayloadGroup { address, header },
            );
            break;
        };

        let data = &rest[1..1 + GROUP_DATA_BYTES];
        let queue = queues.get_mut(address, pixel_type);
        for &byte in data {
            queue.extend(unpack_byte_to_bits(byte));
        }

        rest = &rest[1 + GROUP_DATA_BYTES..];
    }
}

// Never returns an error: malformed input only ever produces a DecodeIssue.
pub fn decode_batch(sources: &[InputSource<'_>]) -> DecodeReport {
    let mut report = DecodeReport::default();
    for source in sources {
        match source {
            InputSource::Payload(bytes) => {
                decode_payload_body(bytes, &mut report.queues, &mut report.issues)
            }
            InputSource::Frame(bytes) => match parse_legacy_frame(bytes) {
                Ok((address, body)) => {
                    let mut full_body = Vec::with_capacity(1 + body.len());
                    full_body.push(address);
                    full_body.extend_from_slice(body);
                    decode_payload_body(&full_body, &mut report.queues, &mut report.issues);
                }
                Err(reason) => {
                    record_issue(&mut report.issues, DecodeIssue::InvalidFrame { reason })
                }
            },
        }
    }
    report
}
