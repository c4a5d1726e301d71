// Optional serde-backed persistence for calibration data, mirroring
// model.py's JSON record shape and command_codec.py's compact on-disk
// group encoding. No file I/O here; that's a collaborator's job.

use serde::{Deserialize, Serialize};

use crate::codec::{Group, Payload};

const CHUNK_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateCommand {
    pub address: u8,
    pub type_code: u8,
    #[serde(default)]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelStatus {
    Unknown,
    TestedOk,
    TestedFail,
}

impl Default for PixelStatus {
    fn default() -> Self {
        PixelStatus::Unknown
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRecord {
    pub row: usize,
    pub col: usize,
    pub type_code: u8,
    pub address: u8,
    #[serde(default = "default_bit_index")]
    pub bit_index: i32,
    pub generated_command: Vec<u8>,
    pub assigned_command: Vec<u8>,
    #[serde(default)]
    pub status: PixelStatus,
    #[serde(default)]
    pub last_tested_at: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub remap_commands: Vec<AlternateCommand>,
    #[serde(default)]
    pub remap_active: bool,
}

fn default_bit_index() -> i32 {
    -1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentMapping {
    #[serde(default = "default_version")]
    pub version: u32,
    pub segment_name: String,
    pub created_at: String,
    #[serde(default)]
    pub pixels: Vec<PixelRecord>,
}

fn default_version() -> u32 {
    1
}

impl SegmentMapping {
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(data: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

// Strips the address and every group's type-header byte, leaving only the
// concatenated 5-byte data chunks (the compact form generated_command and
// assigned_command store).
pub fn compact_data_bytes(payload: &Payload) -> Vec<u8> {
    payload.groups.iter().flat_map(|g| g.data).collect()
}

// Empty data still produces one all-zero group, matching the source's
// behavior of never emitting a payload with zero groups.
pub fn payload_from_compact(address: u8, type_code: u8, data: &[u8]) -> Payload {
    let pixel_type = match crate::config::PixelType::from_header(type_code) {
        Some(t) => t,
        None => return Payload::empty(),
    };

    if data.is_empty() {
        return Payload {
            address,
            groups: vec![Group {
                pixel_type,
                data: [0u8; CHUNK_SIZE],
            }],
        };
    }

    let groups = data
        .chunks(CHUNK_SIZE)
        .map(|chunk| {
            let mut bytes = [0u8; CHUNK_SIZE];
            bytes[..chunk.len()].copy_from_slice(chunk);
            Group {
                pixel_type,
                data: bytes,
            }
        })
        .collect();
    Payload { address, groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PixelType;

    fn sample_record() -> PixelRecord {
        PixelRecord {
            row: 0,
            col: 0,
            type_code: PixelType::T90.header(),
            address: 0x7,
            bit_index: 0,
            generated_command: vec![0x07, 0x90, 0, 0, 0, 0, 0x80],
            assigned_command: vec![0x07, 0x90, 0, 0, 0, 0, 0x80],
            status: PixelStatus::TestedOk,
            last_tested_at: Some("2026-01-01T00:00:00".into()),
            notes: String::new(),
            remap_commands: vec![AlternateCommand {
                address: 0x3,
                type_code: PixelType::T10.header(),
                data: vec![0, 0, 0, 0, 0x01],
            }],
            remap_active: false,
        }
    }

    #[test]
    fn segment_mapping_round_trips_through_json() {
        let mapping = SegmentMapping {
            version: 1,
            segment_name: "top-left".into(),
            created_at: "2026-01-01T00:00:00".into(),
            pixels: vec![sample_record()],
        };

        let json = mapping.to_json().unwrap();
        let parsed = SegmentMapping::from_json(&json).unwrap();
        assert_eq!(parsed, mapping);
    }

    #[test]
    fn missing_optional_fields_default_like_the_source() {
        let json = r#"{"segment_name":"top-left","created_at":"2026-01-01","pixels":[
            {"row":0,"col":0,"type_code":144,"address":7,"generated_command":[],"assigned_command":[]}
        ]}"#;
        let parsed = SegmentMapping::from_json(json).unwrap();
        assert_eq!(parsed.version, 1);
        let pixel = &parsed.pixels[0];
        assert_eq!(pixel.bit_index, -1);
        assert_eq!(pixel.status, PixelStatus::Unknown);
        assert!(pixel.remap_commands.is_empty());
        assert!(!pixel.remap_active);
    }

    #[test]
    fn compact_round_trips_with_group_data() {
        let payload = Payload {
            address: 0x7,
            groups: vec![
                Group {
                    pixel_type: PixelType::T90,
                    data: [1, 2, 3, 4, 5],
                },
                Group {
                    pixel_type: PixelType::T90,
                    data: [6, 7, 8, 9, 10],
                },
            ],
        };

        let compact = compact_data_bytes(&payload);
        assert_eq!(compact, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

        let rebuilt = payload_from_compact(0x7, PixelType::T90.header(), &compact);
        assert_eq!(rebuilt, payload);
    }

    #[test]
    fn empty_data_still_produces_one_zero_group() {
        let payload = payload_from_compact(0x7, PixelType::T90.header(), &[]);
        assert_eq!(payload.groups.len(), 1);
        assert_eq!(payload.groups[0].data, [0u8; CHUNK_SIZE]);
    }

    #[test]
    fn unknown_type_code_yields_an_empty_payload() {
        let payload = payload_from_compact(0x7, 0xFF, &[1, 2, 3]);
        assert!(payload.is_empty());
    }
}
