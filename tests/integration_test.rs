use flipdot_codec::{
    bit_index, blank_payloads, decode_batch, encode, parse_ansi_matrix, pixel_info,
    queues_to_matrix, single_pixel_payload, wrap_legacy_frame, DecodeIssue, InputSource, Matrix,
    PanelConfig, Payload, PixelType, COLS, ROWS,
};

fn diagonal_matrix() -> Matrix {
    let mut m = Matrix::zero();
    for i in 0..ROWS.min(COLS) {
        m.set(i, i, true);
    }
    m
}

fn on_count(matrix: &Matrix) -> usize {
    (0..ROWS)
        .flat_map(|r| (0..COLS).map(move |c| (r, c)))
        .filter(|&(r, c)| matrix.get(r, c))
        .count()
}

#[test]
fn s1_light_top_left_origin_pixel() {
    let config = PanelConfig::standard();
    let info = pixel_info(&config, "top-left", 0, 0).unwrap();
    assert_eq!(info.pixel_type, PixelType::T90);
    assert_eq!(info.address, Some(0x7));
    assert_eq!(info.bit_index, 0);

    let payload = single_pixel_payload(&config, "top-left", 0, 0).unwrap();
    assert_eq!(&payload.to_bytes()[0..2], &[0x07, 0x90]);

    let report = decode_batch(&[InputSource::Payload(&payload.to_bytes())]);
    let (matrix, _) = queues_to_matrix(&report.queues, &config);
    assert!(matrix.get(0, 0));
    assert_eq!(on_count(&matrix), 1);
}

#[test]
fn s2_bottom_right_segment_t10_pixel() {
    let config = PanelConfig::standard();
    let info = pixel_info(&config, "bottom-right", 12, 21).unwrap();
    assert_eq!(info.pixel_type, PixelType::T10);
    assert_eq!(info.address, Some(0x1));

    let payload = single_pixel_payload(&config, "bottom-right", 12, 21).unwrap();
    let report = decode_batch(&[InputSource::Payload(&payload.to_bytes())]);
    let (matrix, _) = queues_to_matrix(&report.queues, &config);
    assert!(matrix.get(25, 45));
    assert_eq!(on_count(&matrix), 1);
}

#[test]
fn s3_hole_probe_is_a_sentinel_not_an_error() {
    let config = PanelConfig::standard_with_hole();
    let info = pixel_info(&config, "top-left", 12, 23).unwrap();
    assert_eq!(info.pixel_type, PixelType::Hole);
    assert_eq!(info.address, None);
    assert_eq!(info.bit_index, -1);
    assert!(bit_index(&config, "top-left", 12, 23).is_none());
}

#[test]
fn s4_blank_payloads_carry_zero_data_and_descend() {
    let config = PanelConfig::standard();
    let payloads = blank_payloads(&config);
    assert!(!payloads.is_empty());
    for p in &payloads {
        for g in &p.groups {
            assert_eq!(g.data, [0u8; 5]);
        }
    }
    let addrs: Vec<u8> = payloads.iter().map(|p| p.address).collect();
    assert_eq!(addrs.first(), Some(&0x8));
    assert_eq!(addrs.last(), Some(&0x1));
}

#[test]
fn s5_diagonal_round_trips_through_the_public_api() {
    let config = PanelConfig::standard();
    let input = diagonal_matrix();

    let payloads = encode(&input, &config).unwrap();
    let bodies: Vec<Vec<u8>> = payloads.iter().map(|p| p.to_bytes()).collect();
    let sources: Vec<InputSource> = bodies.iter().map(|b| InputSource::Payload(b)).collect();
    let report = decode_batch(&sources);
    assert!(report.issues.is_empty());

    let (output, _) = queues_to_matrix(&report.queues, &config);
    assert_eq!(output, input);
}

#[test]
fn s6_mixed_legacy_frames_and_raw_payloads_agree() {
    let config = PanelConfig::standard();
    let input = diagonal_matrix();
    let payloads = encode(&input, &config).unwrap();
    assert!(payloads.len() >= 3, "need at least 3 payloads to split the batch");

    let mut sources_bytes: Vec<Vec<u8>> = Vec::new();
    let mut as_frame = vec![true, true, false, false, false];
    as_frame.resize(payloads.len(), false);

    for (payload, frame) in payloads.iter().zip(as_frame.iter()) {
        let body = payload.to_bytes();
        if *frame {
            sources_bytes.push(wrap_legacy_frame(payload.address, &body[1..]));
        } else {
            sources_bytes.push(body);
        }
    }

    let sources: Vec<InputSource> = sources_bytes
        .iter()
        .zip(as_frame.iter())
        .map(|(bytes, frame)| {
            if *frame {
                InputSource::Frame(bytes)
            } else {
                InputSource::Payload(bytes)
            }
        })
        .collect();

    let report = decode_batch(&sources);
    assert!(report.issues.is_empty());

    let (mixed, _) = queues_to_matrix(&report.queues, &config);

    let all_raw_bodies: Vec<Vec<u8>> = payloads.iter().map(Payload::to_bytes).collect();
    let all_raw_sources: Vec<InputSource> =
        all_raw_bodies.iter().map(|b| InputSource::Payload(b)).collect();
    let raw_report = decode_batch(&all_raw_sources);
    let (raw_only, _) = queues_to_matrix(&raw_report.queues, &config);

    assert_eq!(mixed, raw_only);
    assert_eq!(mixed, input);
}

#[test]
fn ansi_round_trip_produces_the_same_payloads_as_direct_matrix_encoding() {
    let config = PanelConfig::standard();
    let mut lines = vec![".".repeat(COLS); ROWS];
    lines[0].replace_range(0..1, "X");
    let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();

    let (matrix, warnings) = parse_ansi_matrix(&line_refs, &config);
    assert!(warnings.is_empty());
    assert!(matrix.get(0, 0));

    let mut expected = Matrix::zero();
    expected.set(0, 0, true);
    assert_eq!(matrix, expected);

    let via_ansi = encode(&matrix, &config).unwrap();
    let via_direct = encode(&expected, &config).unwrap();
    assert_eq!(via_ansi, via_direct);
}

#[test]
fn malformed_batch_still_decodes_the_good_payloads() {
    let config = PanelConfig::standard();
    let input = diagonal_matrix();
    let mut payloads = encode(&input, &config).unwrap();
    let bad = payloads.pop().unwrap();

    let mut bodies: Vec<Vec<u8>> = payloads.iter().map(|p| p.to_bytes()).collect();
    let mut corrupted = bad.to_bytes();
    if corrupted.len() > 1 {
        corrupted[1] = 0xFF; // not a valid group header
    }
    bodies.push(corrupted);

    let sources: Vec<InputSource> = bodies.iter().map(|b| InputSource::Payload(b)).collect();
    let report = decode_batch(&sources);
    assert_eq!(report.issues.len(), 1);
    assert!(matches!(
        report.issues[0],
        DecodeIssue::MalformedPayloadGroup { .. }
    ));
}
