use flipdot_codec::{decode_batch, encode, queues_to_matrix, InputSource, Matrix, PanelConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PanelConfig::standard();

    let mut matrix = Matrix::zero();
    for i in 0..26.min(48) {
        matrix.set(i, i, true);
    }

    let payloads = encode(&matrix, &config)?;
    println!("encoded {} payload(s)", payloads.len());
    for payload in &payloads {
        let bytes = payload.to_bytes();
        let hex: Vec<String> = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        println!("  addr 0x{:X}: {}", payload.address, hex.join(" "));
    }

    let bodies: Vec<Vec<u8>> = payloads.iter().map(|p| p.to_bytes()).collect();
    let sources: Vec<InputSource> = bodies.iter().map(|b| InputSource::Payload(b)).collect();
    let report = decode_batch(&sources);

    if report.issues.is_empty() {
        println!("decoded cleanly, no issues");
    } else {
        for issue in &report.issues {
            println!("issue: {}", issue);
        }
    }

    let (decoded, _types) = queues_to_matrix(&report.queues, &config);
    assert_eq!(decoded, matrix, "round trip should reproduce the diagonal");
    println!("round trip OK");

    Ok(())
}
