// Two frame shapes: the command frame a display address is addressed
// with (0x7E, 0xA0|addr, payload, checksum, 0x7E), and the legacy input
// frame used to recognize pre-recorded capture lines (0x7E, 0xA5, addr,
// payload, checksum, 0x7E). checksum XORs the command/addr byte with
// every payload byte.

const FLAG: u8 = 0x7E;
const LEGACY_COMMAND: u8 = 0xA5;
const DISPLAY_COMMAND_BASE: u8 = 0xA0;

pub fn wrap_frame(display_addr: u8, payload: &[u8]) -> Vec<u8> {
    let command = DISPLAY_COMMAND_BASE | (display_addr & 0x0F);
    let mut frame = Vec::with_capacity(payload.len() + 4);
    frame.push(FLAG);
    frame.push(command);
    frame.extend_from_slice(payload);

    let mut checksum = command;
    for &b in payload {
        checksum ^= b;
    }
    frame.push(checksum);
    frame.push(FLAG);
    frame
}

pub fn unwrap_frame(frame: &[u8]) -> std::result::Result<(u8, &[u8]), String> {
    if frame.len() < 4 {
        return Err("frame shorter than the minimum 4 bytes".into());
    }
    if frame[0] != FLAG || frame[frame.len() - 1] != FLAG {
        return Err("frame is not delimited by 0x7E on both ends".into());
    }

    let command = frame[1];
    if command & 0xF0 != DISPLAY_COMMAND_BASE {
        return Err(format!("command byte 0x{:02X} is not 0xA0|addr", command));
    }

    let payload = &frame[2..frame.len() - 2];
    let received_checksum = frame[frame.len() - 2];

    let mut checksum = command;
    for &b in payload {
        checksum ^= b;
    }
    if checksum != received_checksum {
        return Err(format!(
            "checksum mismatch: expected 0x{:02X}, got 0x{:02X}",
            checksum, received_checksum
        ));
    }

    Ok((command & 0x0F, payload))
}

pub fn wrap_legacy_frame(addr: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(payload.len() + 5);
    frame.push(FLAG);
    frame.push(LEGACY_COMMAND);
    frame.push(addr);
    frame.extend_from_slice(payload);

    let mut checksum = LEGACY_COMMAND ^ addr;
    for &b in payload {
        checksum ^= b;
    }
    frame.push(checksum);
    frame.push(FLAG);
    frame
}

pub fn parse_legacy_frame(frame: &[u8]) -> std::result::Result<(u8, &[u8]), String> {
    if frame.len() < 5 {
        return Err("frame shorter than the minimum 5 bytes".into());
    }
    if frame[0] != FLAG || frame[frame.len() - 1] != FLAG {
        return Err("frame is not delimited by 0x7E on both ends".into());
    }
    if frame[1] != LEGACY_COMMAND {
        return Err(format!(
            "command byte 0x{:02X} is not the legacy 0xA5 marker",
            frame[1]
        ));
    }

    let addr = frame[2];
    let body = &frame[3..frame.len() - 2];
    Ok((addr, body))
}
