use afl::*;

use flipdot_codec::{decode_batch, InputSource};

fn main() {
    fuzz!(|data: &[u8]| {
        let _ = decode_batch(&[InputSource::Payload(data)]);
        let _ = decode_batch(&[InputSource::Frame(data)]);
    })
}
