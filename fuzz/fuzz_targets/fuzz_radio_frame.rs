//! Fuzz target: radio frame decoding
//!
//! Feeds arbitrary bytes to the COBS/postcard decoder a gateway would run
//! and asserts that anything that decodes re-encodes into a frame that
//! fits the adapter's buffer.
//!
//! cargo fuzz run fuzz_radio_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use stillpos::adapters::radio::{MAX_FRAME_LEN, RadioMessage, encode_frame};

fuzz_target!(|data: &[u8]| {
    let mut owned = data.to_vec();
    if let Ok(msg) = postcard::from_bytes_cobs::<RadioMessage>(&mut owned) {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let frame = encode_frame(&msg, &mut buf).expect("decoded message must re-encode");
        assert_eq!(frame.last(), Some(&0));
    }
});
