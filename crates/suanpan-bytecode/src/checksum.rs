//! Container integrity checksum.

/// XOR-fold checksum over 8-byte little-endian chunks.
///
/// Each chunk contributes its low and high 32-bit halves XORed together;
/// a trailing partial chunk is zero-padded. Flipping any single input
/// byte changes the result.
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut hash = 0u32;
    for chunk in bytes.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        let value = u64::from_le_bytes(word);
        hash ^= (value as u32) ^ ((value >> 32) as u32);
    }
    hash
}
