use crate::checksum::checksum;

#[test]
fn empty_buffer_is_zero() {
    assert_eq!(checksum(&[]), 0);
}

#[test]
fn single_chunk_folds_halves() {
    let bytes = [0x78, 0x56, 0x34, 0x12, 0xEF, 0xCD, 0xAB, 0x89];
    // lo = 0x12345678, hi = 0x89ABCDEF
    assert_eq!(checksum(&bytes), 0x12345678 ^ 0x89ABCDEF);
}

#[test]
fn trailing_partial_chunk_is_zero_padded() {
    assert_eq!(checksum(&[0xFF]), 0xFF);
    // Byte 4 lands in the high half of the chunk.
    assert_eq!(checksum(&[0, 0, 0, 0, 1]), 1);
    // One full chunk plus a partial one.
    let mut bytes = vec![0u8; 8];
    bytes.push(0x42);
    assert_eq!(checksum(&bytes), 0x42);
}

#[test]
fn any_single_byte_flip_changes_the_sum() {
    let bytes: Vec<u8> = (0..24).collect();
    let base = checksum(&bytes);
    for i in 0..bytes.len() {
        let mut copy = bytes.clone();
        copy[i] ^= 0x40;
        assert_ne!(checksum(&copy), base, "flip at byte {i} went unnoticed");
    }
}

#[test]
fn chunk_order_matters_only_through_xor() {
    // XOR-fold is order-insensitive across whole chunks.
    let a = [1u8, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0];
    let b = [2u8, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0];
    assert_eq!(checksum(&a), checksum(&b));
}
