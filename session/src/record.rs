/// HMAC-SHA256 full tag length; also the length of the DH/RSA derived
/// directional auth keys.
pub const AUTH_KEY_LEN: usize = 32;

/// `bytes_to_read_for_record_length() -> 2`: every record starts with a
/// little-endian `u16` ciphertext length.
pub fn bytes_to_read_for_record_length() -> usize {
    2
}

/// `bytes_to_read_for_next_record(cmdLen) -> cmdLen + AuthKeyLen`.
pub fn bytes_to_read_for_next_record(cmd_len: usize) -> usize {
    cmd_len + AUTH_KEY_LEN
}
