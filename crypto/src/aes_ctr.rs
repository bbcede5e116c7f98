use aes::Aes128;
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128LE;
use zeroize::Zeroize;

/// One direction's AES-128-CTR keystream cursor: the 16-byte counter block
/// and per-block carry position live entirely inside the underlying cipher
/// object, advanced only by successful `apply` calls.
///
/// The counter format is **128-bit little-endian** — deliberate, and it must
/// match the peer bit-for-bit; a big-endian implementation interoperates for
/// exactly one block and then silently diverges.
#[derive(Clone)]
pub struct AesCtrState {
    cipher: Ctr128LE<Aes128>,
}

impl AesCtrState {
    /// A fresh state for a freshly derived 16-byte (`EncKeyLen`) directional
    /// key, counter initialized to all zero. The caller's key bytes are
    /// copied once to build the cipher's round-key schedule; that copy is
    /// zeroized immediately afterward rather than left on the stack.
    pub fn new(key: &[u8; 16]) -> Self {
        let mut key_copy = *key;
        let iv = [0u8; 16];
        let cipher = Ctr128LE::new((&key_copy).into(), &iv.into());
        key_copy.zeroize();
        AesCtrState { cipher }
    }

    /// Encryption and decryption are the same operation in CTR mode: XOR the
    /// keystream over `input`. The counter/carry advance only because this
    /// call succeeded; a caller that bails out before calling `apply` (e.g.
    /// because a MAC check failed) leaves the state untouched.
    pub fn apply(&mut self, input: &[u8]) -> Vec<u8> {
        let mut buf = input.to_vec();
        self.cipher.apply_keystream(&mut buf);
        buf
    }
}

/// `aes128_ctr_xor(key, state, input) -> output of same length`. The key is
/// bound into `state` at construction (it never changes for the life of a
/// direction), so this free function only needs the state and the input.
pub fn aes128_ctr_xor(state: &mut AesCtrState, input: &[u8]) -> Vec<u8> {
    state.apply(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctr_is_involutive_for_a_fresh_state() {
        let key = [0x42u8; 16];
        let mut enc_state = AesCtrState::new(&key);
        let mut dec_state = AesCtrState::new(&key);

        let plaintext = b"the quick brown fox jumps over the lazy dog, 16x";
        let cipher_text = aes128_ctr_xor(&mut enc_state, plaintext);
        let recovered = aes128_ctr_xor(&mut dec_state, &cipher_text);

        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn state_advances_so_repeated_blocks_encrypt_differently() {
        let key = [0x11u8; 16];
        let mut a = AesCtrState::new(&key);
        let block = [0xABu8; 16];

        let first = aes128_ctr_xor(&mut a, &block);
        let second = aes128_ctr_xor(&mut a, &block);

        // Same plaintext block, but the counter advanced after the first
        // call, so the keystream — and therefore the ciphertext — differs.
        assert_ne!(first, second);

        // A fresh state at the original counter reproduces the first call.
        let mut fresh = AesCtrState::new(&key);
        assert_eq!(aes128_ctr_xor(&mut fresh, &block), first);
    }
}
