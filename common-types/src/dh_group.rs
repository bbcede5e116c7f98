use num_bigint::BigUint;

/// A fixed finite-field Diffie-Hellman group: a safe prime, a generator, and
/// the byte length a public key is padded to on the wire (`DHPubKeyLen`).
///
/// `DHGroupID` in the spec is this struct's identity: peers must agree on
/// the same prime/generator pair out of band.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DhGroup {
    prime: BigUint,
    generator: BigUint,
    pub_key_len: usize,
}

impl DhGroup {
    pub fn new(prime: BigUint, generator: BigUint, pub_key_len: usize) -> Self {
        DhGroup { prime, generator, pub_key_len }
    }

    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    pub fn generator(&self) -> &BigUint {
        &self.generator
    }

    /// `DHPubKeyLen`: the fixed byte length a public key is left-zero-padded to.
    pub fn pub_key_len(&self) -> usize {
        self.pub_key_len
    }

    /// The RFC 3526 2048-bit MODP group ("group 14"), generator 2.
    pub fn modp_2048() -> Self {
        // RFC 3526 section 3, the 2048-bit MODP prime, big-endian hex.
        const PRIME_HEX: &str = concat!(
            "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD",
            "129024E088A67CC74020BBEA63B139B22514A08798E3404DDEF9519B3CD3A43",
            "1B302B0A6DF25F14374FE1356D6D51C245E485B576625E7EC6F44C42E9A637E",
            "D6B0BFF5CB6F406B7EDEE386BFB5A899FA5AE9F24117C4B1FE649286651ECE4",
            "5B3DC2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F83655D23DCA",
            "3AD961C62F356208552BB9ED529077096966D670C354E4ABC9804F1746C08CA",
            "18217C32905E462E36CE3BE39E772C180E86039B2783A2EC07A28FB5C55DF06",
            "F4C52C9DE2BCBF6955817183995497CEA956AE515D2261898FA051015728E5A",
            "8AACAA68FFFFFFFFFFFFFFFF",
        );
        let prime = BigUint::parse_bytes(PRIME_HEX.as_bytes(), 16)
            .expect("RFC 3526 group 14 prime is a fixed, valid hex literal");
        DhGroup::new(prime, BigUint::from(2u32), 256)
    }
}
