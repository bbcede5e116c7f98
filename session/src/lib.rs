//! The state machine that binds `crypto`, `keyderiv` and `codec` together:
//! an authenticated Diffie-Hellman + RSA-PSS handshake, followed by a
//! duplex stream of encrypted, authenticated, framed commands.
//!
//! `Session` performs no I/O. Every method is a synchronous transform on
//! caller-supplied buffers; the `bytes_to_read_for_*` hints tell a
//! transport collaborator exactly how many bytes to `read_exact` before
//! calling the matching method. This mirrors how the handshake state
//! machine this module is modeled on keeps its per-act buffer transforms
//! free of any I/O trait bound, only touching `Read`/`Write` in the
//! handful of outer driver methods — here even those outer methods stay
//! buffer-in, buffer-out, since the transport is explicitly a collaborator
//! the core never owns.

mod error;
mod handshake;
mod phase;
mod record;

use codec::{decode, encode};
use common_types::{Command, DhGroup, RsaPublicKeyDer};
use crypto::{aes128_ctr_xor, dh_compute_secret, dh_generate, hmac_sha256, rsa_verify_pss_sha256, tags_equal, AesCtrState};
use keyderiv::{derive, SessionKeys};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use std::convert::TryFrom;
use zeroize::Zeroize;

pub use error::SessionError;
pub use handshake::CURRENT_PROTOCOL_VERSION;
pub use phase::Phase;
pub use record::{bytes_to_read_for_next_record, bytes_to_read_for_record_length, AUTH_KEY_LEN};

/// One client connection's cryptographic context, from handshake to
/// termination. Owns the DH keypair exclusively; once `Established`, all
/// four directional keys are fixed for the session's lifetime.
pub struct Session {
    group: DhGroup,
    cli_priv: BigUint,
    cli_pub: Vec<u8>,
    keys: Option<SessionKeys>,
    enc_state: Option<AesCtrState>,
    dec_state: Option<AesCtrState>,
    phase: Phase,
}

impl Session {
    /// Generates a fresh DH keypair for `group` and starts the session in
    /// `Phase::AwaitingServerHello`.
    pub fn new(group: DhGroup) -> Self {
        let mut rng = OsRng;
        let (cli_priv, cli_pub) = dh_generate(&group, &mut rng);
        Session {
            group,
            cli_priv,
            cli_pub,
            keys: None,
            enc_state: None,
            dec_state: None,
            phase: Phase::AwaitingServerHello,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `bytes_to_read_for_server_hello(rsaPubKey)`.
    pub fn bytes_to_read_for_server_hello(
        &self,
        rsa_pub_key: &RsaPublicKeyDer,
    ) -> Result<usize, SessionError> {
        handshake::bytes_to_read_for_server_hello(self.group.pub_key_len(), rsa_pub_key)
    }

    /// Processes a Server Hello and returns the Client Hello to send back.
    /// Valid only in `AwaitingServerHello`; advances to `Established` on
    /// success, `Failed` on any error.
    pub fn reply_to_server_hello(
        &mut self,
        buf: &[u8],
        rsa_pub_key: &RsaPublicKeyDer,
    ) -> Result<Vec<u8>, SessionError> {
        if self.phase != Phase::AwaitingServerHello {
            return Err(SessionError::SessionFailed);
        }

        match self.try_reply_to_server_hello(buf, rsa_pub_key) {
            Ok(client_hello) => {
                self.phase = Phase::Established;
                log::debug!("session established after server hello");
                Ok(client_hello)
            }
            Err(err) => {
                self.phase = Phase::Failed;
                log::warn!("handshake failed: {}", err);
                Err(err)
            }
        }
    }

    fn try_reply_to_server_hello(
        &mut self,
        buf: &[u8],
        rsa_pub_key: &RsaPublicKeyDer,
    ) -> Result<Vec<u8>, SessionError> {
        let modulus_len = rsa_pub_key.modulus_len().map_err(|_| SessionError::BadKey)?;
        let hello = handshake::parse_server_hello(buf, self.group.pub_key_len(), modulus_len)?;

        if hello.version != handshake::CURRENT_PROTOCOL_VERSION {
            return Err(SessionError::ProtocolVersion);
        }

        let verified = rsa_verify_pss_sha256(rsa_pub_key, hello.signed_prefix, hello.signature)?;
        if !verified {
            return Err(SessionError::BadSignature);
        }

        let mut secret = dh_compute_secret(&self.group, &self.cli_priv, hello.server_dh_pub)?;
        let keys = derive(&secret, hello.nonce);
        secret.zeroize();

        self.enc_state = Some(AesCtrState::new(&keys.client_enc_key));
        self.dec_state = Some(AesCtrState::new(&keys.server_enc_key));

        let padded_cli_pub = handshake::left_zero_pad(&self.cli_pub, self.group.pub_key_len());
        let mut client_hello = Vec::with_capacity(1 + padded_cli_pub.len() + AUTH_KEY_LEN);
        client_hello.push(handshake::CURRENT_PROTOCOL_VERSION);
        client_hello.extend_from_slice(&padded_cli_pub);
        let tag = hmac_sha256(&keys.client_auth_key, &client_hello);
        client_hello.extend_from_slice(&tag);

        self.keys = Some(keys);
        Ok(client_hello)
    }

    /// Encodes, encrypts and authenticates `cmd` into one outbound record.
    /// Valid only in `Established`.
    pub fn write_command(&mut self, cmd: &Command, compress: bool) -> Result<Vec<u8>, SessionError> {
        self.require_established()?;

        match self.try_write_command(cmd, compress) {
            Ok(record) => Ok(record),
            Err(err) => {
                self.phase = Phase::Failed;
                log::warn!("write_command failed: {}", err);
                Err(err)
            }
        }
    }

    fn try_write_command(&mut self, cmd: &Command, compress: bool) -> Result<Vec<u8>, SessionError> {
        let plain = encode(cmd, compress)?;
        if plain.is_empty() {
            return Err(SessionError::EmptyFrame);
        }

        let cmd_len = u16::try_from(plain.len()).map_err(|_| SessionError::MalformedFrame)?;
        let cipher_text = aes128_ctr_xor(self.enc_state.as_mut().expect("established"), &plain);

        let mut header = Vec::with_capacity(2 + cipher_text.len());
        header.extend_from_slice(&cmd_len.to_le_bytes());
        header.extend_from_slice(&cipher_text);

        let client_auth_key = &self.keys.as_ref().expect("established").client_auth_key;
        let tag = hmac_sha256(client_auth_key, &header);

        header.extend_from_slice(&tag);
        Ok(header)
    }

    /// Verifies and decrypts one inbound record, `cipher(cmdLen) ‖ tag`.
    /// Valid only in `Established`.
    pub fn read_record(&mut self, buf: &[u8]) -> Result<Command, SessionError> {
        self.require_established()?;

        match self.try_read_record(buf) {
            Ok(cmd) => Ok(cmd),
            Err(err) => {
                self.phase = Phase::Failed;
                log::warn!("read_record failed: {}", err);
                Err(err)
            }
        }
    }

    fn try_read_record(&mut self, buf: &[u8]) -> Result<Command, SessionError> {
        if buf.len() < AUTH_KEY_LEN {
            return Err(SessionError::MalformedFrame);
        }
        let (cipher_text, tag) = buf.split_at(buf.len() - AUTH_KEY_LEN);
        let cmd_len = u16::try_from(cipher_text.len()).map_err(|_| SessionError::MalformedFrame)?;

        let mut header = Vec::with_capacity(2 + cipher_text.len());
        header.extend_from_slice(&cmd_len.to_le_bytes());
        header.extend_from_slice(cipher_text);

        let server_auth_key = &self.keys.as_ref().expect("established").server_auth_key;
        let expected_tag = hmac_sha256(server_auth_key, &header);

        // MAC is checked before the decrypt counter is ever touched: a
        // tampered record must not advance `dec_state`.
        if !tags_equal(&expected_tag, tag) {
            return Err(SessionError::BadMac);
        }

        let plain = aes128_ctr_xor(self.dec_state.as_mut().expect("established"), cipher_text);
        Ok(decode(&plain)?)
    }

    fn require_established(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Established => Ok(()),
            _ => Err(SessionError::SessionFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_types::Message;
    use rsa::pkcs1::EncodeRsaPublicKey;
    use rsa::pss::SigningKey;
    use rsa::signature::{RandomizedSigner, SignatureEncoding};
    use rsa::RsaPrivateKey;
    use sha2::Sha256;

    struct SimulatedServer {
        rsa_priv: RsaPrivateKey,
        rsa_pub_der: RsaPublicKeyDer,
        dh_priv: BigUint,
        dh_pub: Vec<u8>,
        nonce: [u8; handshake::NONCE_LEN],
    }

    fn simulate_server(group: &DhGroup) -> SimulatedServer {
        let mut rng = OsRng;
        let rsa_priv = RsaPrivateKey::new(&mut rng, 2048).unwrap();
        let rsa_pub = rsa_priv.to_public_key();
        let rsa_pub_der = RsaPublicKeyDer::from_der(rsa_pub.to_pkcs1_der().unwrap().as_bytes().to_vec());

        let (dh_priv, dh_pub) = dh_generate(group, &mut rng);
        let mut nonce = [0u8; handshake::NONCE_LEN];
        use rand::RngCore;
        rng.fill_bytes(&mut nonce);

        SimulatedServer { rsa_priv, rsa_pub_der, dh_priv, dh_pub, nonce }
    }

    fn server_hello(server: &SimulatedServer, group: &DhGroup) -> Vec<u8> {
        let padded_pub = handshake::left_zero_pad(&server.dh_pub, group.pub_key_len());

        let mut signed_prefix = Vec::with_capacity(1 + padded_pub.len());
        signed_prefix.push(handshake::CURRENT_PROTOCOL_VERSION);
        signed_prefix.extend_from_slice(&padded_pub);

        let signing_key = SigningKey::<Sha256>::new(server.rsa_priv.clone());
        let mut rng = OsRng;
        let signature = signing_key.sign_with_rng(&mut rng, &signed_prefix).to_vec();

        let mut hello = signed_prefix;
        hello.extend_from_slice(&signature);
        hello.extend_from_slice(&server.nonce);
        hello
    }

    fn established_pair() -> (Session, SimulatedServer, DhGroup, Vec<u8>) {
        let group = DhGroup::modp_2048();
        let server = simulate_server(&group);
        let mut client = Session::new(group.clone());

        let hello = server_hello(&server, &group);
        assert_eq!(hello.len(), client.bytes_to_read_for_server_hello(&server.rsa_pub_der).unwrap());

        let client_hello = client.reply_to_server_hello(&hello, &server.rsa_pub_der).unwrap();
        assert_eq!(client.phase(), Phase::Established);
        assert_eq!(client_hello.len(), 1 + group.pub_key_len() + AUTH_KEY_LEN);
        assert_eq!(client_hello[0], CURRENT_PROTOCOL_VERSION);

        (client, server, group, client_hello)
    }

    #[test]
    fn handshake_establishes_session_and_client_hello_verifies() {
        let (_client, _server, _group, _client_hello) = established_pair();
    }

    /// Spec testable property 6 ("handshake agreement"): a Client Hello's
    /// trailing tag must verify under the `clientAuthKey` the *server* side
    /// independently derives from its own DH private key, the client's
    /// public key (as transmitted in the Client Hello), and the same nonce
    /// it sent — not merely under whatever key the client happened to tag
    /// it with. This catches a wrong-key or wrong-byte-range bug that every
    /// other test, which only checks the client's self-consistent view,
    /// would miss.
    #[test]
    fn handshake_agreement_client_hello_verifies_under_server_derived_key() {
        let (_client, server, group, client_hello) = established_pair();

        let signed_len = 1 + group.pub_key_len();
        let (signed_prefix, tag) = client_hello.split_at(signed_len);
        let client_pub = &signed_prefix[1..];

        let server_secret = dh_compute_secret(&group, &server.dh_priv, client_pub).unwrap();
        let server_side_keys = derive(&server_secret, &server.nonce);

        let expected_tag = hmac_sha256(&server_side_keys.client_auth_key, signed_prefix);
        assert!(tags_equal(&expected_tag, tag));
    }

    #[test]
    fn wrong_protocol_version_fails_the_session() {
        let group = DhGroup::modp_2048();
        let server = simulate_server(&group);
        let mut client = Session::new(group.clone());

        let mut hello = server_hello(&server, &group);
        hello[0] = CURRENT_PROTOCOL_VERSION.wrapping_add(1);

        let err = client.reply_to_server_hello(&hello, &server.rsa_pub_der).unwrap_err();
        assert!(matches!(err, SessionError::ProtocolVersion));
        assert_eq!(client.phase(), Phase::Failed);
    }

    #[test]
    fn tampered_signature_fails_the_session() {
        let group = DhGroup::modp_2048();
        let server = simulate_server(&group);
        let mut client = Session::new(group.clone());

        let mut hello = server_hello(&server, &group);
        // Flip the last byte of the signature region, leaving the nonce intact.
        let sig_region_end = 1 + group.pub_key_len() + server.rsa_pub_der.modulus_len().unwrap();
        hello[sig_region_end - 1] ^= 0x01;

        let err = client.reply_to_server_hello(&hello, &server.rsa_pub_der).unwrap_err();
        assert!(matches!(err, SessionError::BadSignature));
        assert_eq!(client.phase(), Phase::Failed);
    }

    #[test]
    fn failure_is_sticky() {
        let group = DhGroup::modp_2048();
        let server = simulate_server(&group);
        let mut client = Session::new(group.clone());

        let mut hello = server_hello(&server, &group);
        hello[0] ^= 0xFF;
        let _ = client.reply_to_server_hello(&hello, &server.rsa_pub_der);
        assert_eq!(client.phase(), Phase::Failed);

        let cmd = Command::new(1, Vec::new(), Message::empty(), Vec::new()).unwrap();
        assert!(matches!(client.write_command(&cmd, false), Err(SessionError::SessionFailed)));
        assert!(matches!(client.read_record(&[0u8; 40]), Err(SessionError::SessionFailed)));
        assert!(matches!(
            client.reply_to_server_hello(&hello, &server.rsa_pub_der),
            Err(SessionError::SessionFailed)
        ));
    }

    #[test]
    fn write_then_read_round_trips_a_command() {
        let (mut client, _server, _group, _client_hello) = established_pair();

        let cmd = Command::new(
            0x01,
            vec![b"hello".to_vec()],
            Message::new(vec![(b"k".to_vec(), b"v".to_vec())]).unwrap(),
            b"X".to_vec(),
        )
        .unwrap();

        // A second client-keyed cipher at the initial counter position
        // stands in for "the server's view" of a record the client wrote,
        // since this is the first record on a freshly established session
        // and `client.enc_state` has not advanced off counter zero yet.
        let client_enc_key = client.keys.as_ref().unwrap().client_enc_key;
        let client_auth_key = client.keys.as_ref().unwrap().client_auth_key;
        let mut mirror_state = AesCtrState::new(&client_enc_key);

        let record = client.write_command(&cmd, false).unwrap();
        let cmd_len = u16::from_le_bytes([record[0], record[1]]) as usize;
        let framed = &record[2..];
        assert_eq!(framed.len(), bytes_to_read_for_next_record(cmd_len));

        let (cipher_text, tag) = framed.split_at(framed.len() - AUTH_KEY_LEN);
        let mut header = Vec::new();
        header.extend_from_slice(&(cmd_len as u16).to_le_bytes());
        header.extend_from_slice(cipher_text);
        assert!(tags_equal(&hmac_sha256(&client_auth_key, &header), tag));

        let plain = aes128_ctr_xor(&mut mirror_state, cipher_text);
        assert_eq!(decode(&plain).unwrap(), cmd);
    }

    #[test]
    fn bit_flip_in_tag_is_rejected_and_decrypt_counter_is_unchanged() {
        let group = DhGroup::modp_2048();
        let server = simulate_server(&group);
        let mut a = Session::new(group.clone());
        let hello = server_hello(&server, &group);
        a.reply_to_server_hello(&hello, &server.rsa_pub_der).unwrap();

        // Simulate an inbound record encrypted with the session's own
        // server_enc_key/server_auth_key so read_record can verify it.
        let server_auth_key = a.keys.as_ref().unwrap().server_auth_key;
        let server_enc_key = a.keys.as_ref().unwrap().server_enc_key;
        let mut enc_state = AesCtrState::new(&server_enc_key);

        let cmd = Command::new(2, Vec::new(), Message::empty(), b"payload".to_vec()).unwrap();
        let plain = encode(&cmd, false).unwrap();
        let cmd_len = plain.len() as u16;
        let cipher_text = aes128_ctr_xor(&mut enc_state, &plain);

        let mut header = Vec::new();
        header.extend_from_slice(&cmd_len.to_le_bytes());
        header.extend_from_slice(&cipher_text);
        let tag = hmac_sha256(&server_auth_key, &header);

        let mut record = cipher_text.clone();
        record.extend_from_slice(&tag);
        let mut tampered = record.clone();
        tampered[tampered.len() - 1] ^= 0x01;

        let err = a.read_record(&tampered).unwrap_err();
        assert!(matches!(err, SessionError::BadMac));
        // BadMac is still fatal per policy: the session is now Failed.
        assert_eq!(a.phase(), Phase::Failed);
    }
}
