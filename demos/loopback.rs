//! Drives a full handshake and one encrypted record round trip against a
//! simulated server, entirely in memory. Run with `cargo run --example
//! loopback` once the crate is vendored with real network I/O around it;
//! this demo only exercises the protocol core.

use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pss::SigningKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::RsaPrivateKey;
use sha2::Sha256;

use uniqush_proto::{Command, DhGroup, Message, RsaPublicKeyDer, Session, CURRENT_PROTOCOL_VERSION};

fn main() {
    env_logger::init();

    let group = DhGroup::modp_2048();
    let mut rng = OsRng;

    // --- simulated server side ---------------------------------------
    let server_rsa_priv = RsaPrivateKey::new(&mut rng, 2048).expect("rsa key generation");
    let server_rsa_pub = server_rsa_priv.to_public_key();
    let server_rsa_der =
        RsaPublicKeyDer::from_der(server_rsa_pub.to_pkcs1_der().unwrap().as_bytes().to_vec());

    let (_server_dh_priv, server_dh_pub) = crypto::dh_generate(&group, &mut rng);
    let padded_server_pub = left_zero_pad(&server_dh_pub, group.pub_key_len());

    let mut signed_prefix = Vec::with_capacity(1 + padded_server_pub.len());
    signed_prefix.push(CURRENT_PROTOCOL_VERSION);
    signed_prefix.extend_from_slice(&padded_server_pub);

    let signing_key = SigningKey::<Sha256>::new(server_rsa_priv);
    let signature = signing_key.sign_with_rng(&mut rng, &signed_prefix).to_vec();

    let mut nonce = [0u8; 32];
    rng.fill_bytes(&mut nonce);

    let mut server_hello = signed_prefix;
    server_hello.extend_from_slice(&signature);
    server_hello.extend_from_slice(&nonce);

    // --- client side ---------------------------------------------------
    let mut client = Session::new(group);
    let expected_len = client.bytes_to_read_for_server_hello(&server_rsa_der).unwrap();
    assert_eq!(expected_len, server_hello.len());

    let client_hello = client.reply_to_server_hello(&server_hello, &server_rsa_der).unwrap();
    println!("handshake established; client hello is {} bytes", client_hello.len());
    println!("session phase: {:?}", client.phase());

    let cmd = Command::new(
        0x01,
        vec![b"hello".to_vec()],
        Message::new(vec![(b"k".to_vec(), b"v".to_vec())]).unwrap(),
        b"loopback demo".to_vec(),
    )
    .unwrap();

    let record = client.write_command(&cmd, true).unwrap();
    println!("wrote one compressed, encrypted record of {} bytes", record.len());
}

fn left_zero_pad(bytes: &[u8], len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(bytes);
    out
}
