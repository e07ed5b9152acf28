use proptest::prelude::*;

use crate::encrypt::{decrypt_message, encrypt_message, Nonce};
use crate::sign::{
    create_signature, read_signed_message, sign_message, verify_signature, SIGNATURE_HEX_LEN,
};
use crate::wallet::{KeyPair, Wallet};
use crate::WalletError;

fn flip_hex_char(hex: &str, index: usize) -> String {
    let mut chars: Vec<char> = hex.chars().collect();
    chars[index] = if chars[index] == '0' { '1' } else { '0' };
    chars.into_iter().collect()
}

proptest! {
    // Same seed, same keys
    #[test]
    fn test_construction_is_deterministic(seed in any::<[u8; 32]>()) {
        let a = KeyPair::from_seed(&seed);
        let b = KeyPair::from_seed(&seed);
        prop_assert_eq!(a.public_key(), b.public_key());
        prop_assert_eq!(a.secret_key_hex(), b.secret_key_hex());
        prop_assert_eq!(a.secret_key_hex(), hex::encode(seed));
    }

    #[test]
    fn test_generated_pairs_are_valid(seed in any::<[u8; 32]>(), other in any::<[u8; 32]>()) {
        let wallet = Wallet::from_seed(&seed);
        prop_assert!(Wallet::is_valid_pair(&wallet.secret_key_hex(), &wallet.public_key_hex()));

        let stranger = Wallet::from_seed(&other);
        if seed != other {
            prop_assert!(!Wallet::is_valid_pair(&wallet.secret_key_hex(), &stranger.public_key_hex()));
        }
    }

    #[test]
    fn test_signature_round_trip(seed in any::<[u8; 32]>(), message in ".*") {
        let keys = KeyPair::from_seed(&seed);
        let signature = create_signature(&message, &keys);

        prop_assert_eq!(signature.len(), SIGNATURE_HEX_LEN);
        prop_assert!(verify_signature(&signature, &message, &keys.public_key_hex()));
    }

    #[test]
    fn test_signature_bit_flip_fails(
        seed in any::<[u8; 32]>(),
        message in ".*",
        index in 0..SIGNATURE_HEX_LEN,
    ) {
        let keys = KeyPair::from_seed(&seed);
        let tampered = flip_hex_char(&create_signature(&message, &keys), index);
        prop_assert!(!verify_signature(&tampered, &message, &keys.public_key_hex()));
    }

    #[test]
    fn test_signature_wrong_message_fails(
        seed in any::<[u8; 32]>(),
        message in ".*",
        other in ".*",
    ) {
        prop_assume!(message != other);
        let keys = KeyPair::from_seed(&seed);
        let signature = create_signature(&message, &keys);
        prop_assert!(!verify_signature(&signature, &other, &keys.public_key_hex()));
    }

    #[test]
    fn test_signed_message_round_trip(seed in any::<[u8; 32]>(), message in ".*") {
        let keys = KeyPair::from_seed(&seed);
        let signed = sign_message(&message, &keys);

        prop_assert_eq!(signed.len(), SIGNATURE_HEX_LEN + 2 * message.len());
        let signature = create_signature(&message, &keys);
        prop_assert_eq!(&signed[..SIGNATURE_HEX_LEN], signature.as_str());
        prop_assert_eq!(read_signed_message(&signed, &keys.public_key_hex()), Some(message));
    }

    #[test]
    fn test_signed_message_corruption_fails(
        seed in any::<[u8; 32]>(),
        message in ".+",
        position in any::<prop::sample::Index>(),
    ) {
        let keys = KeyPair::from_seed(&seed);
        let signed = sign_message(&message, &keys);
        let tampered = flip_hex_char(&signed, position.index(signed.len()));
        prop_assert_eq!(read_signed_message(&tampered, &keys.public_key_hex()), None);
    }

    #[test]
    fn test_encrypt_decrypt_both_roles(
        sender in any::<[u8; 32]>(),
        receiver in any::<[u8; 32]>(),
        nonce in any::<[u8; 24]>(),
        message in ".*",
    ) {
        let sender = KeyPair::from_seed(&sender);
        let receiver = KeyPair::from_seed(&receiver);
        let nonce = Nonce::from_bytes(nonce);

        let out = encrypt_message(&sender, receiver.public_key(), &message, Some(nonce)).unwrap();
        prop_assert!(out.encrypted_message.starts_with('#'));
        prop_assert_eq!(out.encrypted_message.len(), 1 + 2 * (16 + message.len()));

        let by_receiver =
            decrypt_message(&receiver, sender.public_key(), &out.encrypted_message, &nonce).unwrap();
        let by_sender =
            decrypt_message(&sender, receiver.public_key(), &out.encrypted_message, &nonce).unwrap();
        prop_assert_eq!(&by_receiver, &message);
        prop_assert_eq!(&by_sender, &message);
    }

    #[test]
    fn test_decrypt_with_wrong_nonce_fails(
        sender in any::<[u8; 32]>(),
        receiver in any::<[u8; 32]>(),
        nonce in any::<[u8; 24]>(),
        other_nonce in any::<[u8; 24]>(),
        message in ".*",
    ) {
        prop_assume!(nonce != other_nonce);
        let sender = KeyPair::from_seed(&sender);
        let receiver = KeyPair::from_seed(&receiver);

        let out = encrypt_message(
            &sender,
            receiver.public_key(),
            &message,
            Some(Nonce::from_bytes(nonce)),
        )
        .unwrap();
        let result = decrypt_message(
            &receiver,
            sender.public_key(),
            &out.encrypted_message,
            &Nonce::from_bytes(other_nonce),
        );
        prop_assert_eq!(result, Err(WalletError::DecryptionFailure));
    }
}
