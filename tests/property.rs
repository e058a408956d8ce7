use personal_signer::{
    encode_typed_data, keccak256, personal_sign, private_key_to_address, to_checksum_address,
    verify_personal_sign,
};
use proptest::prelude::*;
use secp256k1::SecretKey;

const TEST_PRIVATE_KEY: &str = "cc9c0c2a98e539a19cfb44f674b4a1fb1f07e0072184cbdcd0524136542ea060";
const TEST_ADDRESS: &str = "0x0c9B5d5C6f4f095DA9Db0685689b6a22b0bF17C6";

fn any_key_hex() -> impl Strategy<Value = String> {
    prop::array::uniform32(any::<u8>()).prop_filter_map("valid secp256k1 scalar", |bytes| {
        SecretKey::from_slice(&bytes).ok().map(|key| hex::encode(key.secret_bytes()))
    })
}

/// (type name, text, encoded width)
fn any_typed_value() -> impl Strategy<Value = (&'static str, String, usize)> {
    prop_oneof![
        ".{0,40}".prop_map(|s: String| {
            let len = s.len();
            ("string", s, len)
        }),
        any::<bool>().prop_map(|b| ("bool", b.to_string(), 1)),
        any::<u8>().prop_map(|v| ("uint8", v.to_string(), 1)),
        any::<u16>().prop_map(|v| ("uint16", v.to_string(), 2)),
        any::<u64>().prop_map(|v| ("uint64", v.to_string(), 8)),
        any::<i32>().prop_map(|v| ("int32", v.to_string(), 4)),
        any::<u128>().prop_map(|v| ("uint128", v.to_string(), 16)),
        any::<i128>().prop_map(|v| ("int256", v.to_string(), 32)),
        prop::array::uniform20(any::<u8>()).prop_map(|b| ("address", to_checksum_address(&b), 20)),
    ]
}

proptest! {
    #[test]
    fn checksum_addresses_roundtrip(bytes in prop::array::uniform20(any::<u8>())) {
        let checksummed = to_checksum_address(&bytes);
        prop_assert!(checksummed.starts_with("0x"));

        let tail = checksummed.trim_start_matches("0x");
        let lower_expected = hex::encode(bytes);
        let lower_tail = tail.to_ascii_lowercase();
        prop_assert_eq!(lower_tail.as_str(), lower_expected.as_str());

        let hash = keccak256(lower_expected.as_bytes());
        let mut expected = String::from("0x");
        for (i, ch) in lower_expected.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if ch.is_ascii_digit() || nibble < 8 {
                expected.push(ch);
            } else {
                expected.push(ch.to_ascii_uppercase());
            }
        }
        prop_assert_eq!(checksummed, expected);
    }

    #[test]
    fn encoded_length_is_sum_of_widths(values in prop::collection::vec(any_typed_value(), 0..12)) {
        let types: Vec<&str> = values.iter().map(|(t, _, _)| *t).collect();
        let args: Vec<&str> = values.iter().map(|(_, a, _)| a.as_str()).collect();
        let expected: usize = values.iter().map(|(_, _, w)| *w).sum();

        let payload = encode_typed_data(&types, &args).expect("in-range values encode");
        prop_assert_eq!(payload.len(), expected);
    }

    #[test]
    fn fixed_width_integers_match_native_encoding(u in any::<u64>(), i in any::<i32>()) {
        let u_text = u.to_string();
        let i_text = i.to_string();
        let payload = encode_typed_data(&["uint64", "int32"], &[u_text.as_str(), i_text.as_str()]).unwrap();
        prop_assert_eq!(&payload[..8], &u.to_be_bytes()[..]);
        prop_assert_eq!(&payload[8..], &i.to_be_bytes()[..]);
    }

    #[test]
    fn narrow_uints_truncate_to_low_bits(v in any::<u64>()) {
        let text = v.to_string();
        let payload = encode_typed_data(&["uint8", "uint16"], &[text.as_str(), text.as_str()]).unwrap();
        prop_assert_eq!(payload[0], v as u8);
        prop_assert_eq!(&payload[1..], &(v as u16).to_be_bytes()[..]);
    }

    #[test]
    fn wide_signed_values_encode_their_magnitude(v in any::<i128>()) {
        let text = v.to_string();
        let magnitude = v.unsigned_abs().to_string();
        let signed = encode_typed_data(&["int256"], &[text.as_str()]).unwrap();
        let unsigned = encode_typed_data(&["uint256"], &[magnitude.as_str()]).unwrap();
        prop_assert_eq!(signed, unsigned);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn personal_sign_round_trip(key in any_key_hex(), message in prop::collection::vec(any::<u8>(), 0..128)) {
        let address = private_key_to_address(&key).unwrap();
        let signature = personal_sign(&message, &key).unwrap();
        prop_assert_eq!(
            verify_personal_sign(&signature, &message, &address).unwrap(),
            (true, address.clone())
        );

        // Prefixed and unprefixed keys are the same key
        prop_assert_eq!(personal_sign(&message, &format!("0x{}", key)).unwrap(), signature);
    }

    #[test]
    fn address_derivation_is_stable(key in any_key_hex()) {
        let first = private_key_to_address(&key).unwrap();
        let second = private_key_to_address(&key).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), 42);

        let bytes = hex::decode(&first[2..]).unwrap();
        prop_assert_eq!(bytes.len(), 20);
        prop_assert_eq!(to_checksum_address(&bytes), first);
    }
}

#[test]
fn single_byte_tampering_rarely_verifies() {
    let message = "helloworld";
    let signature = personal_sign(message, TEST_PRIVATE_KEY).unwrap();
    let original = hex::decode(&signature[2..]).unwrap();

    let mut total = 0usize;
    let mut collisions = 0usize;
    for position in 0..original.len() {
        for delta in 1..=255u8 {
            let mut tampered = original.clone();
            tampered[position] = tampered[position].wrapping_add(delta);
            total += 1;

            let (verified, address) = verify_personal_sign(&hex::encode(&tampered), message, TEST_ADDRESS)
                .expect("well-formed signatures never error");
            if verified {
                collisions += 1;
                eprintln!(
                    "tampered signature still verifies: byte {} changed {:#04x} -> {:#04x}",
                    position, original[position], tampered[position]
                );
            } else {
                assert!(address.is_empty());
            }
        }
    }

    assert_eq!(total, 65 * 255);
    assert!(collisions * 256 <= total, "{} of {} mutations verified", collisions, total);
}
