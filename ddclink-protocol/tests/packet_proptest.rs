//! Property tests for DDC packet framing

use ddclink_protocol::packet::{checksum, join_value, split_value, DdcPacket, CHECKSUM_SEED};
use proptest::prelude::*;

fn any_packet() -> impl Strategy<Value = DdcPacket> {
    (any::<u8>(), proptest::option::of(any::<u16>())).prop_map(|(command, value)| DdcPacket {
        command,
        value,
    })
}

proptest! {
    #[test]
    fn length_and_header_follow_body(packet in any_packet()) {
        let encoded = packet.encode_to_vec().unwrap();
        let body_len = packet.body().unwrap().len();

        prop_assert_eq!(encoded.len(), body_len + 3);
        prop_assert_eq!(encoded[0], 0x80 | (body_len as u8 + 1));
        prop_assert_eq!(encoded[1] as usize, body_len);
    }

    #[test]
    fn stored_checksum_matches_recomputed(packet in any_packet()) {
        let encoded = packet.encode_to_vec().unwrap();
        let (last, covered) = encoded.split_last().unwrap();
        let recomputed = covered.iter().fold(CHECKSUM_SEED, |acc, &b| acc ^ b);

        prop_assert_eq!(*last, recomputed);
        prop_assert_eq!(checksum(&encoded), *last);
    }

    #[test]
    fn value_bytes_are_big_endian(value in any::<u16>()) {
        let [high, low] = split_value(value);
        prop_assert_eq!(high, (value >> 8) as u8);
        prop_assert_eq!(low, (value & 0xFF) as u8);
        prop_assert_eq!(join_value(high, low), value);
    }

    #[test]
    fn decode_accepts_every_encoded_packet(packet in any_packet()) {
        let encoded = packet.encode_to_vec().unwrap();
        prop_assert_eq!(DdcPacket::decode(&encoded), Ok(packet));
    }

    #[test]
    fn single_bit_flip_is_rejected(packet in any_packet(), index in 0usize..6, bit in 0u8..8) {
        let mut encoded = packet.encode_to_vec().unwrap();
        let index = index % encoded.len();
        encoded[index] ^= 1 << bit;
        prop_assert!(DdcPacket::decode(&encoded).is_err());
    }
}
