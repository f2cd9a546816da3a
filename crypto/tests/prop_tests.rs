use proptest::prelude::*;

use agora_types::{Address, Call};

fn batch(payload: Vec<u8>, value: u128) -> Vec<Call> {
    vec![Call::new(Address::from_label("token"), value, payload)]
}

proptest! {
    /// The proposal key is a pure function of its inputs.
    #[test]
    fn proposal_key_pure(payload in prop::collection::vec(any::<u8>(), 0..128), value in any::<u128>(), text in ".{0,64}") {
        let d = agora_crypto::hash_description(&text);
        prop_assert_eq!(
            agora_crypto::hash_proposal(&batch(payload.clone(), value), &d),
            agora_crypto::hash_proposal(&batch(payload, value), &d)
        );
    }

    /// Flipping any single payload byte changes the key.
    #[test]
    fn payload_byte_flip_changes_key(payload in prop::collection::vec(any::<u8>(), 1..128), idx in any::<prop::sample::Index>()) {
        let d = agora_crypto::hash_description("mint");
        let mut altered = payload.clone();
        let i = idx.index(altered.len());
        altered[i] ^= 0x01;
        prop_assert_ne!(
            agora_crypto::hash_proposal(&batch(payload, 0), &d),
            agora_crypto::hash_proposal(&batch(altered, 0), &d)
        );
    }

    /// Appending one character to the description changes the key.
    #[test]
    fn description_suffix_changes_key(text in ".{0,64}", extra in any::<char>()) {
        let calls = batch(vec![1, 2, 3], 0);
        let mut longer = text.clone();
        longer.push(extra);
        prop_assert_ne!(
            agora_crypto::hash_proposal(&calls, &agora_crypto::hash_description(&text)),
            agora_crypto::hash_proposal(&calls, &agora_crypto::hash_description(&longer))
        );
    }
}
