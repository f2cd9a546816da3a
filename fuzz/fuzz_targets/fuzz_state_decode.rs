#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoders must reject malformed input without panicking.
    let _ = agora_token::TokenCall::decode(data);
    let _ = agora_governance::Dao::load_state(data);
    let _ = bincode::deserialize::<Vec<agora_types::Call>>(data);
    let _ = bincode::deserialize::<agora_types::ProposalId>(data);

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = agora_types::Address::from_hex(text);
        let _ = agora_types::ProposalId::from_hex(text);
    }
});
