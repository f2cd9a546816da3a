//! Blake2b hashing for proposal keys, operation ids and descriptions.
//!
//! All multi-field hashes start with a domain tag and length-prefix every
//! variable-size field, so distinct tuples never share an encoding.

use agora_types::{Address, Call, DescriptionHash, OperationId, ProposalId, SubmissionId};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

const PROPOSAL_TAG: &[u8] = b"agora/proposal/v1";
const OPERATION_TAG: &[u8] = b"agora/operation/v1";
const SALT_TAG: &[u8] = b"agora/salt/v1";
const SUBMISSION_TAG: &[u8] = b"agora/submission/v1";

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash a proposal description. Any change to the text yields a new hash.
pub fn hash_description(description: &str) -> DescriptionHash {
    DescriptionHash::new(blake2b_256(description.as_bytes()))
}

/// Feed a call batch as three parallel length-prefixed lists.
fn update_batch(hasher: &mut Blake2b256, calls: &[Call]) {
    hasher.update((calls.len() as u64).to_be_bytes());
    for call in calls {
        hasher.update(call.target.as_bytes());
    }
    for call in calls {
        hasher.update(call.value.to_be_bytes());
    }
    for call in calls {
        hasher.update((call.payload.len() as u64).to_be_bytes());
        hasher.update(&call.payload);
    }
}

fn finalize(hasher: Blake2b256) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Deterministic proposal key over `(targets, values, payloads, description_hash)`.
pub fn hash_proposal(calls: &[Call], description_hash: &DescriptionHash) -> ProposalId {
    let mut hasher = Blake2b256::new();
    hasher.update(PROPOSAL_TAG);
    update_batch(&mut hasher, calls);
    hasher.update(description_hash.as_bytes());
    ProposalId::new(finalize(hasher))
}

/// Timelock operation id over the batch, its predecessor and a salt.
pub fn hash_operation(calls: &[Call], predecessor: &OperationId, salt: &[u8; 32]) -> OperationId {
    let mut hasher = Blake2b256::new();
    hasher.update(OPERATION_TAG);
    update_batch(&mut hasher, calls);
    hasher.update(predecessor.as_bytes());
    hasher.update(salt);
    OperationId::new(finalize(hasher))
}

/// Salt a governor uses when queueing: binds the operation to both the
/// governor identity and the proposal description.
pub fn governor_salt(governor: &Address, description_hash: &DescriptionHash) -> [u8; 32] {
    blake2b_256_multi(&[SALT_TAG, governor.as_bytes(), description_hash.as_bytes()])
}

/// Identifier of a review submission, derived from who submitted what.
pub fn submission_id(
    submitter: &Address,
    proposal: &ProposalId,
    title: &str,
    metadata: &str,
) -> SubmissionId {
    let mut hasher = Blake2b256::new();
    hasher.update(SUBMISSION_TAG);
    hasher.update(submitter.as_bytes());
    hasher.update(proposal.as_bytes());
    hasher.update((title.len() as u64).to_be_bytes());
    hasher.update(title.as_bytes());
    hasher.update((metadata.len() as u64).to_be_bytes());
    hasher.update(metadata.as_bytes());
    SubmissionId::new(finalize(hasher))
}
