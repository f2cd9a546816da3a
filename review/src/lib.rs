//! Review gate.
//!
//! Reviewers approve a proposal *key*, not a proposal text. The key covers
//! every target, value, payload byte and the description hash, so any edit
//! after approval produces a new, unapproved key.
//!
//! The governor consults a [`ProposalGate`] when a proposal is created.
//! [`ReviewGate`] is the reviewed variant; [`OpenGate`] approves everything.

pub mod error;
pub mod gate;

pub use error::ReviewError;
pub use gate::{OpenGate, ProposalGate, ReviewGate, ReviewRecord, Submission};
