//! Keyport primitive types.
//!
//! Everything an identity engine hashes, signs, or recovers lives here:
//! purpose-tagged key records, the canonical execution-request tuple and the
//! administrative signed-message digests, and fixed-width ECDSA signature
//! chunk handling.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod key;
pub mod request;
pub mod signature;

pub use key::{ECDSA_KEY_TYPE, Key, KeyId, Purpose, UnknownPurpose, key_address, key_id};
pub use request::{AdminCall, ExecutionRequest, OperationKind, admin_message_hash};
pub use signature::{
    SIGNATURE_CHUNK_LEN, SIGNATURE_LEN, SignatureError, recover_all, recover_signer, split_chunks,
};
