//! Keyport identity engines.
//!
//! A keyport identity is a self-sovereign, proxy-style account: a value
//! owning its key/owner/signer registries, a replay-protection nonce, and
//! an authorization gate that admits or rejects proposed actions. Two
//! flavors ship here:
//!
//! - [`Identity`]: purpose-tagged keys (management vs action) with signed
//!   execution over a full action tuple.
//! - [`MultiSigIdentity`]: owners with full control plus a threshold-gated
//!   signer set.
//!
//! Each instance is an independently constructed value; there is no ambient
//! state, and every operation is one atomic transition on `&mut self`.
//! Outbound calls cross the [`CallExecutor`] boundary.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod error;
pub mod executor;
pub mod identity;
pub mod keystore;
pub mod multisig;
pub mod set;

pub use error::{CallError, IdentityError};
pub use executor::{CallExecutor, NoopExecutor, RecordedCall, RecordingExecutor};
pub use identity::Identity;
pub use keystore::KeyStore;
pub use multisig::MultiSigIdentity;
pub use set::OrderedSet;
