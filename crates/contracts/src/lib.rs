//! Keyport contract bindings: the ABI surface of the identity engines.
//!
//! The interfaces here carry three things the engines in `keyport-identity`
//! rely on: function selectors for self-call dispatch, the typed events
//! recorded in each identity's journal, and ABI error shapes for callers
//! that need a wire encoding of a rejection.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub use alloy_sol_types::sol;

pub mod identity;
pub mod multisig;

pub use identity::{IIdentity, IdentityAbiError, IdentityCall, IdentityEvent};
pub use multisig::{IMultiSigIdentity, MultiSigAbiError, MultiSigCall, MultiSigIdentityEvent};
