use alloy_primitives::{Address, U256};
use keyport_contracts::{IdentityAbiError, MultiSigAbiError};
use keyport_primitives::SignatureError;

/// Reason an outbound call could not be completed.
///
/// Raised by [`CallExecutor`](crate::executor::CallExecutor) implementations
/// and by self-call dispatch when the calldata does not decode to a
/// dispatchable operation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CallError(pub String);

/// Rejection reasons of the authorization engine.
///
/// Every variant aborts the operation with no partial state change. The one
/// documented exception: once authorization has succeeded the nonce is
/// consumed, so a [`CallFailed`](Self::CallFailed) after admission leaves
/// the nonce advanced. The signed message was spent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Caller or recovered signer lacks the required purpose, owner, or
    /// signer status.
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    /// Malformed or unrecoverable signature bytes, including blobs whose
    /// length is not a multiple of the chunk width.
    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    /// The same signer was counted twice within one multi-signature blob.
    #[error("signer {0} counted twice in one multi-signature blob")]
    DuplicateSigner(Address),

    /// Fewer distinct valid signer signatures than the configured
    /// threshold. Also reported when the threshold is 0, which disables the
    /// signer path entirely.
    #[error("{have} valid signer signatures, {need} required")]
    ThresholdNotMet { have: u32, need: u32 },

    /// An action-purpose key tried to target the identity's own address.
    #[error("action keys cannot target the identity's own address")]
    SelfTargetingForbidden,

    /// Removing this key would leave zero management keys.
    #[error("removing the last management key is forbidden")]
    LastManagerRemoval,

    /// Removing this owner would leave zero owners.
    #[error("removing the last owner is forbidden")]
    LastOwnerRemoval,

    /// The supplied nonce is behind the current one; the signed message was
    /// already consumed or skipped.
    #[error("nonce {supplied} is stale, current nonce is {current}")]
    StaleNonce { supplied: u64, current: u64 },

    /// The authorized action itself failed.
    #[error("authorized call failed: {0}")]
    CallFailed(#[from] CallError),
}

impl IdentityError {
    /// ABI error shape for `IIdentity` callers.
    pub fn to_identity_abi(&self) -> IdentityAbiError {
        match self {
            Self::Unauthorized => IdentityAbiError::unauthorized(),
            Self::InvalidSignature(_) => IdentityAbiError::invalid_signature(),
            Self::DuplicateSigner(signer) => IdentityAbiError::duplicate_signer(*signer),
            Self::ThresholdNotMet { have, need } => {
                IdentityAbiError::threshold_not_met(U256::from(*have), U256::from(*need))
            }
            Self::SelfTargetingForbidden => IdentityAbiError::self_targeting_forbidden(),
            Self::LastManagerRemoval => IdentityAbiError::last_manager_removal(),
            Self::LastOwnerRemoval => IdentityAbiError::last_owner_removal(),
            Self::StaleNonce { supplied, current } => {
                IdentityAbiError::stale_nonce(U256::from(*supplied), U256::from(*current))
            }
            Self::CallFailed(_) => IdentityAbiError::call_failed(),
        }
    }

    /// ABI error shape for `IMultiSigIdentity` callers.
    pub fn to_multisig_abi(&self) -> MultiSigAbiError {
        match self {
            Self::Unauthorized => MultiSigAbiError::unauthorized(),
            Self::InvalidSignature(_) => MultiSigAbiError::invalid_signature(),
            Self::DuplicateSigner(signer) => MultiSigAbiError::duplicate_signer(*signer),
            Self::ThresholdNotMet { have, need } => {
                MultiSigAbiError::threshold_not_met(U256::from(*have), U256::from(*need))
            }
            Self::SelfTargetingForbidden => MultiSigAbiError::self_targeting_forbidden(),
            Self::LastManagerRemoval => MultiSigAbiError::last_manager_removal(),
            Self::LastOwnerRemoval => MultiSigAbiError::last_owner_removal(),
            Self::StaleNonce { supplied, current } => {
                MultiSigAbiError::stale_nonce(U256::from(*supplied), U256::from(*current))
            }
            Self::CallFailed(_) => MultiSigAbiError::call_failed(),
        }
    }
}
