//! End-to-end tests for the purpose-tagged key identity: signed execution,
//! self-call dispatch, and replay protection.

use alloy_primitives::{Address, Bytes, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolCall;
use keyport_contracts::{IIdentity, IdentityEvent};
use keyport_identity::{Identity, IdentityError, RecordingExecutor};
use keyport_primitives::{
    ECDSA_KEY_TYPE, ExecutionRequest, OperationKind, Purpose, key_id,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Calldata for `addKey(key_id(address), MANAGEMENT, ECDSA)`.
fn add_management_key_data(address: Address) -> Bytes {
    IIdentity::addKeyCall {
        key: key_id(address),
        purpose: U256::from(Purpose::Management.as_u64()),
        keyType: U256::from(ECDSA_KEY_TYPE),
    }
    .abi_encode()
    .into()
}

fn sign(request: &ExecutionRequest, signer: &PrivateKeySigner) -> Vec<u8> {
    signer
        .sign_hash_sync(&request.signature_hash())
        .unwrap()
        .as_bytes()
        .to_vec()
}

#[test]
fn executes_signed_messages_from_management_keys() -> eyre::Result<()> {
    init_tracing();
    let controller = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::new();

    let incoming = Address::random();
    let request = ExecutionRequest::call(
        identity.address(),
        identity.address(),
        U256::ZERO,
        add_management_key_data(incoming),
        1,
    );
    let signature = sign(&request, &controller);

    identity.execute_signed(&request, &signature, &mut executor)?;

    let events = identity.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IdentityEvent::KeyAdded(_)));
    assert_eq!(
        identity.get_keys_by_purpose(Purpose::Management),
        &[key_id(controller.address()), key_id(incoming)]
    );
    assert_eq!(identity.last_nonce(), 2);
    assert!(executor.calls.is_empty(), "self-calls never leave the identity");

    // Resubmitting the identical tuple and signature must fail: the nonce
    // inside the hash is now stale.
    assert_eq!(
        identity.execute_signed(&request, &signature, &mut executor),
        Err(IdentityError::StaleNonce {
            supplied: 1,
            current: 2
        })
    );
    assert_eq!(identity.last_nonce(), 2);
    assert!(identity.events().is_empty());
    Ok(())
}

#[test]
fn rejects_garbage_signature_bytes() {
    let controller = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::new();

    let request = ExecutionRequest::call(
        identity.address(),
        identity.address(),
        U256::ZERO,
        add_management_key_data(Address::random()),
        1,
    );

    let result = identity.execute_signed(&request, &[0xab, 0xcd, 0xef], &mut executor);
    assert!(matches!(result, Err(IdentityError::InvalidSignature(_))));
    assert_eq!(identity.last_nonce(), 0, "rejection leaves the nonce untouched");
    assert!(identity.events().is_empty());
}

#[test]
fn rejects_signatures_from_unknown_keys() {
    let controller = PrivateKeySigner::random();
    let stranger = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::new();

    let request = ExecutionRequest::call(
        identity.address(),
        identity.address(),
        U256::ZERO,
        add_management_key_data(Address::random()),
        1,
    );
    let signature = sign(&request, &stranger);

    assert_eq!(
        identity.execute_signed(&request, &signature, &mut executor),
        Err(IdentityError::Unauthorized)
    );
    assert_eq!(identity.last_nonce(), 0);
}

#[test]
fn action_keys_cannot_target_the_identity_itself() -> eyre::Result<()> {
    let controller = PrivateKeySigner::random();
    let actor = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::new();

    identity.add_key(
        controller.address(),
        key_id(actor.address()),
        Purpose::Action,
        ECDSA_KEY_TYPE,
    )?;
    identity.take_events();

    let request = ExecutionRequest::call(
        identity.address(),
        identity.address(),
        U256::ZERO,
        add_management_key_data(actor.address()),
        1,
    );
    let signature = sign(&request, &actor);

    assert_eq!(
        identity.execute_signed(&request, &signature, &mut executor),
        Err(IdentityError::SelfTargetingForbidden)
    );
    assert_eq!(identity.last_nonce(), 0);
    assert!(identity.events().is_empty());
    Ok(())
}

#[test]
fn action_keys_may_execute_external_calls() -> eyre::Result<()> {
    let controller = PrivateKeySigner::random();
    let actor = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::new();

    identity.add_key(
        controller.address(),
        key_id(actor.address()),
        Purpose::Action,
        ECDSA_KEY_TYPE,
    )?;
    identity.take_events();

    let target = Address::random();
    let request = ExecutionRequest::call(
        target,
        identity.address(),
        U256::from(7),
        Bytes::from_static(&[0x01, 0x02]),
        1,
    );
    let signature = sign(&request, &actor);

    identity.execute_signed(&request, &signature, &mut executor)?;

    let events = identity.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IdentityEvent::CallExecuted(_)));
    assert_eq!(executor.calls.len(), 1);
    assert_eq!(executor.calls[0].to, target);
    assert_eq!(executor.calls[0].value, U256::from(7));
    assert_eq!(identity.last_nonce(), 2);
    Ok(())
}

#[test]
fn a_failed_call_still_consumes_the_nonce() {
    let controller = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::failing("target reverted");

    let request = ExecutionRequest::call(
        Address::random(),
        identity.address(),
        U256::ZERO,
        Bytes::new(),
        1,
    );
    let signature = sign(&request, &controller);

    let result = identity.execute_signed(&request, &signature, &mut executor);
    assert!(matches!(result, Err(IdentityError::CallFailed(_))));
    assert_eq!(identity.last_nonce(), 2, "the signed message was spent");
    assert!(identity.events().is_empty());
}

#[test]
fn requests_for_a_foreign_identity_are_rejected() {
    let controller = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::new();

    let request = ExecutionRequest::call(
        Address::random(),
        Address::random(), // not this identity
        U256::ZERO,
        Bytes::new(),
        1,
    );
    let signature = sign(&request, &controller);

    assert_eq!(
        identity.execute_signed(&request, &signature, &mut executor),
        Err(IdentityError::Unauthorized)
    );
}

#[test]
fn nonces_may_skip_forward_but_never_back() -> eyre::Result<()> {
    let controller = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::new();

    let request = ExecutionRequest::call(
        Address::random(),
        identity.address(),
        U256::ZERO,
        Bytes::new(),
        5,
    );
    let signature = sign(&request, &controller);

    identity.execute_signed(&request, &signature, &mut executor)?;
    assert_eq!(identity.last_nonce(), 6);

    let stale = ExecutionRequest::call(
        Address::random(),
        identity.address(),
        U256::ZERO,
        Bytes::new(),
        3,
    );
    let signature = sign(&stale, &controller);
    assert_eq!(
        identity.execute_signed(&stale, &signature, &mut executor),
        Err(IdentityError::StaleNonce {
            supplied: 3,
            current: 6
        })
    );
    Ok(())
}

#[test]
fn create_operations_are_not_executable() {
    let controller = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::new();

    let mut request = ExecutionRequest::call(
        Address::random(),
        identity.address(),
        U256::ZERO,
        Bytes::new(),
        1,
    );
    request.operation = OperationKind::Create;
    let signature = sign(&request, &controller);

    let result = identity.execute_signed(&request, &signature, &mut executor);
    assert!(matches!(result, Err(IdentityError::CallFailed(_))));
    assert!(executor.calls.is_empty());
}

#[test]
fn undecodable_self_call_data_fails_after_admission() {
    let controller = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::new();

    let request = ExecutionRequest::call(
        identity.address(),
        identity.address(),
        U256::ZERO,
        Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]),
        1,
    );
    let signature = sign(&request, &controller);

    let result = identity.execute_signed(&request, &signature, &mut executor);
    assert!(matches!(result, Err(IdentityError::CallFailed(_))));
    assert_eq!(identity.last_nonce(), 2);
    assert!(identity.events().is_empty());
}

#[test]
fn signed_removal_of_the_last_manager_is_still_forbidden() {
    let controller = PrivateKeySigner::random();
    let mut identity = Identity::new(Address::random(), controller.address());
    let mut executor = RecordingExecutor::new();

    let data: Bytes = IIdentity::removeKeyCall {
        key: key_id(controller.address()),
        purpose: U256::from(Purpose::Management.as_u64()),
    }
    .abi_encode()
    .into();
    let request = ExecutionRequest::call(
        identity.address(),
        identity.address(),
        U256::ZERO,
        data,
        1,
    );
    let signature = sign(&request, &controller);

    assert_eq!(
        identity.execute_signed(&request, &signature, &mut executor),
        Err(IdentityError::LastManagerRemoval)
    );
    assert!(identity.key_has_purpose(&key_id(controller.address()), Purpose::Management));
}
