use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolInterface;
use keyport_contracts::{IIdentity, IdentityCall, IdentityEvent};
use keyport_primitives::{
    ExecutionRequest, Key, KeyId, OperationKind, Purpose, key_id, recover_signer,
};
use tracing::debug;

use crate::{
    error::{CallError, IdentityError},
    executor::CallExecutor,
    keystore::KeyStore,
};

/// A proxy-style account holding purpose-tagged keys.
///
/// Management keys administer the key set and may execute anything, either
/// by calling directly or through a signed message. Action keys may execute
/// calls but never against the identity's own address. Every signed
/// execution consumes a nonce; a consumed nonce permanently invalidates
/// every other message signed against it.
#[derive(Debug)]
pub struct Identity {
    address: Address,
    keys: KeyStore,
    nonce: u64,
    events: Vec<IdentityEvent>,
}

impl Identity {
    /// A fresh identity at `address`, controlled by a single management key
    /// for `controller`.
    pub fn new(address: Address, controller: Address) -> Self {
        let mut keys = KeyStore::default();
        keys.add(
            key_id(controller),
            Purpose::Management,
            keyport_primitives::ECDSA_KEY_TYPE,
        );
        Self {
            address,
            keys,
            nonce: 0,
            events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The current replay-protection nonce.
    pub fn last_nonce(&self) -> u64 {
        self.nonce
    }

    /// Add `purpose` to a key. The caller must hold a management key.
    /// Re-adding a held purpose succeeds without an event.
    pub fn add_key(
        &mut self,
        caller: Address,
        key: KeyId,
        purpose: Purpose,
        key_type: u64,
    ) -> Result<(), IdentityError> {
        self.require_manager(caller)?;
        self.insert_key(key, purpose, key_type);
        Ok(())
    }

    /// Remove `purpose` from a key. The caller must hold a management key;
    /// the last management key cannot be removed.
    pub fn remove_key(
        &mut self,
        caller: Address,
        key: KeyId,
        purpose: Purpose,
    ) -> Result<(), IdentityError> {
        self.require_manager(caller)?;
        self.delete_key(key, purpose)
    }

    /// The key record under `key`, or the zero sentinel.
    pub fn get_key(&self, key: &KeyId) -> Key {
        self.keys.get(key)
    }

    pub fn key_has_purpose(&self, key: &KeyId, purpose: Purpose) -> bool {
        self.keys.has_purpose(key, purpose)
    }

    /// Key identifiers holding `purpose`, in insertion order.
    pub fn get_keys_by_purpose(&self, purpose: Purpose) -> &[KeyId] {
        self.keys.by_purpose(purpose)
    }

    /// Execute an action authorized by a single off-band signature over the
    /// request's message hash.
    ///
    /// The request must be addressed to this identity and carry a nonce not
    /// behind the current one. The recovered signer must hold a management
    /// key, or an action key with a target other than the identity itself.
    /// Admission consumes the nonce; the action is then performed exactly
    /// once. Self-calls dispatch to the identity's own operations, anything
    /// else goes through `executor`.
    pub fn execute_signed(
        &mut self,
        request: &ExecutionRequest,
        signature: &[u8],
        executor: &mut dyn CallExecutor,
    ) -> Result<Bytes, IdentityError> {
        if request.from != self.address {
            return Err(IdentityError::Unauthorized);
        }
        if request.nonce < self.nonce {
            return Err(IdentityError::StaleNonce {
                supplied: request.nonce,
                current: self.nonce,
            });
        }

        let hash = request.signature_hash();
        let signer = recover_signer(&hash, signature)?;
        let signer_key = key_id(signer);
        if !self.keys.has_purpose(&signer_key, Purpose::Management) {
            if !self.keys.has_purpose(&signer_key, Purpose::Action) {
                return Err(IdentityError::Unauthorized);
            }
            if request.to == self.address {
                return Err(IdentityError::SelfTargetingForbidden);
            }
        }

        debug!(
            target: "keyport::identity",
            %signer,
            nonce = request.nonce,
            to = %request.to,
            "admitting signed execution"
        );

        // The signed message is consumed from here on, even if the action
        // itself fails.
        self.nonce = request.nonce + 1;
        self.perform(request.to, request.value, &request.data, request.operation, executor)
    }

    fn require_manager(&self, caller: Address) -> Result<(), IdentityError> {
        if self.keys.has_purpose(&key_id(caller), Purpose::Management) {
            Ok(())
        } else {
            Err(IdentityError::Unauthorized)
        }
    }

    fn insert_key(&mut self, key: KeyId, purpose: Purpose, key_type: u64) {
        if self.keys.add(key, purpose, key_type) {
            self.events.push(IdentityEvent::KeyAdded(IIdentity::KeyAdded {
                key,
                purpose: U256::from(purpose.as_u64()),
                keyType: U256::from(key_type),
            }));
        }
    }

    fn delete_key(&mut self, key: KeyId, purpose: Purpose) -> Result<(), IdentityError> {
        if self.keys.remove(key, purpose)? {
            self.events
                .push(IdentityEvent::KeyRemoved(IIdentity::KeyRemoved {
                    key,
                    purpose: U256::from(purpose.as_u64()),
                }));
        }
        Ok(())
    }

    fn perform(
        &mut self,
        to: Address,
        value: U256,
        data: &Bytes,
        operation: OperationKind,
        executor: &mut dyn CallExecutor,
    ) -> Result<Bytes, IdentityError> {
        if operation != OperationKind::Call {
            return Err(CallError("only call operations are executable".into()).into());
        }
        if to == self.address {
            return self.dispatch(data);
        }

        let returned = executor.execute(to, value, data)?;
        self.events
            .push(IdentityEvent::CallExecuted(IIdentity::CallExecuted {
                to,
                value,
                data: data.clone(),
            }));
        Ok(returned)
    }

    /// Route an authorized self-call to the identity's own operations.
    fn dispatch(&mut self, data: &Bytes) -> Result<Bytes, IdentityError> {
        let call = IdentityCall::abi_decode(data)
            .map_err(|err| CallError(format!("self-call data does not decode: {err}")))?;
        match call {
            IdentityCall::addKey(call) => {
                let purpose =
                    Purpose::try_from(call.purpose).map_err(|err| CallError(err.to_string()))?;
                let key_type = u64::try_from(call.keyType)
                    .map_err(|_| CallError("key type out of range".into()))?;
                self.insert_key(call.key, purpose, key_type);
                Ok(Bytes::new())
            }
            IdentityCall::removeKey(call) => {
                let purpose =
                    Purpose::try_from(call.purpose).map_err(|err| CallError(err.to_string()))?;
                self.delete_key(call.key, purpose)?;
                Ok(Bytes::new())
            }
            _ => Err(CallError("selector is not self-dispatchable".into()).into()),
        }
    }

    /// Drain the event journal.
    pub fn take_events(&mut self) -> Vec<IdentityEvent> {
        std::mem::take(&mut self.events)
    }

    /// The event journal since the last drain.
    pub fn events(&self) -> &[IdentityEvent] {
        &self.events
    }
}
