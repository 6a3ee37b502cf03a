use std::collections::HashSet;

use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::SolInterface;
use keyport_contracts::{IMultiSigIdentity, MultiSigCall, MultiSigIdentityEvent};
use keyport_primitives::{
    AdminCall, SIGNATURE_CHUNK_LEN, SIGNATURE_LEN, admin_message_hash, recover_all, recover_signer,
};
use tracing::{debug, trace};

use crate::{
    error::{CallError, IdentityError},
    executor::CallExecutor,
    set::OrderedSet,
};

/// The owner/signer flavor of a proxy account.
///
/// Owners carry full administrative control and authorize actions alone,
/// directly or through a signed message over the matching admin digest.
/// Signers carry no administrative power; a concatenation of their
/// signatures authorizes an execution once it reaches the configured
/// threshold. All signed paths hash the current nonce, so consuming it
/// invalidates every other message signed against it.
#[derive(Debug)]
pub struct MultiSigIdentity {
    address: Address,
    owners: OrderedSet<Address>,
    signers: OrderedSet<Address>,
    signer_threshold: u32,
    nonce: u64,
    events: Vec<MultiSigIdentityEvent>,
}

impl MultiSigIdentity {
    /// A fresh identity at `address` with a single owner.
    pub fn new(address: Address, owner: Address) -> Self {
        let mut owners = OrderedSet::new();
        owners.insert(owner);
        Self {
            address,
            owners,
            signers: OrderedSet::new(),
            signer_threshold: 0,
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

    /// Owners in insertion order.
    pub fn owners(&self) -> &[Address] {
        self.owners.as_slice()
    }

    /// Signers in insertion order.
    pub fn signers(&self) -> &[Address] {
        self.signers.as_slice()
    }

    pub fn signer_threshold(&self) -> u32 {
        self.signer_threshold
    }

    // Direct administration. Every mutation requires an owner caller;
    // re-adding a present member succeeds without an event.

    pub fn add_owner(&mut self, caller: Address, owner: Address) -> Result<(), IdentityError> {
        self.require_owner(caller)?;
        self.insert_owner(owner);
        Ok(())
    }

    /// Remove an owner. An owner may remove itself as long as another owner
    /// remains; removing the last owner is forbidden.
    pub fn remove_owner(&mut self, caller: Address, owner: Address) -> Result<(), IdentityError> {
        self.require_owner(caller)?;
        self.delete_owner(owner)
    }

    pub fn add_signer(&mut self, caller: Address, signer: Address) -> Result<(), IdentityError> {
        self.require_owner(caller)?;
        self.insert_signer(signer);
        Ok(())
    }

    /// Remove a signer. The signer set may become empty; signers are not
    /// required for the identity to function.
    pub fn remove_signer(&mut self, caller: Address, signer: Address) -> Result<(), IdentityError> {
        self.require_owner(caller)?;
        self.delete_signer(signer);
        Ok(())
    }

    pub fn set_signer_threshold(
        &mut self,
        caller: Address,
        threshold: u32,
    ) -> Result<(), IdentityError> {
        self.require_owner(caller)?;
        self.update_threshold(threshold);
        Ok(())
    }

    // Signed-message digests, hashed over the current nonce. These are what
    // an owner signs off-band to authorize the matching action.

    pub fn add_owner_signed_message(&self, owner: Address) -> B256 {
        admin_message_hash(self.address, self.nonce, &AdminCall::AddOwner(owner))
    }

    pub fn remove_owner_signed_message(&self, owner: Address) -> B256 {
        admin_message_hash(self.address, self.nonce, &AdminCall::RemoveOwner(owner))
    }

    pub fn set_signer_threshold_signed_message(&self, threshold: u32) -> B256 {
        admin_message_hash(
            self.address,
            self.nonce,
            &AdminCall::SetSignerThreshold(threshold),
        )
    }

    pub fn execute_call_signed_message(&self, to: Address, value: U256, data: &Bytes) -> B256 {
        admin_message_hash(
            self.address,
            self.nonce,
            &AdminCall::ExecuteCall {
                to,
                value,
                data: data.clone(),
            },
        )
    }

    // Signed administration. The signature must recover to a current owner
    // over the digest of the action and the current nonce; admission
    // consumes the nonce. Replaying a consumed message fails because the
    // advanced nonce changes the digest and recovery no longer yields an
    // owner.

    pub fn add_owner_signed(
        &mut self,
        owner: Address,
        signature: &[u8],
    ) -> Result<(), IdentityError> {
        let digest = self.add_owner_signed_message(owner);
        self.admit_owner_signature(&digest, signature)?;
        self.nonce += 1;
        self.insert_owner(owner);
        Ok(())
    }

    pub fn remove_owner_signed(
        &mut self,
        owner: Address,
        signature: &[u8],
    ) -> Result<(), IdentityError> {
        let digest = self.remove_owner_signed_message(owner);
        self.admit_owner_signature(&digest, signature)?;
        self.nonce += 1;
        self.delete_owner(owner)
    }

    pub fn set_signer_threshold_signed(
        &mut self,
        threshold: u32,
        signature: &[u8],
    ) -> Result<(), IdentityError> {
        let digest = self.set_signer_threshold_signed_message(threshold);
        self.admit_owner_signature(&digest, signature)?;
        self.nonce += 1;
        self.update_threshold(threshold);
        Ok(())
    }

    /// Execute a call directly as an owner.
    pub fn execute_call(
        &mut self,
        caller: Address,
        to: Address,
        value: U256,
        data: Bytes,
        executor: &mut dyn CallExecutor,
    ) -> Result<Bytes, IdentityError> {
        self.require_owner(caller)?;
        self.perform(to, value, data, executor)
    }

    /// Execute a call authorized by a signature blob: a single owner
    /// signature, or a concatenation of padded signer chunks meeting the
    /// threshold (in any chunk order). Admission consumes the nonce.
    pub fn execute_call_signed(
        &mut self,
        to: Address,
        value: U256,
        data: Bytes,
        blob: &[u8],
        executor: &mut dyn CallExecutor,
    ) -> Result<Bytes, IdentityError> {
        let digest = self.execute_call_signed_message(to, value, &data);
        self.admit_blob(&digest, blob)?;
        self.nonce += 1;
        self.perform(to, value, data, executor)
    }

    fn require_owner(&self, caller: Address) -> Result<(), IdentityError> {
        if self.owners.contains(&caller) {
            Ok(())
        } else {
            Err(IdentityError::Unauthorized)
        }
    }

    fn admit_owner_signature(
        &self,
        digest: &B256,
        signature: &[u8],
    ) -> Result<Address, IdentityError> {
        let signer = recover_signer(digest, signature)?;
        if !self.owners.contains(&signer) {
            return Err(IdentityError::Unauthorized);
        }
        debug!(target: "keyport::multisig", %signer, nonce = self.nonce, "owner signature admitted");
        Ok(signer)
    }

    /// Admit a single owner signature or a threshold of signer chunks.
    fn admit_blob(&self, digest: &B256, blob: &[u8]) -> Result<(), IdentityError> {
        if blob.len() == SIGNATURE_LEN || blob.len() == SIGNATURE_CHUNK_LEN {
            if let Ok(signer) = recover_signer(digest, blob) {
                if self.owners.contains(&signer) {
                    debug!(
                        target: "keyport::multisig",
                        %signer,
                        nonce = self.nonce,
                        "owner signature admitted"
                    );
                    return Ok(());
                }
            }
        }
        self.verify_threshold(digest, blob)
    }

    /// The pure threshold check: recover every chunk, require each recovery
    /// to be a distinct registered signer, and compare the count against
    /// the threshold. Chunk order never matters.
    fn verify_threshold(&self, digest: &B256, blob: &[u8]) -> Result<(), IdentityError> {
        if self.signer_threshold == 0 {
            // The signer path stays disabled until a threshold is set.
            return Err(IdentityError::ThresholdNotMet { have: 0, need: 0 });
        }

        let recovered = recover_all(digest, blob)?;
        let mut counted = HashSet::with_capacity(recovered.len());
        for signer in recovered {
            trace!(target: "keyport::multisig", %signer, "recovered signer chunk");
            if !self.signers.contains(&signer) {
                return Err(IdentityError::Unauthorized);
            }
            if !counted.insert(signer) {
                return Err(IdentityError::DuplicateSigner(signer));
            }
        }

        let have = counted.len() as u32;
        if have < self.signer_threshold {
            return Err(IdentityError::ThresholdNotMet {
                have,
                need: self.signer_threshold,
            });
        }
        debug!(
            target: "keyport::multisig",
            have,
            need = self.signer_threshold,
            nonce = self.nonce,
            "signer threshold met"
        );
        Ok(())
    }

    fn insert_owner(&mut self, owner: Address) {
        if self.owners.insert(owner) {
            self.events.push(MultiSigIdentityEvent::OwnerAdded(
                IMultiSigIdentity::OwnerAdded { owner },
            ));
        }
    }

    fn delete_owner(&mut self, owner: Address) -> Result<(), IdentityError> {
        if self.owners.contains(&owner) && self.owners.len() == 1 {
            return Err(IdentityError::LastOwnerRemoval);
        }
        if self.owners.remove(&owner) {
            self.events.push(MultiSigIdentityEvent::OwnerRemoved(
                IMultiSigIdentity::OwnerRemoved { owner },
            ));
        }
        Ok(())
    }

    fn insert_signer(&mut self, signer: Address) {
        if self.signers.insert(signer) {
            self.events.push(MultiSigIdentityEvent::SignerAdded(
                IMultiSigIdentity::SignerAdded { signer },
            ));
        }
    }

    fn delete_signer(&mut self, signer: Address) {
        if self.signers.remove(&signer) {
            self.events.push(MultiSigIdentityEvent::SignerRemoved(
                IMultiSigIdentity::SignerRemoved { signer },
            ));
        }
    }

    fn update_threshold(&mut self, threshold: u32) {
        self.signer_threshold = threshold;
        self.events.push(MultiSigIdentityEvent::SignerThresholdChanged(
            IMultiSigIdentity::SignerThresholdChanged {
                threshold: U256::from(threshold),
            },
        ));
    }

    fn perform(
        &mut self,
        to: Address,
        value: U256,
        data: Bytes,
        executor: &mut dyn CallExecutor,
    ) -> Result<Bytes, IdentityError> {
        if to == self.address {
            return self.dispatch(&data);
        }

        let returned = executor.execute(to, value, &data)?;
        self.events.push(MultiSigIdentityEvent::CallExecuted(
            IMultiSigIdentity::CallExecuted { to, value, data },
        ));
        Ok(returned)
    }

    /// Route an authorized self-call to the identity's own operations.
    fn dispatch(&mut self, data: &Bytes) -> Result<Bytes, IdentityError> {
        let call = MultiSigCall::abi_decode(data)
            .map_err(|err| CallError(format!("self-call data does not decode: {err}")))?;
        match call {
            MultiSigCall::addOwner(call) => {
                self.insert_owner(call.owner);
                Ok(Bytes::new())
            }
            MultiSigCall::removeOwner(call) => {
                self.delete_owner(call.owner)?;
                Ok(Bytes::new())
            }
            MultiSigCall::addSigner(call) => {
                self.insert_signer(call.signer);
                Ok(Bytes::new())
            }
            MultiSigCall::removeSigner(call) => {
                self.delete_signer(call.signer);
                Ok(Bytes::new())
            }
            MultiSigCall::setSignerThreshold(call) => {
                let threshold = u32::try_from(call.threshold)
                    .map_err(|_| CallError("threshold out of range".into()))?;
                self.update_threshold(threshold);
                Ok(Bytes::new())
            }
            _ => Err(CallError("selector is not self-dispatchable".into()).into()),
        }
    }

    /// Drain the event journal.
    pub fn take_events(&mut self) -> Vec<MultiSigIdentityEvent> {
        std::mem::take(&mut self.events)
    }

    /// The event journal since the last drain.
    pub fn events(&self) -> &[MultiSigIdentityEvent] {
        &self.events
    }
}
