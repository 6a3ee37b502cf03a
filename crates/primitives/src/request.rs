use alloy_primitives::{Address, B256, Bytes, U256, keccak256};
use alloy_rlp::{BufMut, Decodable, Encodable, Header};

/// Kind of action carried by an execution request.
///
/// Only `Call` is executable; `Create` is representable so the tuple can be
/// hashed and signed, but the engine rejects it at execution time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum OperationKind {
    #[default]
    Call = 0,
    Create = 1,
}

impl OperationKind {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Call),
            1 => Some(Self::Create),
            _ => None,
        }
    }
}

impl Encodable for OperationKind {
    fn encode(&self, out: &mut dyn BufMut) {
        self.as_u8().encode(out);
    }

    fn length(&self) -> usize {
        self.as_u8().length()
    }
}

impl Decodable for OperationKind {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let raw = u8::decode(buf)?;
        Self::from_u8(raw).ok_or(alloy_rlp::Error::Custom("unknown operation kind"))
    }
}

/// The exact tuple hashed to produce an authorization challenge.
///
/// `from` is the identity the request is addressed to and doubles as the
/// domain separator: the same action signed for a different identity hashes
/// differently. The nonce is part of the hashed tuple, so a signature is
/// bound to the nonce it was produced for.
///
/// RLP encoding: `[to, from, value, data, nonce, gas_price,
/// gas_price_reserve, gas_token, operation, extra_hash]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ExecutionRequest {
    /// Call target.
    pub to: Address,

    /// The identity expected to authorize and perform the call.
    pub from: Address,

    /// Value forwarded with the call.
    pub value: U256,

    /// Calldata; decoded as a self-call when `to == from`.
    pub data: Bytes,

    /// Replay-protection nonce the signature is bound to.
    pub nonce: u64,

    /// Gas price the relayer is refunded at.
    pub gas_price: U256,

    /// Second gas-price slot of the signed layout. Reserved; always hashed.
    pub gas_price_reserve: U256,

    /// Token the refund is denominated in; zero for the native asset.
    pub gas_token: Address,

    /// What to do with the target.
    pub operation: OperationKind,

    /// Hash of any extra data bound into the authorization.
    pub extra_hash: B256,
}

impl ExecutionRequest {
    /// A plain call request with zeroed gas and extra fields.
    pub fn call(to: Address, from: Address, value: U256, data: Bytes, nonce: u64) -> Self {
        Self {
            to,
            from,
            value,
            data,
            nonce,
            gas_price: U256::ZERO,
            gas_price_reserve: U256::ZERO,
            gas_token: Address::ZERO,
            operation: OperationKind::Call,
            extra_hash: B256::ZERO,
        }
    }

    /// Computes the authorization message hash for this request.
    ///
    /// Pure and deterministic: identical tuples always yield the identical
    /// hash. This is the artifact signed off-band.
    pub fn signature_hash(&self) -> B256 {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        keccak256(&buf)
    }

    fn payload_length(&self) -> usize {
        self.to.length()
            + self.from.length()
            + self.value.length()
            + self.data.length()
            + self.nonce.length()
            + self.gas_price.length()
            + self.gas_price_reserve.length()
            + self.gas_token.length()
            + self.operation.length()
            + self.extra_hash.length()
    }
}

impl Encodable for ExecutionRequest {
    fn encode(&self, out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);

        self.to.encode(out);
        self.from.encode(out);
        self.value.encode(out);
        self.data.encode(out);
        self.nonce.encode(out);
        self.gas_price.encode(out);
        self.gas_price_reserve.encode(out);
        self.gas_token.encode(out);
        self.operation.encode(out);
        self.extra_hash.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        payload_length
            + Header {
                list: true,
                payload_length,
            }
            .length()
    }
}

impl Decodable for ExecutionRequest {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }

        let start_len = buf.len();
        if header.payload_length > start_len {
            return Err(alloy_rlp::Error::InputTooShort);
        }

        let request = Self {
            to: Address::decode(buf)?,
            from: Address::decode(buf)?,
            value: U256::decode(buf)?,
            data: Bytes::decode(buf)?,
            nonce: u64::decode(buf)?,
            gas_price: U256::decode(buf)?,
            gas_price_reserve: U256::decode(buf)?,
            gas_token: Address::decode(buf)?,
            operation: OperationKind::decode(buf)?,
            extra_hash: B256::decode(buf)?,
        };

        if start_len - buf.len() != header.payload_length {
            return Err(alloy_rlp::Error::UnexpectedLength);
        }

        Ok(request)
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for ExecutionRequest {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self {
            to: Address::arbitrary(u)?,
            from: Address::arbitrary(u)?,
            value: U256::arbitrary(u)?,
            data: Bytes::arbitrary(u)?,
            nonce: u64::arbitrary(u)?,
            gas_price: U256::arbitrary(u)?,
            gas_price_reserve: U256::arbitrary(u)?,
            gas_token: Address::arbitrary(u)?,
            operation: OperationKind::arbitrary(u)?,
            extra_hash: B256::arbitrary(u)?,
        })
    }
}

/// Administrative actions with dedicated signed-message digests.
///
/// These are the narrow helpers of the owner/signer identity: each hashes
/// just its own parameters plus the current nonce, under a per-action
/// domain byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminCall {
    AddOwner(Address),
    RemoveOwner(Address),
    SetSignerThreshold(u32),
    ExecuteCall {
        to: Address,
        value: U256,
        data: Bytes,
    },
}

impl AdminCall {
    /// Domain byte keeping the per-action digests disjoint.
    pub const fn tag(&self) -> u8 {
        match self {
            Self::AddOwner(_) => 0x01,
            Self::RemoveOwner(_) => 0x02,
            Self::SetSignerThreshold(_) => 0x03,
            Self::ExecuteCall { .. } => 0x04,
        }
    }
}

/// Digest an owner signs to authorize an administrative action.
///
/// RLP encoding: `[identity, tag, nonce, params...]`. Signatures are
/// produced and recovered over the raw digest; there is no message prefix.
pub fn admin_message_hash(identity: Address, nonce: u64, call: &AdminCall) -> B256 {
    let mut payload = Vec::new();
    identity.encode(&mut payload);
    call.tag().encode(&mut payload);
    nonce.encode(&mut payload);
    match call {
        AdminCall::AddOwner(owner) | AdminCall::RemoveOwner(owner) => {
            owner.encode(&mut payload);
        }
        AdminCall::SetSignerThreshold(threshold) => {
            threshold.encode(&mut payload);
        }
        AdminCall::ExecuteCall { to, value, data } => {
            to.encode(&mut payload);
            value.encode(&mut payload);
            data.encode(&mut payload);
        }
    }

    let mut buf = Vec::with_capacity(payload.len() + 4);
    Header {
        list: true,
        payload_length: payload.len(),
    }
    .encode(&mut buf);
    buf.extend_from_slice(&payload);
    keccak256(&buf)
}
