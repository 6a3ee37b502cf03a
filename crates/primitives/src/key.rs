use alloy_primitives::{Address, B256, U256};

/// Key type tag for secp256k1 ECDSA keys, the only type this library can
/// recover signatures for. Other tags are stored opaquely.
pub const ECDSA_KEY_TYPE: u64 = 1;

/// A key identifier: an address left-padded into 32 bytes.
pub type KeyId = B256;

/// Lift an address into its key identifier.
pub fn key_id(address: Address) -> KeyId {
    B256::left_padding_from(address.as_slice())
}

/// The address embedded in a key identifier (the low 20 bytes).
pub fn key_address(id: &KeyId) -> Address {
    Address::from_slice(&id[12..])
}

/// What a key is allowed to do.
///
/// Authorization checks pattern-match on this tag; there is no open-ended
/// purpose space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
#[repr(u64)]
pub enum Purpose {
    /// Full administrative rights: manage keys and execute anything.
    Management = 1,
    /// Execution rights only; forbidden from targeting the identity itself.
    Action = 2,
}

impl Purpose {
    pub const fn as_u64(self) -> u64 {
        self as u64
    }

    pub const fn from_u64(raw: u64) -> Option<Self> {
        match raw {
            1 => Some(Self::Management),
            2 => Some(Self::Action),
            _ => None,
        }
    }
}

impl TryFrom<u64> for Purpose {
    type Error = UnknownPurpose;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::from_u64(raw).ok_or(UnknownPurpose(U256::from(raw)))
    }
}

impl TryFrom<U256> for Purpose {
    type Error = UnknownPurpose;

    fn try_from(raw: U256) -> Result<Self, Self::Error> {
        u64::try_from(raw)
            .ok()
            .and_then(Self::from_u64)
            .ok_or(UnknownPurpose(raw))
    }
}

impl std::fmt::Display for Purpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Management => f.write_str("management"),
            Self::Action => f.write_str("action"),
        }
    }
}

/// Raw purpose value outside the closed tag space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown key purpose {0}")]
pub struct UnknownPurpose(pub U256);

/// A registered key: its purposes in insertion order, a key type tag, and
/// the identifier it is stored under.
///
/// The `Default` value is the zero sentinel returned for absent lookups:
/// no purposes, key type 0, zero identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Key {
    pub purposes: Vec<Purpose>,
    pub key_type: u64,
    pub id: KeyId,
}

impl Key {
    pub fn new(id: KeyId, purpose: Purpose, key_type: u64) -> Self {
        Self {
            purposes: vec![purpose],
            key_type,
            id,
        }
    }

    pub fn has_purpose(&self, purpose: Purpose) -> bool {
        self.purposes.contains(&purpose)
    }

    /// Whether this is the zero sentinel for an absent key.
    pub fn is_sentinel(&self) -> bool {
        self.purposes.is_empty()
    }
}
