pub use IIdentity::{
    IIdentityCalls as IdentityCall, IIdentityErrors as IdentityAbiError,
    IIdentityEvents as IdentityEvent,
};

crate::sol! {
    /// IIdentity interface for purpose-tagged key accounts
    ///
    /// An identity holds keys identified by a 32-byte value (an address
    /// left-padded to 32 bytes) and tagged with one or more purposes.
    /// Management keys administer the key set and may execute anything;
    /// action keys may execute calls but never against the identity's own
    /// address.
    #[derive(Debug, PartialEq, Eq)]
    #[sol(extra_methods)]
    interface IIdentity {
        /// Add `purpose` to the key identified by `key`, inserting the key
        /// if it is not yet registered. Re-adding a held purpose is a no-op.
        ///
        /// @param key The 32-byte key identifier
        /// @param purpose The purpose tag (1 = management, 2 = action)
        /// @param keyType The key type tag (1 = ECDSA)
        function addKey(bytes32 key, uint256 purpose, uint256 keyType) external;

        /// Remove `purpose` from the key identified by `key`. The key is
        /// dropped entirely once its last purpose is removed. Removing the
        /// last management purpose in the registry is forbidden.
        function removeKey(bytes32 key, uint256 purpose) external;

        /// Get the full record of a key, or zero values if absent
        function getKey(bytes32 key)
            external
            view
            returns (uint256[] memory purposes, uint256 keyType, bytes32 keyId);

        /// All key identifiers holding `purpose`, in insertion order
        function getKeysByPurpose(uint256 purpose) external view returns (bytes32[] memory keys);

        /// Whether the key identified by `key` holds `purpose`
        function keyHasPurpose(bytes32 key, uint256 purpose) external view returns (bool held);

        /// The current replay-protection nonce
        function lastNonce() external view returns (uint256 nonce);

        /// Canonical hash of an execution tuple; the artifact signed off-band.
        /// The second gas-price slot is reserved and always hashed.
        function getMessageHash(
            address to,
            address from,
            uint256 value,
            bytes calldata data,
            uint256 nonce,
            uint256 gasPrice,
            uint256 gasPriceReserve,
            address gasToken,
            uint8 operationType,
            bytes32 extraHash
        ) external view returns (bytes32 messageHash);

        /// Execute an action authorized by a single off-band signature over
        /// the message hash of the supplied tuple
        function executeSigned(
            address to,
            address from,
            uint256 value,
            bytes calldata data,
            uint256 nonce,
            uint256 gasPrice,
            uint256 gasPriceReserve,
            address gasToken,
            uint8 operationType,
            bytes32 extraHash,
            bytes calldata signature
        ) external;

        // Events
        event KeyAdded(bytes32 indexed key, uint256 indexed purpose, uint256 indexed keyType);
        event KeyRemoved(bytes32 indexed key, uint256 indexed purpose);
        event CallExecuted(address indexed to, uint256 value, bytes data);

        // Errors
        error Unauthorized();
        error InvalidSignature();
        error DuplicateSigner(address signer);
        error ThresholdNotMet(uint256 have, uint256 need);
        error SelfTargetingForbidden();
        error LastManagerRemoval();
        error LastOwnerRemoval();
        error StaleNonce(uint256 supplied, uint256 current);
        error CallFailed();
    }
}
