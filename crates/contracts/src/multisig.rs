pub use IMultiSigIdentity::{
    IMultiSigIdentityCalls as MultiSigCall, IMultiSigIdentityErrors as MultiSigAbiError,
    IMultiSigIdentityEvents as MultiSigIdentityEvent,
};

crate::sol! {
    /// IMultiSigIdentity interface for owner/signer threshold accounts
    ///
    /// Owners carry full administrative control and can authorize actions
    /// alone, directly or via a single signed message. Signers carry no
    /// administrative power; a concatenation of their signatures authorizes
    /// an execution once it reaches the configured threshold.
    #[derive(Debug, PartialEq, Eq)]
    #[sol(extra_methods)]
    interface IMultiSigIdentity {
        /// Add an owner. Adding a present owner is a no-op.
        function addOwner(address owner) external;

        /// Remove an owner. Removing the last remaining owner is forbidden.
        function removeOwner(address owner) external;

        /// Owners in insertion order
        function getOwners() external view returns (address[] memory owners);

        /// Add a signer. Adding a present signer is a no-op.
        function addSigner(address signer) external;

        /// Remove a signer. The signer set may become empty.
        function removeSigner(address signer) external;

        /// Signers in insertion order
        function getSigners() external view returns (address[] memory signers);

        /// Set the number of distinct signer signatures required for
        /// threshold execution. Zero disables the signer path.
        function setSignerThreshold(uint256 threshold) external;

        /// The configured signer threshold
        function getSignerThreshold() external view returns (uint256 threshold);

        /// The current replay-protection nonce
        function lastNonce() external view returns (uint256 nonce);

        // Signed-message digests for the administrative actions, hashed over
        // the current nonce.
        function getAddOwnerSignedMessage(address owner) external view returns (bytes32 digest);
        function getRemoveOwnerSignedMessage(address owner) external view returns (bytes32 digest);
        function getSetSignerThresholdSignedMessage(uint256 threshold)
            external
            view
            returns (bytes32 digest);
        function getExecuteCallSignedMessage(address to, uint256 value, bytes calldata data)
            external
            view
            returns (bytes32 digest);

        // Signed variants of the administrative actions; the signature must
        // recover to a current owner over the matching digest.
        function addOwnerSigned(address owner, bytes calldata signature) external;
        function removeOwnerSigned(address owner, bytes calldata signature) external;
        function setSignerThresholdSigned(uint256 threshold, bytes calldata signature) external;

        /// Execute a call directly as an owner
        function executeCall(address to, uint256 value, bytes calldata data) external;

        /// Execute a call authorized by a single owner signature or by a
        /// concatenation of signer signatures meeting the threshold
        function executeCallSigned(
            address to,
            uint256 value,
            bytes calldata data,
            bytes calldata signature
        ) external;

        // Events
        event OwnerAdded(address indexed owner);
        event OwnerRemoved(address indexed owner);
        event SignerAdded(address indexed signer);
        event SignerRemoved(address indexed signer);
        event SignerThresholdChanged(uint256 threshold);
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
