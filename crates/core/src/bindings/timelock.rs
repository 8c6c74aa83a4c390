use alloy::sol;

sol! {
    #[sol(rpc)]
    contract Timelock {
        function hashOperation(address target, uint256 value, bytes calldata data, bytes32 predecessor, bytes32 salt) external pure returns(bytes32 id);
        function isOperation(bytes32 id) external view returns(bool registered);
        function isOperationReady(bytes32 id) external view returns(bool ready);
        function isOperationDone(bytes32 id) external view returns(bool done);
        function getMinDelay() external view returns(uint256 delay);
        function getProposers() external view returns(address[] memory proposers);
        function getExecutors() external view returns(address[] memory executors);
        function schedule(address target, uint256 value, bytes calldata data, bytes32 predecessor, bytes32 salt, uint256 delay) external;
        function execute(address target, uint256 value, bytes calldata payload, bytes32 predecessor, bytes32 salt) external payable;
    }
}
