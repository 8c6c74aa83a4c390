use alloy::sol;

sol! {
    #[sol(rpc)]
    contract ProxyAdmin {
        function getProxyImplementation(address proxy) external view returns(address implementation);
        function owner() external view returns(address owner);
        function upgrade(address proxy, address implementation) external;
        function upgradeAndCall(address proxy, address implementation, bytes memory data) external payable;
        function transferOwnership(address newOwner) external;
    }
}
