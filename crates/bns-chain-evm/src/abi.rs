use alloy_sol_types::sol;

sol! {
    /// Bunny Name Service registry.
    contract BunnyRegistry {
        function getAllNames() external view returns (string[] memory);
        function records(string calldata name) external view returns (string memory);
        function domains(string calldata name) external view returns (address);
        function register(string calldata name) external payable;
        function setRecord(string calldata name, string calldata record) external;
    }
}
