use ethers::abi::parse_abi;
use ethers::contract::BaseContract;
use once_cell::sync::Lazy;

/// Virtual token: merkle claims, vested balances, swaps and delegation.
/// `balanceOf` is shared with the base token.
pub static CLAIM_TOKEN: Lazy<BaseContract> = Lazy::new(|| {
    BaseContract::from(
        parse_abi(&[
            "function isClaimed(string trancheId, uint256 index) external view returns (bool)",
            "function balanceOf(address account) external view returns (uint256)",
            "function swappableBalanceOf(address account) external view returns (uint256)",
            "function claim(uint256 trancheId, uint256 index, uint8 claimType, address claimant, uint256 claimableAmount, uint256 amount, bytes32[] proof) external",
            "function claimMany(uint256[] trancheIds, uint256[] indices, uint8[] claimTypes, address[] claimants, uint256[] claimableAmounts, uint256[] amounts, bytes32[][] proofs, uint256[] reserved) external",
            "function swapAll() external",
            "function delegate(address agent, uint256 amount) external",
        ])
        .expect("claim token ABI is valid"),
    )
});

pub static AGENT_STAKING: Lazy<BaseContract> = Lazy::new(|| {
    BaseContract::from(
        parse_abi(&["function agents(address agent) external view returns (bool)"])
            .expect("agent staking ABI is valid"),
    )
});

/// Multicall3 batch entry point; results are decoded per call by the reader.
pub static MULTICALL3: Lazy<BaseContract> = Lazy::new(|| {
    BaseContract::from(
        parse_abi(&[
            "struct Call3 { address target; bool allowFailure; bytes callData; }",
            "struct Result { bool success; bytes returnData; }",
            "function aggregate3(Call3[] calls) external payable returns (Result[] returnData)",
        ])
        .expect("multicall ABI is valid"),
    )
});
