//! EVM plumbing: contract ABIs, batched reads and transaction calldata.

pub mod abi;
pub mod calls;
pub mod reader;

pub use calls::{
    biguint_to_u256, encode_claim, encode_claim_many, encode_delegate, encode_swap_all,
    MetaTransaction, SignRequest,
};
pub use reader::{ChainReader, DelegationState, EvmReader, TokenBalances};
