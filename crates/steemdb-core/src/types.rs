use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Fields a record carries beyond the ones this crate names, kept verbatim.
pub type Extra = Map<String, Value>;

// ── Chain state ──────────────────────────────────────────────────────────────

/// Head-of-chain state returned by `get_dynamic_global_properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    pub head_block_number: u32,
    pub head_block_id: String,
    /// Head block time (UTC, no offset on the wire).
    pub time: NaiveDateTime,
    pub last_irreversible_block_num: u32,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Median of the witness-voted chain parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainProperties {
    pub account_creation_fee: String,
    pub maximum_block_size: u32,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An exchange rate as two asset quantities, e.g. `1.000 SBD` per `3.000 STEEM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub base: String,
    pub quote: String,
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.base, self.quote)
    }
}

/// A compile-time constant of the node. Value kinds are preserved as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

/// Node build information returned by `get_version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub blockchain_version: String,
    #[serde(default)]
    pub chain_id: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Delegations ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VestingDelegation {
    pub delegator: String,
    pub delegatee: String,
    pub vesting_shares: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ── Blocks and operations ────────────────────────────────────────────────────

/// An operation as the node encodes it: a `[name, payload]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation(pub String, pub Value);

impl Operation {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn payload(&self) -> &Value {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub previous: String,
    pub timestamp: NaiveDateTime,
    pub witness: String,
    pub transaction_merkle_root: String,
    #[serde(default)]
    pub extensions: Vec<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedBlock {
    pub previous: String,
    pub timestamp: NaiveDateTime,
    pub witness: String,
    pub transaction_merkle_root: String,
    #[serde(default)]
    pub extensions: Vec<Value>,
    pub witness_signature: String,
    pub transactions: Vec<SignedTransaction>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A transaction with signatures. Lookup results also carry block position
/// fields (`block_num`, `transaction_num`), kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub ref_block_num: u16,
    pub ref_block_prefix: u32,
    pub expiration: NaiveDateTime,
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub extensions: Vec<Value>,
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// An operation together with where it was applied on chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedOperation {
    pub trx_id: String,
    pub block: u32,
    pub trx_in_block: u32,
    pub op_in_block: u32,
    pub virtual_op: u32,
    pub timestamp: NaiveDateTime,
    pub op: Operation,
}

impl AppliedOperation {
    pub fn is_virtual(&self) -> bool {
        self.virtual_op > 0
    }
}

/// One account history entry: `(sequence number, operation)`.
pub type HistoryEntry = (u64, AppliedOperation);

// ── Social ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discussion {
    pub author: String,
    pub permlink: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedAccount {
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}
