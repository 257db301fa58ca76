//! Typed database API calls and their positional parameter encoding.
//!
//! Each [`DatabaseCall`] knows its remote method name and how to turn its
//! fields into the params array the node expects. Validation happens here,
//! before anything is handed to a transport.

use serde::Serialize;
use serde_json::Value;

use steemdb_core::constants::{
    ACCOUNT_HISTORY_MAX_LIMIT, TRANSACTION_ID_BYTES, VESTING_DELEGATIONS_DEFAULT_FROM,
    VESTING_DELEGATIONS_MAX_LIMIT,
};
use steemdb_core::error::ValidationError;
use steemdb_core::{
    DiscussionQuery, DiscussionSortKey, HistoryStart, OperationBitmaskFilter, SignedTransaction,
};

#[derive(Debug, Clone)]
pub enum DatabaseCall<'a> {
    GetDynamicGlobalProperties,
    GetChainProperties,
    GetState {
        path: &'a str,
    },
    GetCurrentMedianHistoryPrice,
    GetVestingDelegations {
        account: &'a str,
        from: Option<&'a str>,
        limit: Option<u32>,
    },
    GetConfig,
    GetBlockHeader {
        block_num: u32,
    },
    GetBlock {
        block_num: u32,
    },
    GetOperations {
        block_num: u32,
        only_virtual: Option<bool>,
    },
    GetDiscussions {
        sort: DiscussionSortKey,
        query: &'a DiscussionQuery,
    },
    GetAccounts {
        usernames: &'a [String],
    },
    GetTransaction {
        tx_id: &'a str,
    },
    GetAccountHistory {
        account: &'a str,
        from: HistoryStart,
        limit: u32,
        filter: Option<OperationBitmaskFilter>,
    },
    VerifyAuthority {
        transaction: &'a SignedTransaction,
    },
    GetVersion,
}

impl DatabaseCall<'_> {
    /// Remote method name within the `database_api` namespace.
    pub fn method(&self) -> String {
        let name = match self {
            Self::GetDynamicGlobalProperties => "get_dynamic_global_properties",
            Self::GetChainProperties => "get_chain_properties",
            Self::GetState { .. } => "get_state",
            Self::GetCurrentMedianHistoryPrice => "get_current_median_history_price",
            Self::GetVestingDelegations { .. } => "get_vesting_delegations",
            Self::GetConfig => "get_config",
            Self::GetBlockHeader { .. } => "get_block_header",
            Self::GetBlock { .. } => "get_block",
            Self::GetOperations { .. } => "get_ops_in_block",
            Self::GetDiscussions { sort, .. } => return sort.method_name(),
            Self::GetAccounts { .. } => "get_accounts",
            Self::GetTransaction { .. } => "get_transaction",
            Self::GetAccountHistory { .. } => "get_account_history",
            Self::VerifyAuthority { .. } => "verify_authority",
            Self::GetVersion => "get_version",
        };
        name.to_string()
    }

    /// Validate the call's fields and encode them as positional params.
    pub fn params(&self) -> Result<Vec<Value>, ValidationError> {
        let mut p = ParamList::default();
        match self {
            Self::GetDynamicGlobalProperties
            | Self::GetChainProperties
            | Self::GetCurrentMedianHistoryPrice
            | Self::GetConfig
            | Self::GetVersion => {}

            Self::GetState { path } => {
                p.required(non_empty("path", path)?);
            }

            Self::GetVestingDelegations {
                account,
                from,
                limit,
            } => {
                let limit = limit.unwrap_or(VESTING_DELEGATIONS_MAX_LIMIT);
                in_range("limit", limit as u64, 1, VESTING_DELEGATIONS_MAX_LIMIT as u64)?;
                p.required(non_empty("account", account)?);
                p.required(from.unwrap_or(VESTING_DELEGATIONS_DEFAULT_FROM));
                p.required(limit);
            }

            Self::GetBlockHeader { block_num } | Self::GetBlock { block_num } => {
                p.required(block_number(*block_num)?);
            }

            Self::GetOperations {
                block_num,
                only_virtual,
            } => {
                p.required(block_number(*block_num)?);
                p.optional(*only_virtual, false);
            }

            Self::GetDiscussions { query, .. } => {
                query.validate()?;
                p.required(encode("query", query)?);
            }

            Self::GetAccounts { usernames } => {
                for name in usernames.iter() {
                    non_empty("usernames", name)?;
                }
                p.required(encode("usernames", usernames)?);
            }

            Self::GetTransaction { tx_id } => {
                p.required(transaction_id(tx_id)?);
            }

            Self::GetAccountHistory {
                account,
                from,
                limit,
                filter,
            } => {
                let mut max = ACCOUNT_HISTORY_MAX_LIMIT as u64;
                if let HistoryStart::Sequence(seq) = from {
                    max = max.min(seq.saturating_add(1));
                }
                in_range("limit", *limit as u64, 1, max)?;
                p.required(non_empty("account", account)?);
                p.required(from.to_param());
                p.required(*limit);
                let [low, high] = match filter {
                    Some(f) if f.is_empty() => {
                        return Err(ValidationError::Empty {
                            field: "operation_filter",
                        })
                    }
                    Some(f) => f.to_params().map(Some),
                    None => [None, None],
                };
                p.optional(low, 0);
                p.optional(high, 0);
            }

            Self::VerifyAuthority { transaction } => {
                p.required(encode("transaction", transaction)?);
            }
        }
        Ok(p.finish())
    }
}

// ── ParamList ────────────────────────────────────────────────────────────────

/// Positional params with optional trailing slots.
///
/// Unset optional slots at the tail are dropped. An unset slot followed by a
/// set one is filled with its default, so the array never has gaps.
#[derive(Default)]
struct ParamList {
    slots: Vec<(Option<Value>, Value)>,
}

impl ParamList {
    fn required(&mut self, value: impl Into<Value>) {
        let v = value.into();
        self.slots.push((Some(v), Value::Null));
    }

    fn optional<V: Into<Value>>(&mut self, value: Option<V>, default: impl Into<Value>) {
        self.slots.push((value.map(Into::into), default.into()));
    }

    fn finish(self) -> Vec<Value> {
        let len = self
            .slots
            .iter()
            .rposition(|(v, _)| v.is_some())
            .map_or(0, |i| i + 1);
        self.slots
            .into_iter()
            .take(len)
            .map(|(v, default)| v.unwrap_or(default))
            .collect()
    }
}

// ── Field checks ─────────────────────────────────────────────────────────────

fn non_empty<'s>(field: &'static str, s: &'s str) -> Result<&'s str, ValidationError> {
    if s.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(s)
}

fn in_range(field: &'static str, v: u64, min: u64, max: u64) -> Result<(), ValidationError> {
    if v < min {
        return Err(ValidationError::BelowMinimum { field, min, got: v });
    }
    if v > max {
        return Err(ValidationError::AboveMaximum { field, max, got: v });
    }
    Ok(())
}

fn block_number(n: u32) -> Result<u32, ValidationError> {
    in_range("block_num", n as u64, 1, u32::MAX as u64)?;
    Ok(n)
}

fn transaction_id(tx_id: &str) -> Result<&str, ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidHex {
        field: "tx_id",
        len: TRANSACTION_ID_BYTES * 2,
        reason,
    };
    let bytes = hex::decode(tx_id).map_err(|e| invalid(e.to_string()))?;
    if bytes.len() != TRANSACTION_ID_BYTES {
        return Err(invalid(format!("got {} characters", tx_id.len())));
    }
    Ok(tx_id)
}

fn encode<T: Serialize + ?Sized>(field: &'static str, v: &T) -> Result<Value, ValidationError> {
    serde_json::to_value(v).map_err(|e| ValidationError::Unencodable {
        field,
        reason: e.to_string(),
    })
}
