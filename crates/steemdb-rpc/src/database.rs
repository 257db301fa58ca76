use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use steemdb_core::constants::DATABASE_API;
use steemdb_core::error::{ClientError, ClientResult};
use steemdb_core::{
    AppliedOperation, BlockHeader, ChainProperties, ConfigValue, Discussion, DiscussionQuery,
    DiscussionSortKey, DynamicGlobalProperties, ExtendedAccount, HistoryEntry, HistoryStart,
    OperationBitmaskFilter, Price, SignedBlock, SignedTransaction, VersionInfo, VestingDelegation,
};

use crate::call::DatabaseCall;
use crate::transport::Transport;

/// Typed access to a node's `database_api` namespace.
///
/// Holds a borrowed transport and nothing else, so a single instance can be
/// used from any number of concurrent tasks. Every method validates its
/// arguments locally first; a rejected argument never reaches the transport.
/// Transport failures are returned unchanged and nothing is retried here.
pub struct DatabaseApi<'t, T: ?Sized> {
    transport: &'t T,
}

impl<T: ?Sized> Clone for DatabaseApi<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for DatabaseApi<'_, T> {}

impl<'t, T: Transport + ?Sized> DatabaseApi<'t, T> {
    pub fn new(transport: &'t T) -> Self {
        Self { transport }
    }

    async fn dispatch(&self, call: &DatabaseCall<'_>) -> ClientResult<Value> {
        let params = call.params()?;
        self.transport
            .invoke(DATABASE_API, &call.method(), params)
            .await
    }

    async fn fetch<R: DeserializeOwned>(&self, call: DatabaseCall<'_>) -> ClientResult<R> {
        let value = self.dispatch(&call).await?;
        decode(&call.method(), value)
    }

    // ── Chain state ──────────────────────────────────────────────────────────

    pub async fn get_dynamic_global_properties(&self) -> ClientResult<DynamicGlobalProperties> {
        self.fetch(DatabaseCall::GetDynamicGlobalProperties).await
    }

    /// Median of the chain parameters voted by the active witnesses.
    pub async fn get_chain_properties(&self) -> ClientResult<ChainProperties> {
        self.fetch(DatabaseCall::GetChainProperties).await
    }

    /// Fetch the state blob for a front-end route such as `@alice` or
    /// `trending/photography`. The result must be an object or an array;
    /// its contents are not checked.
    pub async fn get_state(&self, path: &str) -> ClientResult<Value> {
        let call = DatabaseCall::GetState { path };
        let value = self.dispatch(&call).await?;
        if !(value.is_object() || value.is_array()) {
            return Err(unexpected(&call.method(), "expected an object or array"));
        }
        Ok(value)
    }

    pub async fn get_current_median_history_price(&self) -> ClientResult<Price> {
        self.fetch(DatabaseCall::GetCurrentMedianHistoryPrice).await
    }

    /// Node constants. Booleans, numbers and strings are returned as sent.
    pub async fn get_config(&self) -> ClientResult<BTreeMap<String, ConfigValue>> {
        self.fetch(DatabaseCall::GetConfig).await
    }

    pub async fn get_version(&self) -> ClientResult<VersionInfo> {
        self.fetch(DatabaseCall::GetVersion).await
    }

    // ── Delegations ──────────────────────────────────────────────────────────

    /// Delegations made by `account`, ordered by delegatee ascending.
    ///
    /// `from` is a delegatee name to start at (default: the beginning) and
    /// `limit` defaults to the maximum page size of 1000.
    pub async fn get_vesting_delegations(
        &self,
        account: &str,
        from: Option<&str>,
        limit: Option<u32>,
    ) -> ClientResult<Vec<VestingDelegation>> {
        self.fetch(DatabaseCall::GetVestingDelegations {
            account,
            from,
            limit,
        })
        .await
    }

    // ── Blocks ───────────────────────────────────────────────────────────────

    /// `Ok(None)` when `block_num` is past the current head.
    pub async fn get_block_header(&self, block_num: u32) -> ClientResult<Option<BlockHeader>> {
        self.fetch(DatabaseCall::GetBlockHeader { block_num }).await
    }

    /// `Ok(None)` when `block_num` is past the current head.
    pub async fn get_block(&self, block_num: u32) -> ClientResult<Option<SignedBlock>> {
        self.fetch(DatabaseCall::GetBlock { block_num }).await
    }

    /// Operations applied in a block, in application order. With
    /// `only_virtual = Some(true)` only the virtual operations are returned,
    /// in the same relative order.
    pub async fn get_operations(
        &self,
        block_num: u32,
        only_virtual: Option<bool>,
    ) -> ClientResult<Vec<AppliedOperation>> {
        let call = DatabaseCall::GetOperations {
            block_num,
            only_virtual,
        };
        let ops: Vec<AppliedOperation> = self.fetch(call.clone()).await?;
        if only_virtual == Some(true) && ops.iter().any(|op| !op.is_virtual()) {
            return Err(unexpected(
                &call.method(),
                "regular operation in a virtual-only result",
            ));
        }
        Ok(ops)
    }

    // ── Discussions ──────────────────────────────────────────────────────────

    /// A window of posts in `sort` order.
    ///
    /// For [`DiscussionSortKey::Blog`] and [`DiscussionSortKey::Feed`] the
    /// query's `tag` names an account, not a topic. When the query carries a
    /// start cursor the post it names is excluded from the result, since it
    /// ended the previous page.
    pub async fn get_discussions(
        &self,
        sort: DiscussionSortKey,
        query: &DiscussionQuery,
    ) -> ClientResult<Vec<Discussion>> {
        let mut posts: Vec<Discussion> = self
            .fetch(DatabaseCall::GetDiscussions { sort, query })
            .await?;
        if let (Some(author), Some(permlink)) = (&query.start_author, &query.start_permlink) {
            posts.retain(|d| !(&d.author == author && &d.permlink == permlink));
        }
        Ok(posts)
    }

    // ── Accounts ─────────────────────────────────────────────────────────────

    /// Look up accounts by name. Unknown names are silently absent and the
    /// result order is whatever the node returns.
    pub async fn get_accounts(&self, usernames: &[String]) -> ClientResult<Vec<ExtendedAccount>> {
        self.fetch(DatabaseCall::GetAccounts { usernames }).await
    }

    /// Walk `account`'s history backward from `from`.
    ///
    /// Entries come back sorted by sequence number, strictly decreasing.
    /// `limit` may not exceed `from + 1`. A filter selecting no operations is
    /// rejected: on the wire it is indistinguishable from no filter at all.
    /// When `filter` is set the node drops non-matching operations; depending
    /// on the node version `limit` counts entries either before or after that
    /// filtering, so callers that need an exact number of matches should
    /// over-fetch and filter locally.
    pub async fn get_account_history(
        &self,
        account: &str,
        from: impl Into<HistoryStart>,
        limit: u32,
        filter: Option<OperationBitmaskFilter>,
    ) -> ClientResult<Vec<HistoryEntry>> {
        let from = from.into();
        let call = DatabaseCall::GetAccountHistory {
            account,
            from,
            limit,
            filter,
        };
        let mut entries: Vec<HistoryEntry> = self.fetch(call.clone()).await?;
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        if entries.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(unexpected(&call.method(), "duplicate sequence number"));
        }
        if let (HistoryStart::Sequence(max), Some((top, _))) = (from, entries.first()) {
            if *top > max {
                return Err(unexpected(
                    &call.method(),
                    format!("sequence number {top} above requested start {max}"),
                ));
            }
        }
        Ok(entries)
    }

    // ── Transactions ─────────────────────────────────────────────────────────

    /// Fetch a transaction by its 40-character hex id. An id the node does
    /// not know is [`ClientError::NotFound`].
    pub async fn get_transaction(&self, tx_id: &str) -> ClientResult<SignedTransaction> {
        let call = DatabaseCall::GetTransaction { tx_id };
        let value = match self.dispatch(&call).await {
            Ok(Value::Null) => return Err(ClientError::NotFound(tx_id.to_string())),
            Ok(v) => v,
            Err(ClientError::Remote { ref message, .. }) if is_unknown_transaction(message) => {
                return Err(ClientError::NotFound(tx_id.to_string()))
            }
            Err(e) => return Err(e),
        };
        decode(&call.method(), value)
    }

    /// Whether the transaction's signatures satisfy its required authorities.
    /// Insufficient authority is `Ok(false)`, not an error.
    pub async fn verify_authority(&self, transaction: &SignedTransaction) -> ClientResult<bool> {
        let call = DatabaseCall::VerifyAuthority { transaction };
        match self.dispatch(&call).await {
            Ok(value) => decode(&call.method(), value),
            Err(ClientError::Remote { ref message, .. }) if is_missing_authority(message) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn decode<R: DeserializeOwned>(method: &str, value: Value) -> ClientResult<R> {
    serde_json::from_value(value).map_err(|e| unexpected(method, e.to_string()))
}

fn unexpected(method: &str, reason: impl Into<String>) -> ClientError {
    ClientError::UnexpectedResponse {
        method: method.to_string(),
        reason: reason.into(),
    }
}

fn is_unknown_transaction(message: &str) -> bool {
    message.to_ascii_lowercase().contains("unknown transaction")
}

fn is_missing_authority(message: &str) -> bool {
    let m = message.to_ascii_lowercase();
    m.contains("missing") && m.contains("authority")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_messages_are_classified() {
        assert!(is_unknown_transaction(
            "Assert Exception:false: Unknown Transaction deadbeef"
        ));
        assert!(!is_unknown_transaction("unknown block"));
        assert!(is_missing_authority("Missing Active Authority alice"));
        assert!(is_missing_authority("missing required posting authority"));
        assert!(!is_missing_authority("duplicate transaction"));
    }
}
