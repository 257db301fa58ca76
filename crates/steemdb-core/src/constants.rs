/// ─── Database API Constants ─────────────────────────────────────────────────
///
/// Namespace, paging caps and documented defaults of the node's
/// `database_api` query surface.

// ── Namespace ────────────────────────────────────────────────────────────────

/// API namespace every Facade call is dispatched to.
pub const DATABASE_API: &str = "database_api";

// ── Discussions ──────────────────────────────────────────────────────────────

/// Maximum `limit` accepted by the `get_discussions_by_*` family.
pub const DISCUSSION_QUERY_MAX_LIMIT: u32 = 100;

// ── Vesting delegations ──────────────────────────────────────────────────────

/// Maximum (and default) `limit` for `get_vesting_delegations`.
pub const VESTING_DELEGATIONS_MAX_LIMIT: u32 = 1000;

/// Default paging cursor for `get_vesting_delegations`: start of the range.
pub const VESTING_DELEGATIONS_DEFAULT_FROM: &str = "";

// ── Account history ──────────────────────────────────────────────────────────

/// Maximum `limit` accepted by `get_account_history`.
pub const ACCOUNT_HISTORY_MAX_LIMIT: u32 = 10_000;

/// Wire encoding of "start from the most recent history entry".
pub const ACCOUNT_HISTORY_LATEST: i64 = -1;

// ── Operations ───────────────────────────────────────────────────────────────

/// Width of one bitmask word.
pub const BITMASK_WORD_BITS: u32 = 32;

/// Operation ids representable by the two-word filter (0..64).
pub const MAX_OPERATION_ID: u32 = 2 * BITMASK_WORD_BITS - 1;

// ── Identifiers ──────────────────────────────────────────────────────────────

/// Transaction ids are RIPEMD-160 digests: 20 bytes, 40 hex characters.
pub const TRANSACTION_ID_BYTES: usize = 20;
