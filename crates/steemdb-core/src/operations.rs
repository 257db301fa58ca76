//! The protocol's operation enumeration.
//!
//! An operation's id is its position in this table. Ids 0..=46 are operations
//! a transaction can carry; 47.. are virtual operations the chain records as
//! side effects.

use crate::error::ValidationError;

/// Operation names indexed by operation id.
pub const OPERATION_NAMES: [&str; 64] = [
    // ── Regular operations ───────────────────────────────────────────────────
    "vote",
    "comment",
    "transfer",
    "transfer_to_vesting",
    "withdraw_vesting",
    "limit_order_create",
    "limit_order_cancel",
    "feed_publish",
    "convert",
    "account_create",
    "account_update",
    "witness_update",
    "account_witness_vote",
    "account_witness_proxy",
    "pow",
    "custom",
    "report_over_production",
    "delete_comment",
    "custom_json",
    "comment_options",
    "set_withdraw_vesting_route",
    "limit_order_create2",
    "claim_account",
    "create_claimed_account",
    "request_account_recovery",
    "recover_account",
    "change_recovery_account",
    "escrow_transfer",
    "escrow_dispute",
    "escrow_release",
    "pow2",
    "escrow_approve",
    "transfer_to_savings",
    "transfer_from_savings",
    "cancel_transfer_from_savings",
    "custom_binary",
    "decline_voting_rights",
    "reset_account",
    "set_reset_account",
    "claim_reward_balance",
    "delegate_vesting_shares",
    "account_create_with_delegation",
    "witness_set_properties",
    "account_update2",
    "create_proposal",
    "update_proposal_votes",
    "remove_proposal",
    // ── Virtual operations ───────────────────────────────────────────────────
    "fill_convert_request",
    "author_reward",
    "curation_reward",
    "comment_reward",
    "liquidity_reward",
    "interest",
    "fill_vesting_withdraw",
    "fill_order",
    "shutdown_witness",
    "fill_transfer_from_savings",
    "hardfork",
    "comment_payout_update",
    "return_vesting_delegation",
    "comment_benefactor_reward",
    "producer_reward",
    "clear_null_account_balance",
    "proposal_pay",
];

/// First id of the virtual operation range.
pub const FIRST_VIRTUAL_OPERATION: u32 = 47;

/// Look up an operation id by name. Accepts the bare name (`transfer`) or
/// the `_operation` suffixed form used by some node versions.
pub fn operation_id(name: &str) -> Result<u32, ValidationError> {
    let bare = name.strip_suffix("_operation").unwrap_or(name);
    OPERATION_NAMES
        .iter()
        .position(|n| *n == bare)
        .map(|i| i as u32)
        .ok_or_else(|| ValidationError::UnknownOperation {
            name: name.to_string(),
        })
}

pub fn operation_name(id: u32) -> Option<&'static str> {
    OPERATION_NAMES.get(id as usize).copied()
}

pub fn is_virtual(id: u32) -> bool {
    id >= FIRST_VIRTUAL_OPERATION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_ids_agree() {
        for (i, name) in OPERATION_NAMES.iter().enumerate() {
            assert_eq!(operation_id(name).unwrap(), i as u32, "{name}");
            assert_eq!(operation_name(i as u32), Some(*name));
        }
    }

    #[test]
    fn well_known_ids() {
        assert_eq!(operation_id("vote").unwrap(), 0);
        assert_eq!(operation_id("transfer").unwrap(), 2);
        assert_eq!(operation_id("delegate_vesting_shares").unwrap(), 40);
        assert_eq!(operation_id("producer_reward").unwrap(), 61);
    }

    #[test]
    fn suffixed_names_resolve() {
        assert_eq!(operation_id("transfer_operation").unwrap(), 2);
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            operation_id("teleport"),
            Err(ValidationError::UnknownOperation {
                name: "teleport".into()
            })
        );
        assert_eq!(operation_name(64), None);
    }

    #[test]
    fn virtual_range() {
        assert!(!is_virtual(operation_id("remove_proposal").unwrap()));
        assert!(is_virtual(operation_id("fill_convert_request").unwrap()));
        assert!(is_virtual(operation_id("producer_reward").unwrap()));
    }
}
