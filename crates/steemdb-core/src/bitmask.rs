use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{BITMASK_WORD_BITS, MAX_OPERATION_ID};
use crate::error::ValidationError;
use crate::operations::operation_id;

/// Two-word operation filter for `get_account_history`.
///
/// Bit `i` of `low` is set iff operation id `i` (i < 32) is selected; bit
/// `i - 32` of `high` is set iff id `i` (32 <= i < 64) is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationBitmaskFilter {
    pub low: u32,
    pub high: u32,
}

impl OperationBitmaskFilter {
    /// Build a filter from operation ids. Order and duplicates do not matter.
    pub fn build<I>(ids: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut filter = Self::default();
        for id in ids {
            if id > MAX_OPERATION_ID {
                return Err(ValidationError::OperationIdOutOfRange { id });
            }
            if id < BITMASK_WORD_BITS {
                filter.low |= 1 << id;
            } else {
                filter.high |= 1 << (id - BITMASK_WORD_BITS);
            }
        }
        Ok(filter)
    }

    /// Build a filter from operation names (see [`crate::operations`]).
    pub fn from_names<I, S>(names: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = names
            .into_iter()
            .map(|n| operation_id(n.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(ids)
    }

    pub fn contains(&self, id: u32) -> bool {
        match id {
            i if i < BITMASK_WORD_BITS => self.low & (1 << i) != 0,
            i if i <= MAX_OPERATION_ID => self.high & (1 << (i - BITMASK_WORD_BITS)) != 0,
            _ => false,
        }
    }

    /// Selected operation ids, ascending.
    pub fn ids(&self) -> Vec<u32> {
        (0..=MAX_OPERATION_ID).filter(|&i| self.contains(i)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.low == 0 && self.high == 0
    }

    /// The two trailing positional params `get_account_history` expects.
    pub fn to_params(&self) -> [serde_json::Value; 2] {
        [self.low.into(), self.high.into()]
    }
}

impl fmt::Display for OperationBitmaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(0x{:08x}, 0x{:08x})", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_both_words() {
        let f = OperationBitmaskFilter::build([0, 5, 31, 32, 40]).unwrap();
        assert_eq!(f.low, 0x8000_0021);
        assert_eq!(f.high, 0x0000_0101);
    }

    #[test]
    fn decomposes_back_to_the_input_set() {
        let f = OperationBitmaskFilter::build([40, 0, 32, 31, 5]).unwrap();
        assert_eq!(f.ids(), vec![0, 5, 31, 32, 40]);

        let all: Vec<u32> = (0..=63).collect();
        assert_eq!(OperationBitmaskFilter::build(all.clone()).unwrap().ids(), all);
    }

    #[test]
    fn order_and_duplicates_are_ignored() {
        assert_eq!(
            OperationBitmaskFilter::build([5, 0, 5]).unwrap(),
            OperationBitmaskFilter::build([0, 5]).unwrap()
        );
        let ids = [3, 33, 17, 63];
        let doubled: Vec<u32> = ids.iter().chain(ids.iter()).copied().collect();
        assert_eq!(
            OperationBitmaskFilter::build(doubled).unwrap(),
            OperationBitmaskFilter::build(ids).unwrap()
        );
    }

    #[test]
    fn rejects_ids_beyond_the_second_word() {
        assert_eq!(
            OperationBitmaskFilter::build([1, 64]),
            Err(ValidationError::OperationIdOutOfRange { id: 64 })
        );
    }

    #[test]
    fn empty_input_selects_nothing() {
        let f = OperationBitmaskFilter::build(std::iter::empty()).unwrap();
        assert!(f.is_empty());
        assert!(f.ids().is_empty());
    }

    #[test]
    fn builds_from_names() {
        let f = OperationBitmaskFilter::from_names(["transfer", "producer_reward"]).unwrap();
        assert_eq!(f.low, 1 << 2);
        assert_eq!(f.high, 1 << (61 - 32));
        assert!(OperationBitmaskFilter::from_names(["nope"]).is_err());
    }

    #[test]
    fn params_are_low_then_high() {
        let f = OperationBitmaskFilter::build([1, 33]).unwrap();
        assert_eq!(f.to_params(), [serde_json::json!(2), serde_json::json!(2)]);
        assert_eq!(f.to_string(), "(0x00000002, 0x00000002)");
    }
}
