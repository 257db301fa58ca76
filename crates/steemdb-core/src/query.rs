use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::constants::{ACCOUNT_HISTORY_LATEST, DISCUSSION_QUERY_MAX_LIMIT};
use crate::error::ValidationError;

// ── DiscussionSortKey ────────────────────────────────────────────────────────

/// Ordering of a `get_discussions_by_*` query.
///
/// For [`Blog`](Self::Blog) and [`Feed`](Self::Feed) the query's `tag` is read
/// by the node as a username rather than a topic tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionSortKey {
    Active,
    Blog,
    Cashout,
    Children,
    Comments,
    Created,
    Feed,
    Hot,
    Promoted,
    Trending,
    Votes,
}

impl DiscussionSortKey {
    pub const ALL: [DiscussionSortKey; 11] = [
        Self::Active,
        Self::Blog,
        Self::Cashout,
        Self::Children,
        Self::Comments,
        Self::Created,
        Self::Feed,
        Self::Hot,
        Self::Promoted,
        Self::Trending,
        Self::Votes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Blog => "blog",
            Self::Cashout => "cashout",
            Self::Children => "children",
            Self::Comments => "comments",
            Self::Created => "created",
            Self::Feed => "feed",
            Self::Hot => "hot",
            Self::Promoted => "promoted",
            Self::Trending => "trending",
            Self::Votes => "votes",
        }
    }

    /// Remote method serving this ordering.
    pub fn method_name(&self) -> String {
        format!("get_discussions_by_{}", self.as_str())
    }
}

impl fmt::Display for DiscussionSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscussionSortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSortKey { key: s.to_string() })
    }
}

// ── DiscussionQuery ──────────────────────────────────────────────────────────

/// Window request for the `get_discussions_by_*` family.
///
/// `start_author`/`start_permlink` form a cursor: the post they name was the
/// last item of the previous page and is not repeated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_tags: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_authors: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_tags: Option<BTreeSet<String>>,
    /// Truncate post bodies to this many bytes; 0 returns the full body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncate_body: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_permlink: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_permlink: Option<String>,
}

impl DiscussionQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Continue after the post `author/permlink`.
    pub fn after(mut self, author: impl Into<String>, permlink: impl Into<String>) -> Self {
        self.start_author = Some(author.into());
        self.start_permlink = Some(permlink.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.limit == 0 {
            return Err(ValidationError::BelowMinimum {
                field: "limit",
                min: 1,
                got: 0,
            });
        }
        if self.limit > DISCUSSION_QUERY_MAX_LIMIT {
            return Err(ValidationError::AboveMaximum {
                field: "limit",
                max: DISCUSSION_QUERY_MAX_LIMIT as u64,
                got: self.limit as u64,
            });
        }
        match (&self.start_author, &self.start_permlink) {
            (Some(_), None) => Err(ValidationError::UnpairedCursor {
                field: "start_author",
                missing: "start_permlink",
            }),
            (None, Some(_)) => Err(ValidationError::UnpairedCursor {
                field: "start_permlink",
                missing: "start_author",
            }),
            (Some(a), Some(_)) if a.is_empty() => Err(ValidationError::Empty {
                field: "start_author",
            }),
            (Some(_), Some(p)) if p.is_empty() => Err(ValidationError::Empty {
                field: "start_permlink",
            }),
            _ => Ok(()),
        }
    }
}

// ── HistoryStart ─────────────────────────────────────────────────────────────

/// Where a backward walk of an account's history begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryStart {
    /// The most recent entry.
    Latest,
    /// A specific history sequence number (inclusive).
    Sequence(u64),
}

impl HistoryStart {
    pub fn to_param(&self) -> serde_json::Value {
        match self {
            Self::Latest => ACCOUNT_HISTORY_LATEST.into(),
            Self::Sequence(n) => (*n).into(),
        }
    }
}

impl From<u64> for HistoryStart {
    fn from(n: u64) -> Self {
        Self::Sequence(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sort_keys_round_trip_through_names() {
        for key in DiscussionSortKey::ALL {
            assert_eq!(key.as_str().parse::<DiscussionSortKey>().unwrap(), key);
        }
        assert_eq!(
            DiscussionSortKey::Trending.method_name(),
            "get_discussions_by_trending"
        );
        assert!("newest".parse::<DiscussionSortKey>().is_err());
    }

    #[test]
    fn limit_cap_is_enforced() {
        assert!(DiscussionQuery::new(100).validate().is_ok());
        let err = DiscussionQuery::new(101).validate().unwrap_err();
        assert_eq!(err.field(), "limit");
        assert!(DiscussionQuery::new(0).validate().is_err());
    }

    #[test]
    fn cursor_must_be_paired() {
        let mut q = DiscussionQuery::new(10);
        q.start_author = Some("alice".into());
        assert_eq!(
            q.validate(),
            Err(ValidationError::UnpairedCursor {
                field: "start_author",
                missing: "start_permlink"
            })
        );
        assert!(DiscussionQuery::new(10).after("alice", "hello").validate().is_ok());
    }

    #[test]
    fn unset_fields_are_not_serialized() {
        let q = DiscussionQuery::new(5).with_tag("photography");
        assert_eq!(
            serde_json::to_value(&q).unwrap(),
            json!({ "tag": "photography", "limit": 5 })
        );
    }

    #[test]
    fn history_start_encoding() {
        assert_eq!(HistoryStart::Latest.to_param(), json!(-1));
        assert_eq!(HistoryStart::from(100).to_param(), json!(100));
    }
}
