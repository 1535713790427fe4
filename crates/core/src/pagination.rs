//! Pagination window parsing for list endpoints.
//!
//! Query parameters arrive as raw strings; parsing is a pure function that
//! either yields a well-formed window or enumerates every violated field.
//! Out-of-range values are rejected, never silently clamped.

use serde::{Deserialize, Serialize};

use crate::error::{FieldIssue, ValidationError};

/// Smallest accepted `take`.
pub const MIN_TAKE: i64 = 1;
/// Largest accepted `take`, and the default when `take` is absent.
pub const MAX_TAKE: i64 = 20;

/// How many most-recently-updated posts are embedded per followed user.
pub const EMBEDDED_POSTS_LIMIT: i64 = 10;
/// How many most-recently-updated comments are embedded per post.
pub const EMBEDDED_COMMENTS_LIMIT: i64 = 10;

/// The (skip, take) pair bounding a list query's offset and page size.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationWindow {
    pub skip: i64,
    pub take: i64,
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self {
            skip: 0,
            take: MAX_TAKE,
        }
    }
}

impl PaginationWindow {
    /// Parse raw query-string values into a window.
    ///
    /// Absent values fall back to the defaults (skip 0, take 20). Both fields
    /// are checked even when the first one fails, so the caller gets every
    /// violation at once.
    pub fn parse(skip: Option<&str>, take: Option<&str>) -> Result<Self, ValidationError> {
        let mut issues = Vec::new();

        let skip = match skip {
            None => 0,
            Some(raw) => match raw.parse::<i64>() {
                Ok(v) if v >= 0 => v,
                Ok(_) => {
                    issues.push(FieldIssue::new("skip", "must be at least 0"));
                    0
                }
                Err(_) => {
                    issues.push(FieldIssue::new("skip", "not an integer"));
                    0
                }
            },
        };

        let take = match take {
            None => MAX_TAKE,
            Some(raw) => match raw.parse::<i64>() {
                Ok(v) if (MIN_TAKE..=MAX_TAKE).contains(&v) => v,
                Ok(_) => {
                    issues.push(FieldIssue::new(
                        "take",
                        format!("must be between {MIN_TAKE} and {MAX_TAKE}"),
                    ));
                    MAX_TAKE
                }
                Err(_) => {
                    issues.push(FieldIssue::new("take", "not an integer"));
                    MAX_TAKE
                }
            },
        };

        if issues.is_empty() {
            Ok(Self { skip, take })
        } else {
            Err(ValidationError::new(issues))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absent_params_use_defaults() {
        let window = PaginationWindow::parse(None, None).unwrap();
        assert_eq!(window, PaginationWindow { skip: 0, take: 20 });
    }

    #[test]
    fn in_range_values_are_accepted() {
        let window = PaginationWindow::parse(Some("5"), Some("3")).unwrap();
        assert_eq!(window, PaginationWindow { skip: 5, take: 3 });
    }

    #[test]
    fn out_of_range_take_is_rejected_not_clamped() {
        let err = PaginationWindow::parse(None, Some("21")).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field, "take");
    }

    #[test]
    fn zero_take_is_rejected() {
        assert!(PaginationWindow::parse(None, Some("0")).is_err());
    }

    #[test]
    fn negative_skip_is_rejected() {
        let err = PaginationWindow::parse(Some("-1"), None).unwrap_err();
        assert_eq!(err.issues[0].field, "skip");
    }

    #[test]
    fn both_violations_are_reported_together() {
        let err = PaginationWindow::parse(Some("-3"), Some("abc")).unwrap_err();
        let fields: Vec<&str> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["skip", "take"]);
    }

    #[test]
    fn non_integer_text_is_flagged_as_such() {
        let err = PaginationWindow::parse(None, Some("ten")).unwrap_err();
        assert_eq!(err.issues[0].message, "not an integer");
    }

    proptest! {
        #[test]
        fn take_in_range_always_parses(take in 1i64..=20) {
            let window = PaginationWindow::parse(None, Some(&take.to_string())).unwrap();
            prop_assert_eq!(window.take, take);
        }

        #[test]
        fn take_out_of_range_always_fails(take in prop_oneof![i64::MIN..=0, 21i64..=i64::MAX]) {
            prop_assert!(PaginationWindow::parse(None, Some(&take.to_string())).is_err());
        }

        #[test]
        fn non_negative_skip_always_parses(skip in 0i64..=i64::MAX) {
            let window = PaginationWindow::parse(Some(&skip.to_string()), None).unwrap();
            prop_assert_eq!(window.skip, skip);
        }
    }
}
