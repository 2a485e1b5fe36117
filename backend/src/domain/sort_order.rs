//! Ordering applied to the student listing.
//!
//! Only descending orders exist. Any token that is not recognised, including
//! an absent or empty one, falls back to last name descending.

use std::fmt;

/// Listing order selected by the `sortOrder` query token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StudentSortOrder {
    EnrollmentDateDesc,
    #[default]
    LastNameDesc,
    FirstNameDesc,
}

impl StudentSortOrder {
    /// Map a query token onto an ordering. Matching is exact and
    /// case-sensitive.
    ///
    /// # Examples
    /// ```
    /// use school::domain::StudentSortOrder;
    ///
    /// assert_eq!(
    ///     StudentSortOrder::from_token(Some("date_desc")),
    ///     StudentSortOrder::EnrollmentDateDesc
    /// );
    /// assert_eq!(
    ///     StudentSortOrder::from_token(Some("DATE_DESC")),
    ///     StudentSortOrder::LastNameDesc
    /// );
    /// assert_eq!(StudentSortOrder::from_token(None), StudentSortOrder::LastNameDesc);
    /// ```
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("date_desc") => Self::EnrollmentDateDesc,
            Some("last_name_desc") => Self::LastNameDesc,
            Some("first_name_desc") => Self::FirstNameDesc,
            _ => Self::default(),
        }
    }

    /// Canonical token for this ordering.
    pub fn token(self) -> &'static str {
        match self {
            Self::EnrollmentDateDesc => "date_desc",
            Self::LastNameDesc => "last_name_desc",
            Self::FirstNameDesc => "first_name_desc",
        }
    }
}

impl fmt::Display for StudentSortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("date_desc"), StudentSortOrder::EnrollmentDateDesc)]
    #[case(Some("last_name_desc"), StudentSortOrder::LastNameDesc)]
    #[case(Some("first_name_desc"), StudentSortOrder::FirstNameDesc)]
    #[case(None, StudentSortOrder::LastNameDesc)]
    #[case(Some(""), StudentSortOrder::LastNameDesc)]
    #[case(Some("name_asc"), StudentSortOrder::LastNameDesc)]
    #[case(Some("First_Name_Desc"), StudentSortOrder::LastNameDesc)]
    fn tokens_map_to_orderings(#[case] token: Option<&str>, #[case] expected: StudentSortOrder) {
        assert_eq!(StudentSortOrder::from_token(token), expected);
    }

    #[rstest]
    fn canonical_tokens_round_trip() {
        for order in [
            StudentSortOrder::EnrollmentDateDesc,
            StudentSortOrder::LastNameDesc,
            StudentSortOrder::FirstNameDesc,
        ] {
            assert_eq!(StudentSortOrder::from_token(Some(order.token())), order);
        }
    }
}
