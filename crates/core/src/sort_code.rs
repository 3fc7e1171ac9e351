//! Registry of named fallback orderings.
//!
//! Every product that is not pinned to a fixed slot falls back to one of
//! these orderings. The numeric codes are part of the persisted category
//! settings and of the listing API, so they are stable; code `8` is an
//! intentional gap kept for compatibility with existing settings rows.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Sort direction applied by a fallback ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A named fallback ordering over non-pinned products.
///
/// The engine is agnostic to the comparator internals; the repository
/// layer maps each code to a concrete `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum SortCode {
    ReleaseDate,
    Popularity,
    CheapestPrice,
    HighestPrice,
    NameAsc,
    NameDesc,
    SearchRanking,
    StockAsc,
    StockDesc,
}

impl SortCode {
    /// The stable numeric code used in settings rows and query parameters.
    pub const fn code(self) -> i16 {
        match self {
            Self::ReleaseDate => 1,
            Self::Popularity => 2,
            Self::CheapestPrice => 3,
            Self::HighestPrice => 4,
            Self::NameAsc => 5,
            Self::NameDesc => 6,
            Self::SearchRanking => 7,
            Self::StockAsc => 9,
            Self::StockDesc => 10,
        }
    }

    /// Look up an ordering by its numeric code.
    pub fn from_code(code: i16) -> Result<Self, CoreError> {
        match code {
            1 => Ok(Self::ReleaseDate),
            2 => Ok(Self::Popularity),
            3 => Ok(Self::CheapestPrice),
            4 => Ok(Self::HighestPrice),
            5 => Ok(Self::NameAsc),
            6 => Ok(Self::NameDesc),
            7 => Ok(Self::SearchRanking),
            9 => Ok(Self::StockAsc),
            10 => Ok(Self::StockDesc),
            _ => Err(CoreError::UnsupportedSortCode { code }),
        }
    }

    /// Direction the comparator runs in.
    pub const fn direction(self) -> SortDirection {
        match self {
            Self::CheapestPrice | Self::NameAsc | Self::StockAsc => SortDirection::Asc,
            Self::ReleaseDate
            | Self::Popularity
            | Self::HighestPrice
            | Self::NameDesc
            | Self::SearchRanking
            | Self::StockDesc => SortDirection::Desc,
        }
    }
}

impl From<SortCode> for i16 {
    fn from(code: SortCode) -> i16 {
        code.code()
    }
}

impl TryFrom<i16> for SortCode {
    type Error = CoreError;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;

    // -----------------------------------------------------------------------
    // Code round-trips
    // -----------------------------------------------------------------------

    #[test]
    fn every_code_round_trips() {
        for code in [1, 2, 3, 4, 5, 6, 7, 9, 10] {
            let sort = SortCode::from_code(code).unwrap();
            assert_eq!(sort.code(), code);
        }
    }

    // -----------------------------------------------------------------------
    // Unknown codes
    // -----------------------------------------------------------------------

    #[test]
    fn rejects_unknown_code() {
        assert_matches!(
            SortCode::from_code(99),
            Err(CoreError::UnsupportedSortCode { code: 99 })
        );
    }

    #[test]
    fn rejects_reserved_gap_code() {
        assert!(SortCode::from_code(8).is_err());
    }

    #[test]
    fn rejects_zero_code() {
        assert!(SortCode::from_code(0).is_err());
    }

    // -----------------------------------------------------------------------
    // Directions
    // -----------------------------------------------------------------------

    #[test]
    fn cheapest_price_sorts_ascending() {
        assert_eq!(SortCode::CheapestPrice.direction(), SortDirection::Asc);
    }

    #[test]
    fn release_date_sorts_descending() {
        assert_eq!(SortCode::ReleaseDate.direction(), SortDirection::Desc);
    }

    #[test]
    fn stock_codes_cover_both_directions() {
        assert_eq!(SortCode::StockAsc.direction(), SortDirection::Asc);
        assert_eq!(SortCode::StockDesc.direction(), SortDirection::Desc);
    }
}
