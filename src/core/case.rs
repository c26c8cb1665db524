//! Briefcase identification.
//!
//! Cases are numbered the way players see them: `1..=case_count`.
//! A `CaseIndex` is just a number until it is checked against a session's
//! case count, so every engine entry point validates it before use.
//!
//! ```
//! use moon_or_dust::core::CaseIndex;
//!
//! let case = CaseIndex::new(4);
//! assert!(case.is_valid(10));
//! assert_eq!(case.slot(), 3);
//!
//! assert!(!CaseIndex::new(0).is_valid(10));
//! assert!(!CaseIndex::new(11).is_valid(10));
//! ```

use serde::{Deserialize, Serialize};

/// One-based briefcase number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseIndex(pub u8);

impl CaseIndex {
    /// Create a new case index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the raw (one-based) number.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Check whether this index names a case in a game of `case_count` cases.
    #[must_use]
    pub const fn is_valid(self, case_count: usize) -> bool {
        self.0 >= 1 && (self.0 as usize) <= case_count
    }

    /// Zero-based storage slot. Only meaningful for valid indices.
    #[must_use]
    pub const fn slot(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }

    /// Case index for a zero-based storage slot.
    #[must_use]
    pub const fn from_slot(slot: usize) -> Self {
        Self((slot + 1) as u8)
    }

    /// Iterate over every case in a game of `case_count` cases, in order.
    ///
    /// ```
    /// use moon_or_dust::core::CaseIndex;
    ///
    /// let cases: Vec<_> = CaseIndex::all(3).collect();
    /// assert_eq!(cases, vec![CaseIndex::new(1), CaseIndex::new(2), CaseIndex::new(3)]);
    /// ```
    pub fn all(case_count: usize) -> impl Iterator<Item = CaseIndex> {
        (0..case_count).map(CaseIndex::from_slot)
    }
}

impl std::fmt::Display for CaseIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Case {}", self.0)
    }
}
