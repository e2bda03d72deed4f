// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Strongly typed record identifiers.
//!
//! Every ledger mints its own small integer ids; wrapping them keeps a stock
//! item id from being passed where an issued-row id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[repr(transparent)]
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Raw numeric value.
            pub fn value(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a warehouse stock item.
    ItemId
);
record_id!(
    /// Identifier of a recorded inventory snapshot.
    SnapshotId
);
record_id!(
    /// Identifier of a row in a student's issued-items ledger.
    RowId
);
record_id!(
    /// Identifier of a resident.
    StudentId
);
record_id!(
    /// Identifier of an item kind in the issue/return movement log.
    KindId
);
record_id!(
    /// Identifier of a movement history entry.
    MovementId
);

/// Next id after the largest of `ids`, or 1 when there are none.
pub(crate) fn next_after<I, T>(ids: I, wrap: fn(u32) -> T) -> T
where
    I: IntoIterator<Item = u32>,
{
    wrap(ids.into_iter().max().map_or(1, |m| m.saturating_add(1)))
}
