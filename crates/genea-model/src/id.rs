//! Identifier newtypes.
//!
//! Every entity is addressed by a `u64` id wrapped in its own type so that a
//! member id can never be passed where a rank id is expected. Serialization
//! is transparent (plain integers on the wire).

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create from a raw id.
            #[inline]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw id value.
            #[inline]
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifies a member of the organization.
    MemberId
);
id_type!(
    /// Identifies a rank tier.
    RankId
);
id_type!(
    /// Identifies a member package/plan.
    PackageId
);
id_type!(
    /// Identifies a commission record.
    CommissionId
);
id_type!(
    /// Identifies a product order.
    OrderId
);
