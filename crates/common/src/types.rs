use serde::{Deserialize, Serialize};

/// Declares an `i32`-backed identifier newtype.
///
/// Identifiers are assigned by the database (`SERIAL` columns), so there is
/// no generator here, only conversions.
macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wraps a raw database identifier.
            pub fn new(id: i32) -> Self {
                Self(id)
            }

            /// Returns the raw database identifier.
            pub fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

id_type!(
    /// Identifier of an order header.
    OrderId
);

id_type!(
    /// Identifier of a customer. Orders reference customers but do not own them.
    CustomerId
);

id_type!(
    /// Identifier of a catalog product.
    ProductId
);
