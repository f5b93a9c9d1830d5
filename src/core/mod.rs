//! Core business logic - inventory, menu, orders, sale-driven stock deduction, and the
//! back-office records around them (waste, sales reports, the cash drawer).

/// Implements `as_str`, `Display` and `FromStr` for an enum persisted as text.
macro_rules! text_enum {
    ($name:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Text stored in the database.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = crate::errors::Error;

            fn from_str(s: &str) -> crate::errors::Result<Self> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(crate::errors::Error::InvalidValue {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// Cash drawer shifts and withdrawals
pub mod cash;
/// Manual inventory management and low-stock reporting
pub mod inventory;
/// Categories, dishes and their recipes
pub mod menu;
/// Order persistence and kitchen ticket status
pub mod order;
/// Pure recipe aggregation from a cart to per-ingredient deductions
pub mod recipe;
/// Sales history and revenue summaries built from orders
pub mod report;
/// Sale orchestration: checkout, deduction, reconciliation
pub mod sale;
/// Atomic application of deductions to the inventory
pub mod stock;
/// Waste log and its cost summary
pub mod waste;
