//! Application-wide constants.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Free transfers granted to a user on first use.
pub const DEFAULT_FREE_TRANSFERS: i32 = 5;

/// Commission rate applied to the requested amount once free transfers
/// are exhausted.
pub const COMMISSION_RATE: Decimal = dec!(0.07);

/// Opening balance for the EUR account. All other currencies open at zero.
pub const DEFAULT_EUR_BALANCE: Decimal = dec!(1000);

/// User id of the single local session.
pub const DEFAULT_USER_ID: &str = "firstUserID";
