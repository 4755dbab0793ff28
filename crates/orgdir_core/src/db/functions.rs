//! Scalar SQL functions registered on every directory connection.
//!
//! SQLite's built-in `lower()` only folds ASCII, so case-insensitive title
//! and activity matching goes through `casefold()` instead.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// SQL name of the Unicode lower-casing helper.
pub const CASEFOLD_FN: &str = "casefold";

/// Lower-cases text the same way the SQL `casefold()` function does.
///
/// Search terms must be normalized with this before being bound against
/// `casefold(column)`.
pub fn casefold(value: &str) -> String {
    value.to_lowercase()
}

pub(super) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<Option<String>>(0)?;
            Ok(value.map(|text| casefold(&text)))
        },
    )
}
