//! Date format checks for `date` attributes
//!
//! Formats use chrono's strftime syntax (`%Y-%m-%d`, `%H:%M:%S`, ...).
//! Letter-only formats such as `Y-m-d` are refused when the schema is parsed.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use chrono::format::{parse, ParseErrorKind, Parsed, StrftimeItems};

/// Whether `value` parses completely against `format`
///
/// Formats that do not pin a full date (only a year, only a time) accept any
/// input matching their fields. When a full date is present it must exist.
pub fn matches_format(value: &str, format: &str) -> bool {
    let mut parsed = Parsed::new();
    if parse(&mut parsed, value, StrftimeItems::new(format)).is_err() {
        return false;
    }

    match parsed.to_naive_date() {
        Ok(_) => true,
        Err(e) => e.kind() == ParseErrorKind::NotEnough,
    }
}
