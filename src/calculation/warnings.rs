//! Warning codes attached to reports when configuration degrades to a default.

/// An interval was priced at the organisation fallback rate.
pub const FALLBACK_RATE_USED: &str = "FALLBACK_RATE_USED";

/// A break rule had a negative field and was ignored.
pub const MALFORMED_BREAK_RULE: &str = "MALFORMED_BREAK_RULE";

/// A monthly staff member has no salary on record.
pub const NO_ACTIVE_CONTRACT: &str = "NO_ACTIVE_CONTRACT";

/// Worked time references a staff id missing from the roster.
pub const UNKNOWN_STAFF: &str = "UNKNOWN_STAFF";

/// Unassigned shifts were left out of a payroll run.
pub const OPEN_SHIFTS_EXCLUDED: &str = "OPEN_SHIFTS_EXCLUDED";
