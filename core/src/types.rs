//! Shared primitive types used across the analysis.

/// A bank account identifier, as it appears in every input table.
pub type AccountId = String;

/// Ground-truth flag: 1 for a mule account, 0 otherwise.
pub type MuleFlag = u8;

/// Flag assigned to accounts that have no row in the label table.
pub const NON_MULE: MuleFlag = 0;
pub const MULE: MuleFlag = 1;
