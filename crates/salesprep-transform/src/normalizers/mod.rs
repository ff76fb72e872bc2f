//! One transformation per vendor layout family.

pub(crate) mod evident;
pub(crate) mod labtrac;
pub(crate) mod leca;
pub(crate) mod totals;
pub(crate) mod transactor;
