//! Process-level plumbing shared by the wallet binaries.

pub mod logging;
