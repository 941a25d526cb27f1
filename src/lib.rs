//! runpad library exports for testing

pub mod core;
pub mod executor;
pub mod tui;

#[cfg(test)]
pub mod test_support;
