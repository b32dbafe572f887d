//! Tick-driven effect engines.

pub mod rain;
pub mod reveal;

#[cfg(test)]
pub(crate) mod testing;
