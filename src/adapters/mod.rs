// Adapters layer: terminal front ends driving the tasting session.

#[cfg(feature = "cli")]
pub mod prompt;
