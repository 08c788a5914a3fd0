//! Small text utilities.

mod stop;

pub use stop::enforce_stop_sequences;
