pub mod catalog;
pub mod classifier;

pub use catalog::{description, description_by_name, recommendation};
pub use classifier::{classify_signal, classify_signal_by_name};
