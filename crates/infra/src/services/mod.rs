mod notifier;

pub use notifier::*;
