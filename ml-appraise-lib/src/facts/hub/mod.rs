//! Model hub access: metadata documents and README text.

mod provider;

pub use provider::Provider;
