// Adapters layer: concrete implementations of the engine port.

pub mod memory;
