// handlers/mod.rs - HTTP handlers, one module per resource
pub mod schemes;
pub mod system;
