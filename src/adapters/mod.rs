// Adapters layer: concrete implementations for external systems (exchange, filesystem, terminal).

pub mod coinbase;
pub mod dto;
pub mod prompt;
pub mod storage;
