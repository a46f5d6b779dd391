//! Infrastructure layer: provider clients and transport adapters

pub mod email;
pub mod function;
pub mod http;
