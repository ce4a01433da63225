pub mod adapters;
pub mod commands;
pub mod domain;
pub mod ports;
