pub mod client;
pub mod payload;

pub use client::ConsoleClient;
