pub mod client;
pub mod runner;
pub mod types;

pub use client::{TelegramClient, TelegramError};
pub use types::Update;
