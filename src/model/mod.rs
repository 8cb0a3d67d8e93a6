pub mod config;
pub mod letter;
pub mod store;
pub mod wish;

pub use config::*;
pub use letter::*;
pub use store::*;
pub use wish::*;
