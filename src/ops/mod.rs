pub mod letter_ops;
pub mod wish_ops;
