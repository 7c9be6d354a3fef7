pub mod error;
pub mod health;
pub mod login;
pub mod products;

pub use error::AppError;
