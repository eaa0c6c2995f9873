pub mod credentials;
pub mod helper;

pub use credentials::Credentials;
