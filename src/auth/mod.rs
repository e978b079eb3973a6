pub mod caller;
pub mod jwt;
pub mod password;

pub use caller::{AuthUser, Caller};
