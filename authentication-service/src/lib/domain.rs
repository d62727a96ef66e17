pub mod discovery;
pub mod user;
