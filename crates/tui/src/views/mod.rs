pub mod chat;
pub mod help;
pub mod input;
pub mod login;
pub mod results;
