pub mod auth;
pub mod events;
pub mod init;
pub mod password;
pub mod tokens;
pub mod users;
pub mod validator;
