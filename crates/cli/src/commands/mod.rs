pub mod build;
pub mod contact;
pub mod init;
mod response;
mod routes;
pub mod serve;
pub mod validate;
