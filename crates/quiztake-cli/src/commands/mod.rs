//! Subcommand implementations.

pub mod auth;
pub mod classes;
pub mod init;
pub mod quizzes;
pub mod result;
pub mod take;
