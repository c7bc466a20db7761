//! quiztake-client — HTTP client for the quiz backend.
//!
//! Implements the `QuizService` trait over the backend's REST API, along
//! with authentication, class enrollment, and configuration loading.

pub mod config;
pub mod mock;
pub mod rest;

pub use config::{load_config, load_config_from, ClientConfig};
pub use mock::MockQuizService;
pub use rest::RestClient;

pub use quiztake_core::error::ApiError;
