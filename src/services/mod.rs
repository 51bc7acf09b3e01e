//! External-service clients and response validation

pub mod ollama_client;
pub mod result_validator;

pub use ollama_client::{OllamaClient, ServiceError};
pub use result_validator::parse_classification;
