//! Integration tests with mock HTTP server

pub mod chat;
pub mod completion;
pub mod mock_server;
pub mod streaming;
