// Module structure for the sync-event log analyzer.

// Core pipeline
pub mod parser;
pub mod timeline;
pub mod pairing;

// Configuration and orchestration
pub mod conf;
pub mod service;
pub mod runtime;
