pub mod ai_provider;
pub mod assessor;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod ocr;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod search;
