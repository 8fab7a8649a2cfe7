//! Terminal story editor with streaming co-writing suggestions and PDF export

pub mod app;
pub mod characters;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod notification;
pub mod story;
pub mod stream;
pub mod widgets;
pub mod worker;

#[cfg(test)]
mod test_utils;
