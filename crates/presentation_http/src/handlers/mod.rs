//! HTTP request handlers

pub mod health;
pub mod media;
pub mod search;
