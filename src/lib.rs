//! Ruby: scripted gym-membership sign-up assistant.

pub mod catalog;
pub mod channels;
pub mod config;
pub mod conversation;
pub mod error;
pub mod gateway;
