//! Core components, types, and utilities for the holiday policy bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Prompt templates for the completion API.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;
