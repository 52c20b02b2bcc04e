//! Operator console for an AI customer-support chatbot backend.
//!
//! [`api`] talks to the backend (typed endpoints over a retrying request executor),
//! [`controllers`] hold the paged views an operator works with, and [`ui`] renders them
//! for the terminal.

pub mod api;
pub mod config;
pub mod controllers;
pub mod dates;
pub mod error;
pub mod models;
pub mod text;
pub mod ui;

pub use error::{ApiError, ApiErrorKind, Result};
