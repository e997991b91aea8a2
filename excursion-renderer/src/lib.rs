//! # excursion-renderer
//!
//! Tera-based message engine that turns registry outcomes into the lines
//! shown to the user.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use excursion_core::Registry;
//! use excursion_renderer::{Operation, Renderer};
//!
//! fn create(registry: &mut Registry, renderer: &Renderer) {
//!     let message = match registry.create_operator("Adventure Tours", "AKL") {
//!         Ok(operator) => renderer.operator_created(operator),
//!         Err(err) => renderer.failure(Operation::CreateOperator, &err),
//!     };
//!     if let Ok(text) = message {
//!         println!("{text}");
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{ActivityCtx, FailureCtx, HighlightCtx, OperatorCtx, ReviewCtx};
pub use engine::{MessageKey, Operation, Renderer, TemplateEngine};
pub use error::RenderError;
