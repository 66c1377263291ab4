//! Core types shared by every Skillbox crate.
//!
//! # Main types
//!
//! - [`SkillboxError`] — Error taxonomy reported to the hosting platform.
//! - [`SkillboxResult`] — Convenience alias for `Result<T, SkillboxError>`.
//! - [`ExecutionContext`] — Per-invocation context passed to executors.
//! - [`FormResponse`] / [`FormEvent`] — Configuration form contract.
//! - [`LocaleCatalog`] — Localized strings with a fixed default locale.

/// Per-invocation execution context.
pub mod context;
/// Error types.
pub mod error;
/// Configuration form contract.
pub mod form;
/// Localized strings.
pub mod locale;

pub use context::ExecutionContext;
pub use error::{SkillboxError, SkillboxResult, NO_INPUT_MESSAGE};
pub use form::{FormEvent, FormResponse};
pub use locale::{LocaleBundle, LocaleCatalog, DEFAULT_LOCALE};
