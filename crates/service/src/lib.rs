//! Image job forms and the choices behind them.
//! - Forms are built from current rows and files on every construction.
//! - `clean` returns typed results or per-field error messages.
//! - [`form_service::FormService`] ties choice loading and validation together.

pub mod errors;
pub mod runtime;
pub mod features;
pub mod templates;
pub mod tags;
pub mod forms;
pub mod choices;
pub mod form_service;
#[cfg(test)]
pub mod test_support;
