//! Purpose: Shared core library crate used by the `triform` CLI and tests.
//! Exports: `core` (segment model, codecs, errors) and `api` (boundary types).
//! Role: Internal library backing the binary; `api` is the supported surface.
//! Invariants: The core holds no cross-call state; every conversion is a pure
//! function of its inputs.
pub mod api;
pub mod core;
