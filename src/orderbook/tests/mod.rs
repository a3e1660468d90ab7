//! In-crate test suites that need access to the engine's internals.
