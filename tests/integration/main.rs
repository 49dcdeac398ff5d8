//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific service
//! against mock or in-memory adapters. No filesystem or network access
//! is required.

mod i18n_tests;
mod image_occlusion_tests;
mod mock_ports;
