//! Cross-module scenario and property tests

mod properties;
