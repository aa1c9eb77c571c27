//! Test-only modules: scenario tests (spec §8 "Concrete scenarios"),
//! property tests (spec §8 "Universal properties"), and the shared
//! `serde_json`-backed document generator they both build on.

mod arbitrary;
mod properties;
mod scenarios;
