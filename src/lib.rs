#![no_std]

// Use std when running tests, see: https://stackoverflow.com/a/28186509
// Make sure to use different target when testing, e.g.
//   cargo test --target x86_64-unknown-linux-gnu
#[cfg(test)]
#[macro_use]
extern crate std;

// Must go first so that the macros are visible in other modules
#[macro_use]
mod fmt;

pub mod config;
pub mod host;
pub mod keyboard;
pub mod layers;
pub mod lib8tion;
pub mod utils;
