// Library exports for testing
// The binary (main.rs) imports these as well

pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod error;
pub mod logger;
pub mod output;

#[cfg(test)]
mod tests;
