mod artifact;
mod config;
mod error;
mod exec;
mod operation;
