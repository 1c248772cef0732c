mod config;
mod fetch;
mod operation;
