mod classify;
mod command;
mod config;
mod preprocess;
