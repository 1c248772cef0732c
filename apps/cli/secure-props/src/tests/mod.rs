mod cli;
mod clipboard;
mod error;
mod logger;
mod output;
