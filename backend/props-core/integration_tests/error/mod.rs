mod download;
mod operation;
