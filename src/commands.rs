mod command;
mod completions;
mod download;
mod list;
mod remove;
mod storage_options;
mod upload;

pub use command::*;
