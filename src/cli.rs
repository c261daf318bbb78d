mod app;
mod completions;
mod download;
mod global;
mod list;
mod maybe_env;
mod remove;
mod storage;
mod upload;

pub use app::*;
pub use completions::*;
pub use download::*;
pub use global::*;
pub use list::*;
pub use maybe_env::*;
pub use remove::*;
pub use storage::*;
pub use upload::*;
