pub mod cli;
pub mod dir_name;
pub mod git;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod paths;
pub mod puller;
pub mod remote_url;
pub mod source;
pub mod user_error;

pub use cli::run;
