pub mod atomic_file;
pub mod constants;
pub mod logging;
pub mod paths;
