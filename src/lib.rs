pub mod app;
pub mod constants;
pub mod errors;
pub mod mcp;
pub mod model;
pub mod services;
pub mod tools;
pub mod upstream;
pub mod utils;
