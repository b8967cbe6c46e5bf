pub mod executor;
pub mod http;
pub mod model;
pub mod vector;
