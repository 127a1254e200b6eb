// src/middleware/mod.rs

pub mod no_cache;
pub mod request_size_limit;

pub use no_cache::no_cache_middleware;
pub use request_size_limit::request_size_limit_middleware;
