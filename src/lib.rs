pub mod config;
pub mod constants;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod pool;
pub mod response;
pub mod routes;
pub mod state;
pub mod vision;
