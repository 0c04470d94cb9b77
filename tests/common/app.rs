use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use axum::Router;

use drowsiness_api::config::{Config, ModelConfig};
use drowsiness_api::pool::LandmarkPool;
use drowsiness_api::routes::build_router;
use drowsiness_api::state::AppState;
use drowsiness_api::vision::landmarks::LandmarkSource;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
}

pub fn test_config() -> Config {
    // 直接构造 Config，避免 set_var 造成的多线程竞态
    Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 5000,
        debug: false,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "*".to_string(),
        model: ModelConfig {
            model_dir: PathBuf::from("./models"),
            pool_size: 1,
            threads: 1,
        },
    }
}

pub fn spawn_with_pool(pool: LandmarkPool) -> TestApp {
    spawn_with_config(pool, test_config())
}

pub fn spawn_with_config(pool: LandmarkPool, config: Config) -> TestApp {
    let state = AppState::new(pool, &config);
    let app = build_router(state.clone()).expect("valid CORS origin");

    TestApp { app, state, config }
}

pub fn spawn_test_app(source: impl LandmarkSource + 'static) -> TestApp {
    spawn_with_pool(LandmarkPool::single(source))
}
