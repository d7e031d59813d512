use crate::{
    api::{attendance, health, kpi, task, user},
    config::Config,
    error::ApiError,
};
use actix_cors::Cors;
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond((60_000 / requests_per_min as u64).max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("quota is non-zero");
    Governor::new(&cfg)
}

/// Browser access for the dashboard, which is served from another origin.
pub fn build_cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if config.cors_allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    config
        .cors_allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

/// Bad JSON bodies and path segments get the same `{ "error": ... }` shape as handler errors.
pub fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into()),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    extractor_configs(cfg);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_api_per_min))
            .route("/health", web::get().to(health::health))
            .route("/users", web::get().to(user::list_users))
            .service(
                web::scope("/attendance")
                    // /attendance/check-in
                    .route("/check-in", web::post().to(attendance::check_in))
                    // /attendance/status/{user_id}
                    .route("/status/{user_id}", web::get().to(attendance::attendance_status))
                    // /attendance/today
                    .route("/today", web::get().to(attendance::attendance_today)),
            )
            .service(
                web::scope("/kpi")
                    // /kpi/status/{user_id}
                    .route("/status/{user_id}", web::get().to(kpi::kpi_status)),
            )
            .service(
                web::scope("/tasks")
                    // /tasks
                    .service(
                        web::resource("")
                            .route(web::get().to(task::list_tasks))
                            .route(web::post().to(task::create_task)),
                    )
                    // /tasks/{id}/status
                    .service(
                        web::resource("/{id}/status")
                            .route(web::patch().to(task::update_task_status)),
                    ),
            ),
    );
}
