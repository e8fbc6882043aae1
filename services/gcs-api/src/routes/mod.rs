pub mod common;
pub mod events;
pub mod health;
pub mod missions;
pub mod prearm;
pub mod status;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(status::status)
        .service(prearm::list_checks)
        .service(prearm::check_status)
        .service(prearm::perform_check)
        .service(prearm::perform_all_checks)
        .service(prearm::reset_checks)
        .service(missions::list_missions)
        .service(missions::create_mission)
        .service(missions::get_mission)
        .service(missions::arm_mission)
        .service(missions::start_mission)
        .service(missions::complete_mission)
        .service(missions::abort_mission)
        .service(events::mission_events);
}
