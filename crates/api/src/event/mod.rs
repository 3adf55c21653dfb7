mod subscribers;
mod update_event_schedule;

use actix_web::web;
use update_event_schedule::update_event_schedule_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/admin/events/{event_id}/schedule",
        web::put().to(update_event_schedule_controller),
    );
}
