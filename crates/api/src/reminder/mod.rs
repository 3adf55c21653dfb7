mod cancel_reminders;
mod create_reminders;
mod get_reminder_state;
mod notifications;
pub mod sweep_reminders;
mod verify_reminder_link;

use actix_web::web;
use cancel_reminders::cancel_reminders_controller;
use create_reminders::create_reminders_controller;
use get_reminder_state::get_reminder_state_controller;
use sweep_reminders::sweep_reminders_controller;
use verify_reminder_link::verify_reminder_link_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::post().to(create_reminders_controller));
    cfg.route("/reminders", web::get().to(get_reminder_state_controller));
    cfg.route(
        "/reminders/links/verify",
        web::get().to(verify_reminder_link_controller),
    );
    cfg.route(
        "/reminders/{event_id}",
        web::delete().to(cancel_reminders_controller),
    );

    cfg.route("/tasks/reminders", web::get().to(sweep_reminders_controller));
}
