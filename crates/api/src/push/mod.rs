mod authorize_push_channel;

use actix_web::web;
use authorize_push_channel::authorize_push_channel_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/pusher/auth", web::post().to(authorize_push_channel_controller));
}
