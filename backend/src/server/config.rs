//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::web;
use weatherboard::inbound::http::state::HttpState;

/// Everything the Actix factory needs to build an app per worker.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: web::Data<HttpState>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            http_state: web::Data::new(http_state),
        }
    }
}
