//! Builders for HTTP state backed by the configured student repository.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use school::domain::ports::FixtureStudentRepository;
use school::inbound::http::state::HttpState;
use school::outbound::persistence::{DbPool, DieselStudentRepository};

/// Use the Diesel repository when a pool is available, otherwise the
/// in-memory fixture.
pub(super) fn build_http_state(db_pool: Option<&DbPool>) -> web::Data<HttpState> {
    let state = match db_pool {
        Some(pool) => HttpState::from_repository(Arc::new(DieselStudentRepository::new(
            pool.clone(),
        ))),
        None => {
            warn!("no database configured; student records are held in memory");
            HttpState::from_repository(Arc::new(FixtureStudentRepository::new()))
        }
    };
    web::Data::new(state)
}
