//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use school::Trace;
#[cfg(debug_assertions)]
use school::doc::ApiDoc;
use school::inbound::http::error::not_found;
use school::inbound::http::health::{HealthState, live, ready};
use school::inbound::http::state::HttpState;
use school::inbound::http::students;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session)
        .wrap(Trace)
        .configure(students::configure)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(not_found))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(config.db_pool.as_ref());
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    fn deps() -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: build_http_state(None),
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
        }
    }

    #[rstest]
    #[case("/health/ready", StatusCode::OK)]
    #[case("/health/live", StatusCode::OK)]
    #[case("/Students", StatusCode::OK)]
    #[case("/Students/Create", StatusCode::OK)]
    #[case("/Students/Details/1", StatusCode::NOT_FOUND)]
    #[case("/nowhere", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn app_routes_requests(#[case] uri: &str, #[case] expected: StatusCode) {
        let app = actix_test::init_service(build_app(deps())).await;

        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(res.status(), expected);
        assert!(res.headers().contains_key("trace-id"));
    }

    #[actix_web::test]
    async fn create_then_list_round_trips_through_session() {
        let app = actix_test::init_service(build_app(deps())).await;
        let form_res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/Students/Create").to_request())
                .await;
        let cookie = form_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();
        let body: Value = actix_test::read_body_json(form_res).await;
        let token = body["antiforgeryToken"]
            .as_str()
            .expect("antiforgery token")
            .to_owned();

        let create_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/Students/Create")
                .cookie(cookie)
                .set_form([
                    ("LastName", "Olivetto"),
                    ("FirstName", "Nino"),
                    ("EnrollmentDate", "2005-09-01"),
                    ("__RequestVerificationToken", token.as_str()),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(create_res.status(), StatusCode::FOUND);

        let list_res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/Students").to_request()).await;
        let listing: Value = actix_test::read_body_json(list_res).await;
        assert_eq!(listing["students"][0]["lastName"], "Olivetto");
    }
}
