//! HTTP handlers and the helpers they share.

use actix_web::http::header;
use actix_web::{HttpResponse, middleware, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;
use crate::middleware::RedirectUnauthorized;
use crate::services::ServiceError;

pub mod admin;
pub mod main;

/// Maps a flash message level to the CSS class of its alert box.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// `302 Found` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err:?}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context every page starts from: pending alerts, the current user and
/// the navigation key.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context
}

/// Converts a failed service call into a response. Form errors are flashed
/// and send the user back to `form_url`.
pub fn service_error_response(err: ServiceError, form_url: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Forbidden()
            .content_type("text/html; charset=utf-8")
            .body("<h1>403 Forbidden</h1>"),
        ServiceError::NotFound | ServiceError::TypeConstraint(_) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body("<h1>Not Found</h1>"),
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(form_url)
        }
        err => {
            log::error!("Request failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Registers the public pages and the `/admin` scope. Anonymous admin
/// requests are sent to the login page; admin responses are never cached.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::home)
        .service(main::show_register)
        .service(main::register)
        .service(main::show_login)
        .service(main::login)
        .service(main::logout)
        .service(main::account_disabled)
        .service(
            web::scope("/admin")
                .wrap(RedirectUnauthorized)
                .wrap(
                    middleware::DefaultHeaders::new()
                        .add((header::CACHE_CONTROL, admin::NO_CACHE)),
                )
                .configure(admin::configure),
        );
}
