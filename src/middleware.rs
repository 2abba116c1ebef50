//! Middleware sending anonymous visitors of protected pages to the login form.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::error::InternalError;
use actix_web::http::{StatusCode, Uri, header};
use actix_web::{Error, HttpResponse};

pub const LOGIN_URL: &str = "/login/";

/// Turns any 401 response into a `302 Found` to `/login/?next=<path>`.
pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        // Holding a clone of the HttpRequest across the call breaks scope routing.
        let requested = req.uri().clone();

        Box::pin(async move {
            match service.call(req).await {
                Ok(res) if res.status() == StatusCode::UNAUTHORIZED => {
                    let (request, _) = res.into_parts();
                    let response = login_redirect(request.uri()).map_into_right_body();
                    Ok(ServiceResponse::new(request, response))
                }
                Ok(res) => Ok(res.map_into_left_body()),
                Err(err) if err.as_response_error().status_code() == StatusCode::UNAUTHORIZED => {
                    Err(InternalError::from_response(err, login_redirect(&requested)).into())
                }
                Err(err) => Err(err),
            }
        })
    }
}

/// Login url carrying the requested path and query as `next`.
pub fn login_url_for(path: &str) -> String {
    match serde_html_form::to_string(&[("next", path)][..]) {
        Ok(query) => format!("{LOGIN_URL}?{query}"),
        Err(_) => LOGIN_URL.to_string(),
    }
}

fn login_redirect(uri: &Uri) -> HttpResponse {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    HttpResponse::Found()
        .insert_header((header::LOCATION, login_url_for(path)))
        .finish()
}
