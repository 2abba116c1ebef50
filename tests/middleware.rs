use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use client_desk::middleware::RedirectUnauthorized;

#[actix_web::test]
async fn redirects_unauthorized_to_login() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/login/?next=%2F"
    );
}

#[actix_web::test]
async fn unauthorized_errors_keep_the_requested_path() {
    let app = test::init_service(App::new().wrap(RedirectUnauthorized).route(
        "/admin/main/client/",
        web::get().to(|| async {
            Err::<HttpResponse, _>(actix_web::error::ErrorUnauthorized("login required"))
        }),
    ))
    .await;

    let req = test::TestRequest::get()
        .uri("/admin/main/client/?q=dcc")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/login/?next=%2Fadmin%2Fmain%2Fclient%2F%3Fq%3Ddcc"
    );
}

#[actix_web::test]
async fn success_response_passes_through() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn scoped_routes_with_path_params_redirect() {
    let app = test::init_service(
        App::new().service(
            web::scope("/admin").wrap(RedirectUnauthorized).route(
                "/main/client/{id}/change/",
                web::get().to(|path: web::Path<i32>| async move {
                    if path.into_inner() > 0 {
                        HttpResponse::Unauthorized().finish()
                    } else {
                        HttpResponse::Ok().finish()
                    }
                }),
            ),
        ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/admin/main/client/5/change/")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/login/?next=%2Fadmin%2Fmain%2Fclient%2F5%2Fchange%2F"
    );
}
