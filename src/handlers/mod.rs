use actix_web::{HttpRequest, HttpResponse};

pub mod auth;
pub mod employee;

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hello, Welcome to the Employee Directory API")
}

pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body(format!("Route {} not found.", req.uri()))
}
