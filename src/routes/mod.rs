pub mod catalog_route;
pub mod ocr_route;

use actix_web::{http::header::ContentType, HttpResponse};
use askama::Template;

fn render_html<T: Template>(template: &T) -> HttpResponse {
    match template.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body),
        Err(e) => {
            log::error!("Failed to render template: {:?}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
