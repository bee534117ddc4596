use actix_web::{get, post, web, HttpResponse};
use askama::Template;
use serde::Deserialize;

use crate::{
    domain::product::{filter_by_title, Product},
    services::{PRICE_CHART_FILE, RATING_CHART_FILE},
};

use super::render_html;

/// Products scraped at startup. Never mutated afterwards.
pub struct Catalog {
    pub products: Vec<Product>,
}

#[derive(Template)]
#[template(path = "catalog.html")]
struct CatalogTemplate<'a> {
    products: Vec<&'a Product>,
    total: usize,
    search: &'a str,
    price_chart: String,
    rating_chart: String,
}

impl<'a> CatalogTemplate<'a> {
    fn new(catalog: &'a Catalog, search: &'a str) -> Self {
        CatalogTemplate {
            products: filter_by_title(&catalog.products, search),
            total: catalog.products.len(),
            search,
            price_chart: format!("/static/{}", PRICE_CHART_FILE),
            rating_chart: format!("/static/{}", RATING_CHART_FILE),
        }
    }
}

#[derive(Deserialize)]
struct SearchForm {
    #[serde(default)]
    search: String,
}

#[get("/")]
pub async fn show_catalog(
    catalog: web::Data<Catalog>,
    query: web::Query<SearchForm>,
) -> HttpResponse {
    render_html(&CatalogTemplate::new(&catalog, &query.search))
}

#[post("/")]
pub async fn search_catalog(
    catalog: web::Data<Catalog>,
    form: web::Form<SearchForm>,
) -> HttpResponse {
    log::info!("Searching catalog for {:?}", form.search);
    render_html(&CatalogTemplate::new(&catalog, &form.search))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::header, test, web, App};

    use super::*;

    fn product(title: &str, price: f64) -> Product {
        Product {
            title: title.to_string(),
            price,
            rating: 4.5,
            description: format!("{} laptop", title),
        }
    }

    fn test_catalog() -> web::Data<Catalog> {
        web::Data::new(Catalog {
            products: vec![
                product("Lenovo ThinkPad", 1139.54),
                product("Asus VivoBook", 295.99),
                product("lenovo IdeaPad", 416.9),
            ],
        })
    }

    async fn body_of(req: test::TestRequest) -> String {
        let app = test::init_service(
            App::new()
                .app_data(test_catalog())
                .service(show_catalog)
                .service(search_catalog),
        )
        .await;
        let res = test::call_service(&app, req.to_request()).await;
        assert!(res.status().is_success());
        let body = test::read_body(res).await;
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[actix_web::test]
    async fn get_lists_every_product() {
        let body = body_of(test::TestRequest::get().uri("/")).await;

        assert!(body.contains("Lenovo ThinkPad"));
        assert!(body.contains("Asus VivoBook"));
        assert!(body.contains("lenovo IdeaPad"));
        assert!(body.contains("1139.54"));
        assert!(body.contains("416.90"));
        assert!(body.contains("Showing 3 of 3 products"));
        assert!(body.contains("price_distribution.svg"));
    }

    #[actix_web::test]
    async fn post_filters_by_title() {
        let req = test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("search=LENOVO");

        let body = body_of(req).await;

        assert!(body.contains("Lenovo ThinkPad"));
        assert!(body.contains("lenovo IdeaPad"));
        assert!(!body.contains("Asus VivoBook"));
        assert!(body.contains("Showing 2 of 3 products"));
        assert!(body.contains("value=\"LENOVO\""));
    }

    #[actix_web::test]
    async fn post_without_search_lists_every_product() {
        let req = test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("");

        let body = body_of(req).await;

        assert!(body.contains("Showing 3 of 3 products"));
    }

    #[actix_web::test]
    async fn get_with_query_filters_by_title() {
        let body = body_of(test::TestRequest::get().uri("/?search=asus")).await;

        assert!(body.contains("Asus VivoBook"));
        assert!(!body.contains("Lenovo ThinkPad"));
    }

    #[actix_web::test]
    async fn post_search_keeps_trailing_space() {
        let req = test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("search=pad+");

        let body = body_of(req).await;

        assert!(body.contains("Showing 0 of 3 products"));
        assert!(body.contains("value=\"pad \""));
    }
}
