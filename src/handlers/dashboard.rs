use actix_web::{http::header::ContentType, web, HttpResponse, Result};
use chrono::Utc;
use crate::controller::view;

pub async fn index() -> Result<HttpResponse> {
    let html = view::page(Utc::now().date_naive());
    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(html))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_index_serves_page() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("id=\"dropdown_tickers\""));
        assert!(html.contains("id=\"forecast-content\""));
    }
}
