use actix_web::{web, HttpResponse, Result};
use crate::controller::{Controller, Router};
use crate::models::{ApiResponse, RuleResult, UiInputs};

pub async fn handle_event(
    path: web::Path<String>,
    inputs: web::Json<UiInputs>,
    router: web::Data<Router>,
    controller: web::Data<Controller>,
) -> Result<HttpResponse> {
    let event = path.into_inner();

    match router.dispatch(&controller, &event, &inputs).await {
        None => {
            let response = ApiResponse::<Vec<RuleResult>>::error(format!("未知事件: {}", event));
            Ok(HttpResponse::NotFound().json(response))
        }
        Some(Ok(results)) => {
            let response = ApiResponse::success(results);
            Ok(HttpResponse::Ok().json(response))
        }
        Some(Err(e)) => {
            log::error!("处理事件 {} 失败: {:#}", event, e);
            let response = ApiResponse::<Vec<RuleResult>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/events/{event}", web::post().to(handle_event));
}
