//! 静态资源
//!
//! 从配置的目录读取文件，只允许单层文件名

use actix_web::{web, HttpResponse, Result};
use std::path::PathBuf;

/// 静态资源目录
#[derive(Debug, Clone)]
pub struct AssetsDir(pub PathBuf);

fn content_type(name: &str) -> &'static str {
    match name.rsplit('.').next().map(|ext| ext.to_ascii_lowercase()).as_deref() {
        Some("svg") => "image/svg+xml",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// 拒绝路径穿越和隐藏文件
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}

pub async fn get_asset(path: web::Path<String>, dir: web::Data<AssetsDir>) -> Result<HttpResponse> {
    let name = path.into_inner();
    if !is_safe_name(&name) {
        return Ok(HttpResponse::NotFound().finish());
    }

    match tokio::fs::read(dir.0.join(&name)).await {
        Ok(bytes) => Ok(HttpResponse::Ok().content_type(content_type(&name)).body(bytes)),
        Err(e) => {
            log::warn!("读取静态资源 {} 失败: {}", name, e);
            Ok(HttpResponse::NotFound().finish())
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/assets/{file}", web::get().to(get_asset));
}
