use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Interview Insights API is running",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "api": crate::constants::API_PREFIX
    }))
}
