use actix_web::{get, web, HttpResponse, Responder};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct ReadinessResponse {
    status: &'static str,
    database: &'static str,
}

/// LIVENESS CHECK
/// - No I/O
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

/// READINESS CHECK
/// - Checks the collection store is reachable
#[get("/ready")]
pub async fn readiness(db: web::Data<Arc<DatabaseConnection>>) -> impl Responder {
    let db_ok = db
        .execute(Statement::from_string(
            db.get_database_backend(),
            "SELECT 1",
        ))
        .await
        .is_ok();

    if db_ok {
        HttpResponse::Ok().json(ReadinessResponse {
            status: "ok",
            database: "ok",
        })
    } else {
        HttpResponse::ServiceUnavailable().json(ReadinessResponse {
            status: "unhealthy",
            database: "unhealthy",
        })
    }
}
