//! HTTP API for certificate records.
//!
//! The provided routes are:
//! - `POST /api/certificates`: multipart/form-data create. Text fields carry the
//!   certificate (`certificateNumber`, `stoneType`, `carat`, `color`, `clarity`, `cut`
//!   are required; `grossWeight` and `notes` are optional) and an optional `file`
//!   part holds the stone photo. Returns `201` with the stored record.
//! - `GET /api/certificates`: every record, newest first.
//! - `DELETE /api/certificates`: removes every record. Bulk intake runs this before
//!   recreating a batch.
//! - `GET /api/certificates/verify/{number}`: public lookup by certificate number,
//!   `404 {"error": "Certificate not found"}` on a miss.
//! - `DELETE /api/certificates/{id}`: removes one record, `204` on success.

mod clear;
mod create;
mod delete;
mod list;
mod verify;

use actix_web::web::{delete, get, post, resource, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/certificates";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .service(
            resource("")
                .route(post().to(create::process))
                .route(get().to(list::process))
                .route(delete().to(clear::process)),
        )
        .route("/verify/{number}", get().to(verify::process))
        .route("/{id}", delete().to(delete::process))
}
