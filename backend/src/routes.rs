use std::io::Write;
use std::str::FromStr;

use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{Error, HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::error;
use serde::Serialize;
use shared::{ChatReply, ChatRequest, Language};

use crate::cache::ResultCache;
use crate::chat::ChatRelay;
use crate::inference::PredictError;
use crate::inference::resolver::InferenceResolver;
use crate::report;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: String) {
    cfg.service(web::resource("/predict").route(web::post().to(handle_predict)))
        .service(web::resource("/chat").route(web::post().to(handle_chat)))
        .service(web::resource("/download-report").route(web::get().to(download_report)))
        .service(Files::new("/", static_dir).index_file("index.html"));
}

async fn handle_predict(
    resolver: web::Data<InferenceResolver>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let mut image: Option<Vec<u8>> = None;
    let mut language_code: Option<String> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            data.write_all(&chunk)?;
        }

        match name.as_str() {
            "file" => image = Some(data),
            "language" => language_code = Some(String::from_utf8_lossy(&data).trim().to_string()),
            _ => {}
        }
    }

    let Some(image) = image else {
        return Ok(bad_request("missing multipart field \"file\""));
    };

    let language = match language_code.as_deref() {
        None | Some("") => Language::default(),
        Some(code) => match Language::from_str(code) {
            Ok(language) => language,
            Err(_) => {
                let err = PredictError::UnsupportedLanguage(code.to_string());
                return Ok(predict_error_response(&err));
            }
        },
    };

    match resolver.resolve(&image, language) {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => {
            error!("prediction failed: {e}");
            Ok(predict_error_response(&e))
        }
    }
}

async fn handle_chat(relay: web::Data<ChatRelay>, request: web::Json<ChatRequest>) -> HttpResponse {
    let outcome = relay.relay(&request.message).await;
    HttpResponse::Ok().json(ChatReply {
        reply: outcome.into_reply(),
    })
}

async fn download_report(cache: web::Data<ResultCache>) -> HttpResponse {
    let snapshot = cache.snapshot();
    match report::render(snapshot.as_ref()) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(
                    report::REPORT_FILENAME.to_string(),
                )],
            })
            .body(bytes),
        Err(e) => {
            error!("report rendering failed: {e}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "failed to render report".to_string(),
            })
        }
    }
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: message.to_string(),
    })
}

fn predict_error_response(err: &PredictError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    if err.is_client_error() {
        HttpResponse::BadRequest().json(body)
    } else {
        HttpResponse::InternalServerError().json(body)
    }
}
