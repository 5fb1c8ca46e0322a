//! Route handlers and status mapping.
//!
//! | Route                          | Success | Missing material/item |
//! |--------------------------------|---------|-----------------------|
//! | `POST /guide`                  | 201     | -                     |
//! | `GET /materials`               | 200     | -                     |
//! | `GET /{material}/items`        | 200     | 404                   |
//! | `GET /{material}/{item}/guide` | 200     | 404                   |
//! | `PATCH /{material}/{item}/guide` | 200   | 400                   |
//! | `DELETE /{material}/{item}/guide` | 204  | 400                   |
//!
//! Empty guidelines on `POST` and undecodable bodies are 400; store failures
//! are 500. `PATCH` stores its body as given, empty included.

use log::debug;
use recycle_guide_core::{DocumentStore, GuideError, GuideService, RecycleGuide};
use serde::{Deserialize, Serialize};

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Code returned when a request body cannot be decoded.
pub const INVALID_FIELD_CODE: &str = "INVALID_FIELD";

/// Transport-neutral response: status code plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiResponse {
    fn empty(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    fn text(body: String) -> Self {
        Self {
            status: STATUS_OK,
            body,
        }
    }

    fn json_list(items: &[String]) -> Self {
        match serde_json::to_string(items) {
            Ok(body) => Self {
                status: STATUS_OK,
                body,
            },
            Err(err) => Self::error(STATUS_INTERNAL_ERROR, "SERIALIZATION_ERROR", err.to_string()),
        }
    }

    fn error(status: u16, code: &str, message: impl Into<String>) -> Self {
        let body = ErrorBody {
            code: code.to_string(),
            message: message.into(),
        };
        Self {
            status,
            // An ErrorBody of two strings always serializes.
            body: serde_json::to_string(&body).unwrap_or_else(|_| code.to_string()),
        }
    }

    /// Whether the status is below 400.
    pub fn is_success(&self) -> bool {
        self.status < STATUS_BAD_REQUEST
    }
}

/// Route handlers over one shared guide service.
pub struct GuideController<S: DocumentStore> {
    service: GuideService<S>,
}

impl<S: DocumentStore> GuideController<S> {
    pub fn new(service: GuideService<S>) -> Self {
        Self { service }
    }

    /// `POST /guide` with a JSON `{material, item, guideline}` body.
    pub fn post_guide(&self, body: &str) -> ApiResponse {
        let guide = match serde_json::from_str::<RecycleGuide>(body) {
            Ok(guide) => guide,
            Err(err) => {
                return respond(
                    "post_guide",
                    ApiResponse::error(STATUS_BAD_REQUEST, INVALID_FIELD_CODE, err.to_string()),
                );
            }
        };
        let response = match self.service.add_guide(&guide) {
            Ok(()) => ApiResponse::empty(STATUS_CREATED),
            Err(err) => error_response(&err, STATUS_BAD_REQUEST),
        };
        respond("post_guide", response)
    }

    /// `GET /materials`
    pub fn get_materials(&self) -> ApiResponse {
        let response = match self.service.get_materials() {
            Ok(materials) => ApiResponse::json_list(&materials),
            Err(err) => error_response(&err, STATUS_INTERNAL_ERROR),
        };
        respond("get_materials", response)
    }

    /// `GET /{material}/items`
    pub fn get_items(&self, material: &str) -> ApiResponse {
        let response = match self.service.get_items(material) {
            Ok(items) => ApiResponse::json_list(&items),
            Err(err) => error_response(&err, STATUS_NOT_FOUND),
        };
        respond("get_items", response)
    }

    /// `GET /{material}/{item}/guide`, returning the guideline as plain text.
    pub fn get_guideline(&self, material: &str, item: &str) -> ApiResponse {
        let response = match self.service.get_guideline(material, item) {
            Ok(guideline) => ApiResponse::text(guideline),
            Err(err) => error_response(&err, STATUS_NOT_FOUND),
        };
        respond("get_guideline", response)
    }

    /// `PATCH /{material}/{item}/guide` with the new guideline as raw body.
    pub fn patch_guideline(&self, material: &str, item: &str, body: &str) -> ApiResponse {
        let response = match self.service.update_guideline(material, item, body) {
            Ok(()) => ApiResponse::empty(STATUS_OK),
            Err(err) => error_response(&err, STATUS_BAD_REQUEST),
        };
        respond("patch_guideline", response)
    }

    /// `DELETE /{material}/{item}/guide`
    pub fn delete_guide(&self, material: &str, item: &str) -> ApiResponse {
        let response = match self.service.delete_guide(material, item) {
            Ok(()) => ApiResponse::empty(STATUS_NO_CONTENT),
            Err(err) => error_response(&err, STATUS_BAD_REQUEST),
        };
        respond("delete_guide", response)
    }
}

/// Maps a guide error; `missing_status` applies to unknown material/item.
fn error_response(err: &GuideError, missing_status: u16) -> ApiResponse {
    let status = match err {
        GuideError::EmptyGuideline => STATUS_BAD_REQUEST,
        GuideError::NoSuchMaterial(_) | GuideError::NoSuchItem { .. } => missing_status,
        GuideError::Database(_) => STATUS_INTERNAL_ERROR,
    };
    ApiResponse::error(status, err.code(), err.to_string())
}

fn respond(route: &str, response: ApiResponse) -> ApiResponse {
    debug!(
        "event=api_response module=api route={route} status={}",
        response.status
    );
    response
}
