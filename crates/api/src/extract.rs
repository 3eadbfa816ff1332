//! Request extractors that report failures as [`AppError`] JSON.

use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use cinecat_core::assets::Upload;
use cinecat_core::patch::PatchDocument;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// `Json<T>` whose rejection is a 400 [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// `Query<T>` whose rejection is a 400 [`AppError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// A create/replace payload with an optional attached asset.
///
/// Accepts either a plain JSON body, or `multipart/form-data` with the JSON
/// DTO in a part named `data` and the asset in any part carrying a file name.
#[derive(Debug)]
pub struct Payload<T> {
    pub data: T,
    pub upload: Option<Upload>,
}

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("multipart/form-data"));

        if !is_multipart {
            let axum::Json(data) = axum::Json::<T>::from_request(req, state).await?;
            return Ok(Self { data, upload: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let mut data: Option<T> = None;
        let mut upload: Option<Upload> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            if let Some(file_name) = field.file_name().map(str::to_string) {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                upload = Some(Upload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else if field.name() == Some("data") {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("Invalid 'data' part: {e}")))?;
                data = Some(parsed);
            }
            // Other text parts are ignored.
        }

        let data =
            data.ok_or_else(|| AppError::BadRequest("Missing required 'data' part".into()))?;
        Ok(Self { data, upload })
    }
}

/// Reject a `null` patch document before the store is touched.
pub fn require_patch(document: Option<PatchDocument>) -> Result<PatchDocument, AppError> {
    document.ok_or_else(|| AppError::BadRequest("A patch document is required".into()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use cinecat_core::patch::{PatchOp, PatchOperation};

    use super::*;

    #[test]
    fn null_document_is_a_bad_request() {
        assert_matches!(require_patch(None), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn present_document_passes_through() {
        let document = PatchDocument(vec![PatchOperation {
            op: PatchOp::Replace,
            path: "/name".into(),
            value: Some(serde_json::json!("Drama")),
        }]);
        let passed = require_patch(Some(document.clone())).unwrap();
        assert_eq!(passed, document);
    }
}
