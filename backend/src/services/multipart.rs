use crate::error::ServiceError;
use actix_multipart::Multipart;
use futures_util::StreamExt;

/// A file part pulled out of a multipart body.
pub(crate) struct UploadedFile {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// Reads the part named `field_name` fully into memory.
///
/// Other parts are drained and ignored. Fails with `400` when the part is
/// missing, empty or larger than `max_bytes`.
pub(crate) async fn read_file_field(
    mut payload: Multipart,
    field_name: &str,
    max_bytes: usize,
) -> Result<UploadedFile, ServiceError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ServiceError::bad_request(format!("malformed multipart body: {}", e)))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some(field_name) || upload.is_some() {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| ServiceError::bad_request(e.to_string()))?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()));
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ServiceError::bad_request(e.to_string()))?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(ServiceError::bad_request(format!(
                    "`{}` exceeds the {} byte upload limit",
                    field_name, max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        upload = Some(UploadedFile { filename, bytes });
    }

    let upload = upload.ok_or_else(|| ServiceError::bad_request(format!("missing `{}` field", field_name)))?;
    if upload.bytes.is_empty() {
        return Err(ServiceError::bad_request(format!("`{}` is empty", field_name)));
    }
    Ok(upload)
}
