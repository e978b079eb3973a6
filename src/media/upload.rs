use std::collections::HashMap;

use axum::http::HeaderMap;
use bytes::Bytes;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug)]
pub struct UploadedFile {
    pub field: String,
    pub filename: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        is_image_name(&self.filename)
    }
}

/// Extension check only; contents are not sniffed.
pub fn is_image_name(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Text fields plus any file parts of a multipart body.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|f| f.field == name)?;
        Some(self.files.swap_remove(index))
    }
}

pub fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("multipart/form-data"))
}

pub async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<UploadForm, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or("unknown").to_string();
        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("File read error: {e}"))?;
                form.files.push(UploadedFile {
                    field: name,
                    filename,
                    data,
                });
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Field read error: {e}"))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn splits_text_and_file_parts() {
        let body = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"order\"\r\n\r\n\
            2\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"well.JPG\"\r\n\
            Content-Type: image/jpeg\r\n\r\n\
            abc\r\n\
            --XYZ--\r\n";
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            "multipart/form-data; boundary=XYZ".parse().unwrap(),
        );
        assert!(is_multipart(&headers));

        let mut form = parse_multipart(&headers, Bytes::from(body)).await.unwrap();
        assert_eq!(form.field("order"), Some("2"));

        let file = form.take_file("image").unwrap();
        assert_eq!(file.filename, "well.JPG");
        assert_eq!(&file.data[..], b"abc");
        assert!(file.is_image());
        assert!(form.take_file("image").is_none());
    }
}
