use bytes::Bytes;

/// One field of a `multipart/form-data` body we build ourselves, since
/// providers hand the engine raw `UpstreamHttpRequest` bytes rather than a
/// client-library form object.
pub enum MultipartPart<'a> {
    Text {
        name: &'a str,
        value: String,
    },
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: Bytes,
    },
}

/// Encode `parts` as a single `multipart/form-data` body, returning the
/// `Content-Type` header value (with boundary) and the encoded bytes.
pub fn encode(parts: &[MultipartPart<'_>]) -> (String, Bytes) {
    let boundary = format!("gproxy-{}", uuid::Uuid::new_v4().simple());
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match part {
            MultipartPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            MultipartPart::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), Bytes::from(body))
}
