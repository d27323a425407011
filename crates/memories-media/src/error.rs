use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Uploaded file is not a decodable image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Upload name {0} is already taken")]
    NameTaken(String),

    #[error("Failed to encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),
}

impl MediaError {
    /// True when the upload itself was at fault rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MediaError::Decode(_) | MediaError::Encode(image::ImageError::Unsupported(_))
        )
    }
}
