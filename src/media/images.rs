use std::path::PathBuf;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{
    constants::{IMAGE_EXTENSIONS, RECIPE_IMAGE_DIR},
    error::RecipeError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Decodes a `data:image/<ext>;base64,<payload>` envelope.
pub fn decode_image(data: &str) -> Result<DecodedImage, RecipeError> {
    let (format, payload) = data
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .ok_or_else(|| RecipeError::invalid("image must be a base64 encoded data:image URI"))?;

    let extension = format.to_lowercase();
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(RecipeError::invalid(format!(
            "unsupported image format {extension}"
        )));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_e| RecipeError::invalid("image payload is not valid base64"))?;
    if bytes.is_empty() {
        return Err(RecipeError::invalid("image payload is empty"));
    }

    Ok(DecodedImage { extension, bytes })
}

/// Writes recipe images below a media root and hands back their public URL.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    url: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, url: &str) -> Self {
        Self {
            root: root.into(),
            url: url.trim_end_matches('/').to_owned(),
        }
    }

    /// Decodes `data` and stores it, returning the URL of the stored file.
    pub async fn store(&self, data: &str) -> Result<String, RecipeError> {
        let image = decode_image(data)?;
        self.save(image).await
    }

    pub async fn save(&self, image: DecodedImage) -> Result<String, RecipeError> {
        let directory = self.root.join(RECIPE_IMAGE_DIR);
        tokio::fs::create_dir_all(&directory).await?;

        let file_name = format!("{}.{}", uuid::Uuid::new_v4(), image.extension);
        tokio::fs::write(directory.join(&file_name), &image.bytes).await?;
        log::trace!("> Stored image {file_name} ({} bytes)", image.bytes.len());

        Ok(format!("{}/{}/{}", self.url, RECIPE_IMAGE_DIR, file_name))
    }

    /// Removes a file previously returned by [`ImageStore::save`]. URLs outside
    /// this store are left alone; removal failures are only logged.
    pub async fn discard(&self, url: &str) {
        let prefix = format!("{}/{}/", self.url, RECIPE_IMAGE_DIR);
        let Some(file_name) = url.strip_prefix(&prefix) else {
            return;
        };
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.starts_with('.') {
            return;
        }

        let path = self.root.join(RECIPE_IMAGE_DIR).join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => log::trace!("> Discarded image {file_name}"),
            Err(e) => log::warn!("> Could not discard image {}: {e}", path.display()),
        }
    }
}
