use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::ai_types::{ImageRequest, ImageResponse};
use crate::client::LlmClient;
use crate::error::LlmError;
use crate::provider::ImageProvider;

const IMAGE_SIZE: &str = "1024x1024";
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Raw image bytes plus their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl GeneratedImage {
    /// Encode as a `data:` URL usable directly as an image source.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

impl LlmClient {
    async fn download_image(&self, url: &str) -> Result<GeneratedImage, LlmError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::HttpStatus { code: status.as_u16(), body });
        }
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_IMAGE_MIME)
            .to_owned();
        let bytes = response.bytes().await?.to_vec();
        Ok(GeneratedImage { bytes, mime_type })
    }
}

#[async_trait]
impl ImageProvider for LlmClient {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, LlmError> {
        let request = ImageRequest {
            model: self.image_model.clone(),
            prompt: prompt.to_owned(),
            n: 1,
            size: IMAGE_SIZE.to_owned(),
        };
        let response: ImageResponse =
            self.post_json("/v1/images/generations", &request, "image generation response").await?;
        let datum = response.data.into_iter().next().ok_or(LlmError::EmptyResponse)?;

        if let Some(encoded) = datum.b64_json {
            let bytes = STANDARD.decode(encoded.trim()).map_err(|e| LlmError::Image(e.to_string()))?;
            if bytes.is_empty() {
                return Err(LlmError::Image("decoded image is empty".to_owned()));
            }
            return Ok(GeneratedImage { bytes, mime_type: DEFAULT_IMAGE_MIME.to_owned() });
        }
        match datum.url {
            Some(url) => self.download_image(&url).await,
            None => Err(LlmError::MissingField("data[0].b64_json".to_owned())),
        }
    }
}
