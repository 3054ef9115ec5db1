//! Google Imagen adapter for the image route.
//!
//! Calls `{base}/models/{model}:predict` and decodes the first prediction's
//! base64 payload. The API key is sent in the `x-goog-api-key` header and
//! wrapped in [`SecretString`] so it never reaches logs.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use sitewright_core::image::ImageGenerator;
use sitewright_types::error::ImageError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A 1x1 transparent PNG.
const TRANSPARENT_PIXEL_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

/// Bytes served in place of an image the upstream could not produce.
pub fn transparent_pixel() -> Vec<u8> {
    STANDARD.decode(TRANSPARENT_PIXEL_B64).unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [PredictInstance<'a>; 1],
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

/// Imagen `:predict` client.
pub struct ImagenGenerator {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl ImagenGenerator {
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!("{}/models/{}:predict", self.base_url, self.model)
    }
}

/// Decode the first prediction of a `:predict` response body.
fn decode_prediction(body: PredictResponse) -> Result<Vec<u8>, ImageError> {
    let encoded = body
        .predictions
        .into_iter()
        .find_map(|p| p.bytes_base64_encoded)
        .ok_or_else(|| ImageError::Provider("response carried no image".to_string()))?;
    STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| ImageError::Decode(e.to_string()))
}

impl ImageGenerator for ImagenGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageError> {
        let body = PredictRequest {
            instances: [PredictInstance { prompt }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9",
            },
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ImageError::Provider(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ImageError::Provider(format!("HTTP {status}: {error_body}")));
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| ImageError::Decode(format!("failed to parse response: {e}")))?;
        let bytes = decode_prediction(parsed)?;
        tracing::debug!(model = %self.model, bytes = bytes.len(), "image generated");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transparent_pixel_is_png() {
        let bytes = transparent_pixel();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_request_shape() {
        let body = PredictRequest {
            instances: [PredictInstance { prompt: "a latte" }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9",
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["instances"][0]["prompt"], "a latte");
        assert_eq!(json["parameters"]["sampleCount"], 1);
        assert_eq!(json["parameters"]["aspectRatio"], "16:9");
    }

    #[test]
    fn test_decode_prediction() {
        let body: PredictResponse = serde_json::from_str(&format!(
            r#"{{"predictions":[{{"bytesBase64Encoded":"{TRANSPARENT_PIXEL_B64}","mimeType":"image/png"}}]}}"#
        ))
        .unwrap();
        assert_eq!(decode_prediction(body).unwrap(), transparent_pixel());
    }

    #[test]
    fn test_decode_prediction_errors() {
        let empty: PredictResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(decode_prediction(empty), Err(ImageError::Provider(_))));

        let garbage: PredictResponse =
            serde_json::from_str(r#"{"predictions":[{"bytesBase64Encoded":"!!!"}]}"#).unwrap();
        assert!(matches!(decode_prediction(garbage), Err(ImageError::Decode(_))));
    }

    #[test]
    fn test_url() {
        let generator = ImagenGenerator::new(SecretString::from("k"), "imagen-4".to_string())
            .with_base_url("http://localhost:9000/".to_string());
        assert_eq!(generator.url(), "http://localhost:9000/models/imagen-4:predict");
    }
}
