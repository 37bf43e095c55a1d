//! Cliente HTTP del API REST de obras.
//!
//! Todas las respuestas llegan envueltas en `{ success, data, message }`.

mod error;

pub use error::ApiError;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

pub const API_URL_POR_DEFECTO: &str = "http://localhost:3000/api";
pub const TIMEOUT_POR_DEFECTO: u64 = 30;

/// Sobre estándar de respuesta del backend
#[derive(Debug, Serialize, Deserialize)]
pub struct RespuestaApi<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigApi {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_segundos: u64,
}

impl Default for ConfigApi {
    fn default() -> Self {
        ConfigApi {
            base_url: API_URL_POR_DEFECTO.to_string(),
            token: None,
            timeout_segundos: TIMEOUT_POR_DEFECTO,
        }
    }
}

impl ConfigApi {
    /// Construye la configuración a partir de la tabla `config`
    pub fn desde_config(config: &HashMap<String, String>) -> Self {
        let base_url = config
            .get("api_url")
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| API_URL_POR_DEFECTO.to_string());
        let token = config.get("api_token").filter(|v| !v.is_empty()).cloned();
        let timeout_segundos = config
            .get("api_timeout_segundos")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|t| *t > 0)
            .unwrap_or(TIMEOUT_POR_DEFECTO);

        ConfigApi {
            base_url,
            token,
            timeout_segundos,
        }
    }
}

pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    timeout_segundos: u64,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ConfigApi) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Configuracion(format!(
                "la URL del API debe iniciar con http:// o https:// ({})",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_segundos))
            .build()
            .map_err(|e| ApiError::Configuracion(format!("Error creando cliente HTTP: {}", e)))?;

        Ok(ApiClient {
            base_url,
            token: config.token,
            timeout_segundos: config.timeout_segundos,
            http,
        })
    }

    fn url(&self, ruta: &str) -> String {
        format!("{}/{}", self.base_url, ruta.trim_start_matches('/'))
    }

    fn preparar(&self, metodo: reqwest::Method, ruta: &str) -> reqwest::RequestBuilder {
        let url = self.url(ruta);
        debug!(%metodo, %url, "solicitud al API");
        let req = self
            .http
            .request(metodo, url)
            .header("Accept", "application/json");
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, ruta: &str) -> Result<T, ApiError> {
        let req = self.preparar(reqwest::Method::GET, ruta);
        self.enviar::<T>(req).await?.ok_or(ApiError::SinDatos)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, ruta: &str, cuerpo: &B) -> Result<T, ApiError> {
        let req = self.preparar(reqwest::Method::POST, ruta).json(cuerpo);
        self.enviar::<T>(req).await?.ok_or(ApiError::SinDatos)
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, ruta: &str, cuerpo: &B) -> Result<T, ApiError> {
        let req = self.preparar(reqwest::Method::PUT, ruta).json(cuerpo);
        self.enviar::<T>(req).await?.ok_or(ApiError::SinDatos)
    }

    /// DELETE admite respuestas sin `data`
    pub async fn delete(&self, ruta: &str) -> Result<(), ApiError> {
        let req = self.preparar(reqwest::Method::DELETE, ruta);
        self.enviar::<serde_json::Value>(req).await?;
        Ok(())
    }

    async fn enviar<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<Option<T>, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::desde_reqwest(e, self.timeout_segundos))?;

        let status = resp.status();
        let cuerpo = resp
            .text()
            .await
            .map_err(|e| ApiError::desde_reqwest(e, self.timeout_segundos))?;

        if !status.is_success() {
            let mensaje = serde_json::from_str::<RespuestaApi<serde_json::Value>>(&cuerpo)
                .ok()
                .and_then(|r| r.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("Error del servidor (HTTP {})", status.as_u16()));
            warn!(status = status.as_u16(), %mensaje, "el API respondió con error");
            return Err(ApiError::Http {
                status: status.as_u16(),
                mensaje,
            });
        }

        let respuesta: RespuestaApi<T> =
            serde_json::from_str(&cuerpo).map_err(|e| ApiError::Respuesta(e.to_string()))?;

        if !respuesta.success {
            let mensaje = respuesta
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "El servidor rechazó la operación".to_string());
            warn!(%mensaje, "operación rechazada por el API");
            return Err(ApiError::Rechazada(mensaje));
        }

        Ok(respuesta.data)
    }
}
