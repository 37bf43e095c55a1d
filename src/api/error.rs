use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("La solicitud excedió el tiempo de espera ({0}s)")]
    TiempoAgotado(u64),

    #[error("No se pudo conectar con el servidor: {0}")]
    Conexion(String),

    #[error("{mensaje}")]
    Http { status: u16, mensaje: String },

    #[error("{0}")]
    Rechazada(String),

    #[error("Respuesta inválida del servidor: {0}")]
    Respuesta(String),

    #[error("El servidor no devolvió datos")]
    SinDatos,

    #[error("Configuración inválida: {0}")]
    Configuracion(String),
}

impl ApiError {
    pub fn desde_reqwest(err: reqwest::Error, timeout_segundos: u64) -> Self {
        if err.is_timeout() {
            ApiError::TiempoAgotado(timeout_segundos)
        } else if err.is_decode() {
            ApiError::Respuesta(err.to_string())
        } else {
            ApiError::Conexion(err.to_string())
        }
    }

    pub fn es_no_encontrado(&self) -> bool {
        matches!(self, ApiError::Http { status: 404, .. })
    }
}
