pub mod config;
pub mod consorcios;
pub mod empresas;
pub mod exportar;
pub mod impresion;
pub mod obras;
pub mod reportes;
pub mod valorizaciones;

use crate::api::ApiError;

/// Traduce un 404 a un mensaje del recurso; el resto conserva su texto
fn mensaje_error(err: ApiError, no_encontrado: &str) -> String {
    if err.es_no_encontrado() {
        no_encontrado.to_string()
    } else {
        err.to_string()
    }
}
