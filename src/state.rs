use crate::api::{ApiClient, ConfigApi};
use crate::db::Database;
use crate::models::{Consorcio, Empresa, Obra, Valorizacion};
use serde::Serialize;
use std::future::Future;
use std::sync::Mutex;
use tracing::warn;

/// Copia local de una colección del API con su estado de carga
#[derive(Debug, Clone, Serialize)]
pub struct Listado<T> {
    pub datos: Vec<T>,
    pub cargando: bool,
    pub error: Option<String>,
}

impl<T> Default for Listado<T> {
    fn default() -> Self {
        Listado {
            datos: Vec::new(),
            cargando: false,
            error: None,
        }
    }
}

pub struct AppState {
    pub db: Database,
    pub api: ApiClient,
    pub empresas: Mutex<Listado<Empresa>>,
    pub consorcios: Mutex<Listado<Consorcio>>,
    pub obras: Mutex<Listado<Obra>>,
    /// Valorizaciones de la última obra consultada
    pub valorizaciones: Mutex<Listado<Valorizacion>>,
}

impl AppState {
    pub fn new(db: Database, api: ApiClient) -> Self {
        AppState {
            db,
            api,
            empresas: Mutex::new(Listado::default()),
            consorcios: Mutex::new(Listado::default()),
            obras: Mutex::new(Listado::default()),
            valorizaciones: Mutex::new(Listado::default()),
        }
    }

    /// Abre la base local y arma el cliente del API según la configuración
    /// guardada. `api_url` tiene prioridad sobre la configuración.
    pub fn iniciar(db: Database, api_url: Option<String>) -> Result<Self, String> {
        let config = db.obtener_config()?;
        let mut config_api = ConfigApi::desde_config(&config);

        if let Ok(url) = std::env::var("OBRAS_API_URL") {
            if !url.is_empty() {
                config_api.base_url = url;
            }
        }
        if let Ok(token) = std::env::var("OBRAS_API_TOKEN") {
            if !token.is_empty() {
                config_api.token = Some(token);
            }
        }
        if let Some(url) = api_url {
            config_api.base_url = url;
        }

        let api = ApiClient::new(config_api).map_err(|e| e.to_string())?;
        Ok(AppState::new(db, api))
    }

    /// Porcentaje de IGV configurado (18 si no es válido)
    pub fn igv_porcentaje(&self) -> f64 {
        self.db
            .obtener_config()
            .ok()
            .and_then(|c| c.get("igv_porcentaje").and_then(|v| v.parse::<f64>().ok()))
            .filter(|v| (0.0..=100.0).contains(v))
            .unwrap_or(crate::calculo::IGV_PORCENTAJE)
    }
}

/// Recarga un listado: marca la carga, consulta y guarda datos o error.
/// El candado nunca se mantiene durante la espera de la red.
pub async fn refrescar<T, F, Fut>(listado: &Mutex<Listado<T>>, consulta: F) -> Result<Vec<T>, String>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, String>>,
{
    {
        let mut guard = listado.lock().map_err(|e| e.to_string())?;
        guard.cargando = true;
        guard.error = None;
    }

    let resultado = consulta().await;

    let mut guard = listado.lock().map_err(|e| e.to_string())?;
    guard.cargando = false;
    match resultado {
        Ok(datos) => {
            guard.datos = datos.clone();
            Ok(datos)
        }
        Err(e) => {
            warn!(error = %e, "no se pudo recargar el listado");
            guard.error = Some(e.clone());
            Err(e)
        }
    }
}

/// Guarda el error de una operación fallida en el listado y lo retorna
pub fn registrar_error<T>(listado: &Mutex<Listado<T>>, error: String) -> String {
    if let Ok(mut guard) = listado.lock() {
        guard.error = Some(error.clone());
    }
    error
}

/// Copia de los datos en memoria del listado
pub fn datos<T: Clone>(listado: &Mutex<Listado<T>>) -> Result<Vec<T>, String> {
    let guard = listado.lock().map_err(|e| e.to_string())?;
    Ok(guard.datos.clone())
}
