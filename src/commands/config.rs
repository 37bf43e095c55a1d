use crate::db::Database;
use std::collections::HashMap;

/// Claves que la aplicación reconoce
pub const CLAVES: [&str; 7] = [
    "api_url",
    "api_token",
    "api_timeout_segundos",
    "igv_porcentaje",
    "nombre_entidad",
    "moneda",
    "directorio_fuentes",
];

fn validar_valor(clave: &str, valor: &str) -> Result<(), String> {
    match clave {
        "api_url" => {
            if !(valor.starts_with("http://") || valor.starts_with("https://")) {
                return Err("api_url debe iniciar con http:// o https://".to_string());
            }
        }
        "api_timeout_segundos" => {
            let segundos: u64 = valor
                .parse()
                .map_err(|_| "api_timeout_segundos debe ser un número entero".to_string())?;
            if segundos == 0 {
                return Err("api_timeout_segundos debe ser mayor a 0".to_string());
            }
        }
        "igv_porcentaje" => {
            let pct: f64 = valor
                .parse()
                .map_err(|_| "igv_porcentaje debe ser numérico".to_string())?;
            if !(0.0..=100.0).contains(&pct) {
                return Err("igv_porcentaje debe estar entre 0 y 100".to_string());
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn obtener_config(db: &Database) -> Result<HashMap<String, String>, String> {
    db.obtener_config()
}

/// Guarda la configuración. Los cambios del API aplican al siguiente inicio.
pub fn guardar_config(db: &Database, configs: HashMap<String, String>) -> Result<(), String> {
    for (clave, valor) in &configs {
        if !CLAVES.contains(&clave.as_str()) {
            return Err(format!("Clave de configuración desconocida: {}", clave));
        }
        validar_valor(clave, valor)?;
    }
    db.guardar_config(&configs)
}
