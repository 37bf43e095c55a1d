pub mod schema;

use rusqlite::Connection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Almacén local: configuración y bitácora de exportaciones.
/// Los datos de obras viven en el API remoto.
pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn new(ruta: Option<&Path>) -> Result<Self, rusqlite::Error> {
        let db_path = ruta
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("OBRAS_DB").ok().map(PathBuf::from))
            .unwrap_or_else(Self::get_db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let conn = Connection::open(&db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        Self::desde_conexion(conn)
    }

    pub fn en_memoria() -> Result<Self, rusqlite::Error> {
        Self::desde_conexion(Connection::open_in_memory()?)
    }

    fn desde_conexion(conn: Connection) -> Result<Self, rusqlite::Error> {
        schema::create_tables(&conn)?;
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    fn get_db_path() -> PathBuf {
        let mut path = dirs_next().unwrap_or_else(|| PathBuf::from("."));
        path.push("obras-control.db");
        path
    }

    pub fn obtener_config(&self) -> Result<HashMap<String, String>, String> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM config")
            .map_err(|e| e.to_string())?;

        let config = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(|e| e.to_string())?
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(|e| e.to_string())?;

        Ok(config)
    }

    pub fn guardar_config(&self, configs: &HashMap<String, String>) -> Result<(), String> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;

        for (key, value) in configs {
            conn.execute(
                "INSERT OR REPLACE INTO config (key, value) VALUES (?1, ?2)",
                rusqlite::params![key, value],
            )
            .map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    pub fn registrar_exportacion(&self, tipo_reporte: &str, formato: &str, ruta: &str) -> Result<(), String> {
        let conn = self.conn.lock().map_err(|e| e.to_string())?;
        conn.execute(
            "INSERT INTO exportaciones (tipo_reporte, formato, ruta) VALUES (?1, ?2, ?3)",
            rusqlite::params![tipo_reporte, formato, ruta],
        )
        .map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Directorio de datos de la aplicación
fn dirs_next() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("LOCALAPPDATA")
            .ok()
            .map(|p| PathBuf::from(p).join("ObrasControl"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".obras-control"))
    }
}
