use rusqlite::Connection;

pub fn create_tables(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        -- Configuración local de la aplicación
        CREATE TABLE IF NOT EXISTS config (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Registro de reportes exportados
        CREATE TABLE IF NOT EXISTS exportaciones (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tipo_reporte TEXT NOT NULL,
            formato TEXT NOT NULL,
            ruta TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        -- Configuración inicial
        INSERT OR IGNORE INTO config (key, value) VALUES ('api_url', 'http://localhost:3000/api');
        INSERT OR IGNORE INTO config (key, value) VALUES ('api_token', '');
        INSERT OR IGNORE INTO config (key, value) VALUES ('api_timeout_segundos', '30');
        INSERT OR IGNORE INTO config (key, value) VALUES ('igv_porcentaje', '18');
        INSERT OR IGNORE INTO config (key, value) VALUES ('nombre_entidad', '');
        INSERT OR IGNORE INTO config (key, value) VALUES ('moneda', 'PEN');
        INSERT OR IGNORE INTO config (key, value) VALUES ('directorio_fuentes', 'fonts');
        ",
    )?;

    Ok(())
}
