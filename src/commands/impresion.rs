use crate::models::Reporte;
use crate::printing;
use crate::state::AppState;
use tracing::info;

/// Genera el PDF del reporte y lo guarda en `ruta`
pub fn imprimir_reporte_pdf(app: &AppState, reporte: &Reporte, ruta: &str) -> Result<String, String> {
    let config = app.db.obtener_config()?;
    let pdf_bytes = printing::generar_reporte_pdf(reporte, &config)?;

    std::fs::write(ruta, &pdf_bytes).map_err(|e| format!("Error guardando PDF: {}", e))?;

    let tipo = serde_json::to_value(reporte.tipo)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    app.db.registrar_exportacion(&tipo, "pdf", ruta)?;
    info!(ruta, bytes = pdf_bytes.len(), "reporte PDF generado");

    Ok(ruta.to_string())
}
