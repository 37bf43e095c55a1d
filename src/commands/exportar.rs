use super::valorizaciones::listar_valorizaciones;
use crate::models::{ContenidoReporte, Reporte, Valorizacion};
use crate::state::AppState;
use std::io::Write;
use tracing::info;

/// BOM UTF-8 para que Excel abra correctamente caracteres especiales
const BOM: &[u8] = b"\xEF\xBB\xBF";
/// Separador de columnas (punto y coma para Excel en español)
const SEP: &str = ";";

fn escapar_csv(valor: &str) -> String {
    if valor.contains(';') || valor.contains('"') || valor.contains('\n') || valor.contains('\r') {
        format!("\"{}\"", valor.replace('"', "\"\""))
    } else {
        valor.to_string()
    }
}

fn dinero(valor: f64) -> String {
    format!("{:.2}", valor)
}

/// Encabezados y filas tabulares de un reporte
pub fn tabla_reporte(reporte: &Reporte) -> (Vec<&'static str>, Vec<Vec<String>>) {
    match &reporte.contenido {
        ContenidoReporte::General(r) => {
            let mut filas = vec![
                vec!["Total obras".to_string(), r.total_obras.to_string()],
                vec!["Monto total ejecucion".to_string(), dinero(r.monto_total_ejecucion)],
                vec!["Monto total supervision".to_string(), dinero(r.monto_total_supervision)],
                vec!["Total valorizado".to_string(), dinero(r.total_valorizado)],
                vec!["Avance financiero promedio %".to_string(), dinero(r.avance_financiero_promedio)],
                vec!["Empresas activas".to_string(), r.total_empresas.to_string()],
                vec!["Consorcios activos".to_string(), r.total_consorcios.to_string()],
            ];
            for (estado, cantidad) in &r.obras_por_estado {
                filas.push(vec![format!("Obras {}", estado), cantidad.to_string()]);
            }
            (vec!["Indicador", "Valor"], filas)
        }
        ContenidoReporte::Obra(a) => {
            let filas = a
                .detalle
                .iter()
                .map(|f| {
                    vec![
                        f.numero.to_string(),
                        f.tipo.clone(),
                        f.periodo.clone(),
                        f.estado.clone(),
                        dinero(f.monto_bruto),
                        dinero(f.monto_neto),
                        dinero(f.acumulado),
                        dinero(f.avance_fisico_pct),
                    ]
                })
                .collect();
            (
                vec![
                    "Numero", "Tipo", "Periodo", "Estado", "Monto Bruto", "Monto Neto",
                    "Acumulado", "Avance Fisico %",
                ],
                filas,
            )
        }
        ContenidoReporte::Empresas(empresas) => {
            let filas = empresas
                .iter()
                .map(|e| {
                    vec![
                        e.ruc.clone(),
                        e.razon_social.clone(),
                        e.obras_como_contratista.to_string(),
                        e.obras_como_supervisor.to_string(),
                        dinero(e.monto_contratado),
                        dinero(e.monto_valorizado),
                    ]
                })
                .collect();
            (
                vec![
                    "RUC", "Razon Social", "Obras Contratista", "Obras Supervisor",
                    "Monto Contratado", "Monto Valorizado",
                ],
                filas,
            )
        }
        ContenidoReporte::Mensual(meses) => {
            let filas = meses
                .iter()
                .map(|m| {
                    vec![
                        m.periodo.clone(),
                        dinero(m.total_ejecucion),
                        dinero(m.total_supervision),
                        dinero(m.igv),
                        dinero(m.monto_neto),
                        m.num_valorizaciones.to_string(),
                    ]
                })
                .collect();
            (
                vec!["Periodo", "Ejecucion", "Supervision", "IGV", "Neto", "Valorizaciones"],
                filas,
            )
        }
    }
}

fn escribir_csv(ruta: &str, encabezados: &[&str], filas: &[Vec<String>]) -> Result<(), String> {
    let mut file = std::fs::File::create(ruta).map_err(|e| format!("Error creando {}: {}", ruta, e))?;
    file.write_all(BOM).map_err(|e| e.to_string())?;

    writeln!(file, "{}", encabezados.join(SEP)).map_err(|e| e.to_string())?;
    for fila in filas {
        let linea: Vec<String> = fila.iter().map(|v| escapar_csv(v)).collect();
        writeln!(file, "{}", linea.join(SEP)).map_err(|e| e.to_string())?;
    }

    Ok(())
}

pub fn exportar_reporte_csv(app: &AppState, reporte: &Reporte, ruta: &str) -> Result<String, String> {
    let (encabezados, filas) = tabla_reporte(reporte);
    escribir_csv(ruta, &encabezados, &filas)?;

    let tipo = serde_json::to_value(reporte.tipo)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    app.db.registrar_exportacion(&tipo, "csv", ruta)?;
    info!(ruta, filas = filas.len(), "reporte exportado a CSV");

    Ok(format!("{} filas exportadas", filas.len()))
}

fn filas_valorizaciones(valorizaciones: &[Valorizacion]) -> Vec<Vec<String>> {
    valorizaciones
        .iter()
        .map(|v| {
            vec![
                v.numero.to_string(),
                v.tipo.etiqueta().to_string(),
                v.periodo.clone(),
                v.estado.etiqueta().to_string(),
                dinero(v.monto_bruto),
                dinero(v.amortizacion_adelanto_directo),
                dinero(v.amortizacion_adelanto_materiales),
                dinero(v.retencion),
                dinero(v.penalidad),
                dinero(v.subtotal),
                dinero(v.igv),
                dinero(v.monto_neto),
                dinero(v.avance_fisico_pct),
                v.observaciones.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

pub async fn exportar_valorizaciones_csv(app: &AppState, obra_id: i64, ruta: &str) -> Result<String, String> {
    let mut valorizaciones = listar_valorizaciones(app, obra_id).await?;
    valorizaciones.sort_by(|a, b| a.periodo.cmp(&b.periodo).then(a.numero.cmp(&b.numero)));

    let encabezados = [
        "Numero", "Tipo", "Periodo", "Estado", "Monto Bruto", "Amort. Adelanto Directo",
        "Amort. Adelanto Materiales", "Retencion", "Penalidad", "Subtotal", "IGV", "Neto",
        "Avance Fisico %", "Observaciones",
    ];
    let filas = filas_valorizaciones(&valorizaciones);
    escribir_csv(ruta, &encabezados, &filas)?;
    app.db.registrar_exportacion("valorizaciones", "csv", ruta)?;

    Ok(format!("{} valorizaciones exportadas", filas.len()))
}
