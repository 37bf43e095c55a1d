use super::consorcios::refrescar_consorcios;
use super::empresas::refrescar_empresas;
use super::obras::{obtener_obra, refrescar_obras};
use super::valorizaciones::{listar_todas_valorizaciones, listar_valorizaciones};
use crate::models::{ContenidoReporte, Reporte};
use crate::resumen;
use crate::state::AppState;
use tracing::info;

pub async fn reporte_general(app: &AppState) -> Result<Reporte, String> {
    let empresas = refrescar_empresas(app).await?;
    let consorcios = refrescar_consorcios(app).await?;
    let obras = refrescar_obras(app).await?;
    let valorizaciones = listar_todas_valorizaciones(app).await?;

    let activos = consorcios.iter().filter(|c| c.activo).count();
    let resumen = resumen::resumen_general(&obras, &valorizaciones, &empresas, activos);
    info!(obras = resumen.total_obras, "reporte general generado");

    Ok(Reporte::nuevo(
        "Resumen general de obras",
        ContenidoReporte::General(resumen),
    ))
}

pub async fn reporte_avance_obra(app: &AppState, obra_id: i64) -> Result<Reporte, String> {
    let obra = obtener_obra(app, obra_id).await?;
    let valorizaciones = listar_valorizaciones(app, obra_id).await?;

    let avance = resumen::avance_obra(&obra, &valorizaciones);
    Ok(Reporte::nuevo(
        format!("Avance de obra {} - {}", obra.codigo, obra.nombre),
        ContenidoReporte::Obra(avance),
    ))
}

pub async fn reporte_empresas(app: &AppState) -> Result<Reporte, String> {
    let empresas = refrescar_empresas(app).await?;
    let obras = refrescar_obras(app).await?;
    let valorizaciones = listar_todas_valorizaciones(app).await?;

    let filas = resumen::resumen_por_empresa(&empresas, &obras, &valorizaciones);
    Ok(Reporte::nuevo(
        "Obras y montos por empresa",
        ContenidoReporte::Empresas(filas),
    ))
}

pub async fn reporte_mensual(app: &AppState, anio: Option<i32>) -> Result<Reporte, String> {
    let valorizaciones = listar_todas_valorizaciones(app).await?;
    let filas = resumen::resumen_mensual(&valorizaciones, anio);

    let titulo = match anio {
        Some(a) => format!("Valorizaciones mensuales {}", a),
        None => "Valorizaciones mensuales".to_string(),
    };
    Ok(Reporte::nuevo(titulo, ContenidoReporte::Mensual(filas)))
}
