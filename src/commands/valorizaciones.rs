use super::mensaje_error;
use super::obras::obtener_obra;
use crate::calculo::{self, DesgloseValorizacion, EntradaCalculo, ParametrosCalculo};
use crate::models::{EstadoObra, EstadoValorizacion, NuevaValorizacion, Obra, TipoValorizacion, Valorizacion};
use crate::state::{self, AppState};
use crate::validacion;
use tracing::info;

const RUTA: &str = "valorizaciones";

/// Consulta las valorizaciones de una obra y las deja como listado actual
pub async fn listar_valorizaciones(app: &AppState, obra_id: i64) -> Result<Vec<Valorizacion>, String> {
    state::refrescar(&app.valorizaciones, || async {
        app.api
            .get::<Vec<Valorizacion>>(&format!("{}?obra_id={}", RUTA, obra_id))
            .await
            .map_err(|e| e.to_string())
    })
    .await
}

/// Todas las valorizaciones, para los reportes consolidados
pub async fn listar_todas_valorizaciones(app: &AppState) -> Result<Vec<Valorizacion>, String> {
    app.api
        .get::<Vec<Valorizacion>>(RUTA)
        .await
        .map_err(|e| e.to_string())
}

pub async fn obtener_valorizacion(app: &AppState, id: i64) -> Result<Valorizacion, String> {
    app.api
        .get::<Valorizacion>(&format!("{}/{}", RUTA, id))
        .await
        .map_err(|e| mensaje_error(e, "Valorización no encontrada"))
}

fn monto_contratado(obra: &Obra, tipo: TipoValorizacion) -> f64 {
    match tipo {
        TipoValorizacion::Ejecucion => obra.monto_ejecucion,
        TipoValorizacion::Supervision => obra.monto_supervision,
    }
}

/// Reglas que dependen de la obra y de sus otras valorizaciones.
/// `excluir_id` es la valorización que se está corrigiendo.
fn verificar_contra_obra(
    obra: &Obra,
    existentes: &[Valorizacion],
    nueva: &NuevaValorizacion,
    excluir_id: Option<i64>,
) -> Result<(), String> {
    if matches!(obra.estado, EstadoObra::Planificada | EstadoObra::Liquidada) {
        return Err(format!(
            "No se puede valorizar una obra en estado {}",
            obra.estado.etiqueta()
        ));
    }

    if existentes.iter().any(|v| {
        v.obra_id == nueva.obra_id
            && v.tipo == nueva.tipo
            && v.periodo == nueva.periodo
            && v.id != excluir_id
    }) {
        return Err(format!(
            "Ya existe una valorización de {} para el periodo {}",
            nueva.tipo.etiqueta().to_lowercase(),
            nueva.periodo
        ));
    }

    let contratado = monto_contratado(obra, nueva.tipo);
    let acumulado = calculo::bruto_acumulado(existentes, nueva.obra_id, nueva.tipo, excluir_id);
    if acumulado + nueva.monto_bruto > contratado + 0.005 {
        return Err(format!(
            "El acumulado valorizado ({:.2}) superaría el monto contratado ({:.2})",
            acumulado + nueva.monto_bruto,
            contratado
        ));
    }

    Ok(())
}

fn desglosar(
    app: &AppState,
    obra: &Obra,
    existentes: &[Valorizacion],
    nueva: &NuevaValorizacion,
    excluir_id: Option<i64>,
) -> DesgloseValorizacion {
    let saldo = calculo::saldo_adelanto_directo(obra, existentes, excluir_id);
    let params = ParametrosCalculo::para_obra(obra, nueva.tipo, app.igv_porcentaje(), Some(saldo));
    let entrada = EntradaCalculo {
        monto_bruto: nueva.monto_bruto,
        amortizacion_adelanto_materiales: nueva.amortizacion_adelanto_materiales,
        penalidad: nueva.penalidad,
    };
    calculo::calcular_valorizacion(&entrada, &params)
}

/// Vista previa del cálculo sin registrar nada
pub async fn calcular_valorizacion(app: &AppState, nueva: &NuevaValorizacion) -> Result<DesgloseValorizacion, String> {
    validacion::validar_valorizacion(nueva)?;
    let obra = obtener_obra(app, nueva.obra_id).await?;
    let existentes = listar_valorizaciones(app, nueva.obra_id).await?;
    Ok(desglosar(app, &obra, &existentes, nueva, None))
}

pub async fn registrar_valorizacion(app: &AppState, nueva: NuevaValorizacion) -> Result<Valorizacion, String> {
    validacion::validar_valorizacion(&nueva).map_err(|e| state::registrar_error(&app.valorizaciones, e))?;

    let obra = obtener_obra(app, nueva.obra_id).await?;
    let existentes = listar_valorizaciones(app, nueva.obra_id).await?;
    verificar_contra_obra(&obra, &existentes, &nueva, None)
        .map_err(|e| state::registrar_error(&app.valorizaciones, e))?;

    let desglose = desglosar(app, &obra, &existentes, &nueva, None);
    let mut valorizacion = Valorizacion {
        id: None,
        obra_id: nueva.obra_id,
        numero: calculo::siguiente_numero(&existentes, nueva.obra_id, nueva.tipo),
        tipo: nueva.tipo,
        periodo: nueva.periodo,
        fecha_inicio: nueva.fecha_inicio,
        fecha_fin: nueva.fecha_fin,
        monto_bruto: 0.0,
        amortizacion_adelanto_directo: 0.0,
        amortizacion_adelanto_materiales: 0.0,
        retencion: 0.0,
        penalidad: 0.0,
        subtotal: 0.0,
        igv: 0.0,
        monto_neto: 0.0,
        avance_fisico_pct: nueva.avance_fisico_pct,
        estado: EstadoValorizacion::Borrador,
        observaciones: nueva.observaciones,
        fecha_presentacion: None,
    };
    desglose.aplicar(&mut valorizacion);

    let creada: Valorizacion = app
        .api
        .post(RUTA, &valorizacion)
        .await
        .map_err(|e| state::registrar_error(&app.valorizaciones, e.to_string()))?;
    info!(
        obra_id = creada.obra_id,
        numero = creada.numero,
        neto = creada.monto_neto,
        "valorización registrada"
    );

    listar_valorizaciones(app, creada.obra_id).await.ok();
    Ok(creada)
}

/// Corrige montos o datos de una valorización en borrador u observada;
/// los montos se recalculan
pub async fn actualizar_valorizacion(app: &AppState, id: i64, cambios: NuevaValorizacion) -> Result<Valorizacion, String> {
    let mut valorizacion = obtener_valorizacion(app, id).await?;
    if !valorizacion.estado.es_editable() {
        return Err(state::registrar_error(
            &app.valorizaciones,
            format!(
                "Una valorización {} no puede modificarse",
                valorizacion.estado.etiqueta().to_lowercase()
            ),
        ));
    }
    if cambios.obra_id != valorizacion.obra_id || cambios.tipo != valorizacion.tipo {
        return Err("No se puede cambiar la obra ni el tipo de una valorización".to_string());
    }
    validacion::validar_valorizacion(&cambios).map_err(|e| state::registrar_error(&app.valorizaciones, e))?;

    let obra = obtener_obra(app, valorizacion.obra_id).await?;
    let existentes = listar_valorizaciones(app, valorizacion.obra_id).await?;
    verificar_contra_obra(&obra, &existentes, &cambios, Some(id))
        .map_err(|e| state::registrar_error(&app.valorizaciones, e))?;

    let desglose = desglosar(app, &obra, &existentes, &cambios, Some(id));
    valorizacion.periodo = cambios.periodo;
    valorizacion.fecha_inicio = cambios.fecha_inicio;
    valorizacion.fecha_fin = cambios.fecha_fin;
    valorizacion.avance_fisico_pct = cambios.avance_fisico_pct;
    valorizacion.observaciones = cambios.observaciones;
    desglose.aplicar(&mut valorizacion);

    let actualizada: Valorizacion = app
        .api
        .put(&format!("{}/{}", RUTA, id), &valorizacion)
        .await
        .map_err(|e| state::registrar_error(&app.valorizaciones, e.to_string()))?;
    info!(id, "valorización actualizada");

    listar_valorizaciones(app, actualizada.obra_id).await.ok();
    Ok(actualizada)
}

pub async fn cambiar_estado_valorizacion(
    app: &AppState,
    id: i64,
    nuevo_estado: EstadoValorizacion,
    observaciones: Option<String>,
) -> Result<Valorizacion, String> {
    let mut valorizacion = obtener_valorizacion(app, id).await?;

    if !valorizacion.estado.puede_pasar_a(nuevo_estado) {
        return Err(state::registrar_error(
            &app.valorizaciones,
            format!(
                "No se puede pasar de {} a {}",
                valorizacion.estado.etiqueta(),
                nuevo_estado.etiqueta()
            ),
        ));
    }
    if nuevo_estado == EstadoValorizacion::Observada && observaciones.as_deref().map_or(true, |o| o.trim().is_empty()) {
        return Err("Debe indicar las observaciones de la valorización".to_string());
    }

    if nuevo_estado == EstadoValorizacion::Presentada {
        valorizacion.fecha_presentacion = Some(chrono::Local::now().date_naive());
    }
    if observaciones.is_some() {
        valorizacion.observaciones = observaciones;
    }
    let anterior = valorizacion.estado;
    valorizacion.estado = nuevo_estado;

    let actualizada: Valorizacion = app
        .api
        .put(&format!("{}/{}", RUTA, id), &valorizacion)
        .await
        .map_err(|e| state::registrar_error(&app.valorizaciones, e.to_string()))?;
    info!(
        id,
        desde = anterior.etiqueta(),
        hacia = nuevo_estado.etiqueta(),
        "estado de valorización actualizado"
    );

    listar_valorizaciones(app, actualizada.obra_id).await.ok();
    Ok(actualizada)
}

pub async fn eliminar_valorizacion(app: &AppState, id: i64) -> Result<(), String> {
    let valorizacion = obtener_valorizacion(app, id).await?;
    if !valorizacion.estado.es_editable() {
        return Err(state::registrar_error(
            &app.valorizaciones,
            "Solo se pueden eliminar valorizaciones en borrador u observadas".to_string(),
        ));
    }

    app.api
        .delete(&format!("{}/{}", RUTA, id))
        .await
        .map_err(|e| state::registrar_error(&app.valorizaciones, e.to_string()))?;
    info!(id, "valorización eliminada");

    listar_valorizaciones(app, valorizacion.obra_id).await.ok();
    Ok(())
}
