use super::mensaje_error;
use crate::models::Obra;
use crate::state::{self, AppState};
use crate::validacion;
use tracing::info;

const RUTA: &str = "obras";

pub async fn refrescar_obras(app: &AppState) -> Result<Vec<Obra>, String> {
    state::refrescar(&app.obras, || async {
        app.api
            .get::<Vec<Obra>>(RUTA)
            .await
            .map_err(|e| e.to_string())
    })
    .await
}

pub async fn listar_obras(app: &AppState) -> Result<Vec<Obra>, String> {
    refrescar_obras(app).await
}

pub async fn obtener_obra(app: &AppState, id: i64) -> Result<Obra, String> {
    app.api
        .get::<Obra>(&format!("{}/{}", RUTA, id))
        .await
        .map_err(|e| mensaje_error(e, "Obra no encontrada"))
}

/// Reglas del formulario más las referencias a empresas y el código único,
/// contra los listados ya cargados
fn verificar(app: &AppState, obra: &Obra) -> Result<(), String> {
    validacion::validar_obra(obra)?;

    let empresas = state::datos(&app.empresas)?;
    if !empresas.is_empty() {
        if let Some(contratista_id) = obra.contratista_id {
            let empresa = empresas
                .iter()
                .find(|e| e.id == Some(contratista_id))
                .ok_or("El contratista no está registrado")?;
            if !empresa.tipo.puede_ejecutar() {
                return Err(format!("{} no está registrada como contratista", empresa.razon_social));
            }
        }
        if let Some(supervisor_id) = obra.supervisor_id {
            let empresa = empresas
                .iter()
                .find(|e| e.id == Some(supervisor_id))
                .ok_or("El supervisor no está registrado")?;
            if !empresa.tipo.puede_supervisar() {
                return Err(format!("{} no está registrada como supervisora", empresa.razon_social));
            }
        }
    }

    let obras = state::datos(&app.obras)?;
    if obras
        .iter()
        .any(|o| o.codigo == obra.codigo && o.id != obra.id)
    {
        return Err(format!("Ya existe una obra con el código {}", obra.codigo));
    }

    Ok(())
}

pub async fn crear_obra(app: &AppState, mut obra: Obra) -> Result<Obra, String> {
    obra.id = None;
    verificar(app, &obra).map_err(|e| state::registrar_error(&app.obras, e))?;

    let creada: Obra = app
        .api
        .post(RUTA, &obra)
        .await
        .map_err(|e| state::registrar_error(&app.obras, e.to_string()))?;
    info!(codigo = %creada.codigo, "obra registrada");

    refrescar_obras(app).await.ok();
    Ok(creada)
}

pub async fn actualizar_obra(app: &AppState, obra: Obra) -> Result<Obra, String> {
    let id = obra.id.ok_or("ID requerido para actualizar")?;
    verificar(app, &obra).map_err(|e| state::registrar_error(&app.obras, e))?;

    let actualizada: Obra = app
        .api
        .put(&format!("{}/{}", RUTA, id), &obra)
        .await
        .map_err(|e| state::registrar_error(&app.obras, mensaje_error(e, "Obra no encontrada")))?;
    info!(id, "obra actualizada");

    refrescar_obras(app).await.ok();
    Ok(actualizada)
}

pub async fn eliminar_obra(app: &AppState, id: i64) -> Result<(), String> {
    app.api
        .delete(&format!("{}/{}", RUTA, id))
        .await
        .map_err(|e| state::registrar_error(&app.obras, mensaje_error(e, "Obra no encontrada")))?;
    info!(id, "obra eliminada");

    refrescar_obras(app).await.ok();
    Ok(())
}
