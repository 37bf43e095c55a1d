use super::mensaje_error;
use crate::models::Consorcio;
use crate::state::{self, AppState};
use crate::validacion;
use tracing::info;

const RUTA: &str = "consorcios";

pub async fn refrescar_consorcios(app: &AppState) -> Result<Vec<Consorcio>, String> {
    state::refrescar(&app.consorcios, || async {
        app.api
            .get::<Vec<Consorcio>>(RUTA)
            .await
            .map_err(|e| e.to_string())
    })
    .await
}

pub async fn listar_consorcios(app: &AppState) -> Result<Vec<Consorcio>, String> {
    refrescar_consorcios(app).await
}

pub async fn obtener_consorcio(app: &AppState, id: i64) -> Result<Consorcio, String> {
    app.api
        .get::<Consorcio>(&format!("{}/{}", RUTA, id))
        .await
        .map_err(|e| mensaje_error(e, "Consorcio no encontrado"))
}

/// Valida el consorcio y completa la razón social de cada integrante con
/// las empresas ya cargadas
fn preparar(app: &AppState, consorcio: &mut Consorcio) -> Result<(), String> {
    validacion::validar_consorcio(consorcio)?;

    let empresas = state::datos(&app.empresas)?;
    if empresas.is_empty() {
        return Ok(());
    }

    for integrante in consorcio.integrantes.iter_mut() {
        let empresa = empresas
            .iter()
            .find(|e| e.id == Some(integrante.empresa_id))
            .ok_or_else(|| format!("La empresa {} no está registrada", integrante.ruc))?;

        if !empresa.activo {
            return Err(format!("La empresa {} está inactiva", empresa.razon_social));
        }
        if empresa.ruc != integrante.ruc {
            return Err(format!(
                "El RUC {} no corresponde a la empresa {}",
                integrante.ruc, empresa.razon_social
            ));
        }
        if integrante.razon_social.is_none() {
            integrante.razon_social = Some(empresa.razon_social.clone());
        }
    }

    Ok(())
}

pub async fn crear_consorcio(app: &AppState, mut consorcio: Consorcio) -> Result<Consorcio, String> {
    preparar(app, &mut consorcio).map_err(|e| state::registrar_error(&app.consorcios, e))?;

    consorcio.id = None;
    let creado: Consorcio = app
        .api
        .post(RUTA, &consorcio)
        .await
        .map_err(|e| state::registrar_error(&app.consorcios, e.to_string()))?;
    info!(nombre = %creado.nombre, integrantes = creado.integrantes.len(), "consorcio registrado");

    refrescar_consorcios(app).await.ok();
    Ok(creado)
}

pub async fn actualizar_consorcio(app: &AppState, mut consorcio: Consorcio) -> Result<Consorcio, String> {
    let id = consorcio.id.ok_or("ID requerido para actualizar")?;
    preparar(app, &mut consorcio).map_err(|e| state::registrar_error(&app.consorcios, e))?;

    let actualizado: Consorcio = app
        .api
        .put(&format!("{}/{}", RUTA, id), &consorcio)
        .await
        .map_err(|e| state::registrar_error(&app.consorcios, mensaje_error(e, "Consorcio no encontrado")))?;
    info!(id, "consorcio actualizado");

    refrescar_consorcios(app).await.ok();
    Ok(actualizado)
}

pub async fn eliminar_consorcio(app: &AppState, id: i64) -> Result<(), String> {
    app.api
        .delete(&format!("{}/{}", RUTA, id))
        .await
        .map_err(|e| state::registrar_error(&app.consorcios, mensaje_error(e, "Consorcio no encontrado")))?;
    info!(id, "consorcio eliminado");

    refrescar_consorcios(app).await.ok();
    Ok(())
}
