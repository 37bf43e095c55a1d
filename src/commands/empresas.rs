use super::mensaje_error;
use crate::models::Empresa;
use crate::state::{self, AppState};
use crate::validacion;
use tracing::info;

const RUTA: &str = "empresas";

pub async fn refrescar_empresas(app: &AppState) -> Result<Vec<Empresa>, String> {
    state::refrescar(&app.empresas, || async {
        app.api
            .get::<Vec<Empresa>>(RUTA)
            .await
            .map_err(|e| e.to_string())
    })
    .await
}

pub async fn listar_empresas(app: &AppState, incluir_inactivas: bool) -> Result<Vec<Empresa>, String> {
    let empresas = refrescar_empresas(app).await?;
    Ok(empresas
        .into_iter()
        .filter(|e| incluir_inactivas || e.activo)
        .collect())
}

/// Busca por RUC o razón social entre las empresas activas
pub async fn buscar_empresas(app: &AppState, termino: &str) -> Result<Vec<Empresa>, String> {
    let termino = termino.trim().to_lowercase();
    let empresas = listar_empresas(app, false).await?;

    Ok(empresas
        .into_iter()
        .filter(|e| {
            e.ruc.contains(&termino)
                || e.razon_social.to_lowercase().contains(&termino)
                || e
                    .nombre_comercial
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&termino))
        })
        .collect())
}

pub async fn obtener_empresa(app: &AppState, id: i64) -> Result<Empresa, String> {
    app.api
        .get::<Empresa>(&format!("{}/{}", RUTA, id))
        .await
        .map_err(|e| mensaje_error(e, "Empresa no encontrada"))
}

pub async fn crear_empresa(app: &AppState, mut empresa: Empresa) -> Result<Empresa, String> {
    empresa.ruc = empresa.ruc.trim().to_string();
    validacion::validar_empresa(&empresa).map_err(|e| state::registrar_error(&app.empresas, e))?;

    let cargadas = state::datos(&app.empresas)?;
    if cargadas.iter().any(|e| e.ruc == empresa.ruc) {
        return Err(state::registrar_error(
            &app.empresas,
            format!("Ya existe una empresa registrada con RUC {}", empresa.ruc),
        ));
    }

    empresa.id = None;
    let creada: Empresa = app
        .api
        .post(RUTA, &empresa)
        .await
        .map_err(|e| state::registrar_error(&app.empresas, e.to_string()))?;
    info!(ruc = %creada.ruc, "empresa registrada");

    refrescar_empresas(app).await.ok();
    Ok(creada)
}

pub async fn actualizar_empresa(app: &AppState, mut empresa: Empresa) -> Result<Empresa, String> {
    let id = empresa.id.ok_or("ID requerido para actualizar")?;
    empresa.ruc = empresa.ruc.trim().to_string();
    validacion::validar_empresa(&empresa).map_err(|e| state::registrar_error(&app.empresas, e))?;

    let cargadas = state::datos(&app.empresas)?;
    if cargadas.iter().any(|e| e.ruc == empresa.ruc && e.id != Some(id)) {
        return Err(state::registrar_error(
            &app.empresas,
            format!("El RUC {} pertenece a otra empresa", empresa.ruc),
        ));
    }

    let actualizada: Empresa = app
        .api
        .put(&format!("{}/{}", RUTA, id), &empresa)
        .await
        .map_err(|e| state::registrar_error(&app.empresas, mensaje_error(e, "Empresa no encontrada")))?;
    info!(id, "empresa actualizada");

    refrescar_empresas(app).await.ok();
    Ok(actualizada)
}

/// Baja lógica: marca la empresa como inactiva
pub async fn desactivar_empresa(app: &AppState, id: i64) -> Result<Empresa, String> {
    let mut empresa = obtener_empresa(app, id).await?;
    if !empresa.activo {
        return Err("La empresa ya se encuentra inactiva".to_string());
    }
    empresa.activo = false;

    let actualizada: Empresa = app
        .api
        .put(&format!("{}/{}", RUTA, id), &empresa)
        .await
        .map_err(|e| state::registrar_error(&app.empresas, e.to_string()))?;
    info!(id, "empresa desactivada");

    refrescar_empresas(app).await.ok();
    Ok(actualizada)
}

pub async fn eliminar_empresa(app: &AppState, id: i64) -> Result<(), String> {
    let obras = state::datos(&app.obras)?;
    if obras
        .iter()
        .any(|o| o.contratista_id == Some(id) || o.supervisor_id == Some(id))
    {
        return Err(state::registrar_error(
            &app.empresas,
            "La empresa tiene obras asociadas; desactívela en lugar de eliminarla".to_string(),
        ));
    }

    let consorcios = state::datos(&app.consorcios)?;
    if let Some(consorcio) = consorcios.iter().find(|c| {
        c.empresa_id == Some(id) || c.integrantes.iter().any(|i| i.empresa_id == id)
    }) {
        return Err(state::registrar_error(
            &app.empresas,
            format!(
                "La empresa pertenece al consorcio {}; desactívela en lugar de eliminarla",
                consorcio.nombre
            ),
        ));
    }

    app.api
        .delete(&format!("{}/{}", RUTA, id))
        .await
        .map_err(|e| state::registrar_error(&app.empresas, mensaje_error(e, "Empresa no encontrada")))?;
    info!(id, "empresa eliminada");

    refrescar_empresas(app).await.ok();
    Ok(())
}
