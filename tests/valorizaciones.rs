//! Registro y flujo de aprobación de valorizaciones contra el API simulado.

mod common;

use common::{levantar, nueva, obra, valorizacion, Simulado};
use obras_control::commands::valorizaciones::*;
use obras_control::models::EstadoValorizacion::{self, *};
use obras_control::state::AppState;
use serde_json::json;

/// Obra 1 con una valorización aprobada (2024-03) y los estados indicados a partir de la 2
async fn con_valorizaciones(estados: &[EstadoValorizacion]) -> (Simulado, AppState) {
    let sim = Simulado::default();
    Simulado::con(&sim.obras, &[obra()]);
    let mut vals = vec![valorizacion(1, "2024-03", 10_000.0, Aprobada)];
    for (i, estado) in estados.iter().enumerate() {
        let id = i as i64 + 2;
        vals.push(valorizacion(id, &format!("2024-{:02}", id + 2), 20_000.0, *estado));
    }
    Simulado::con(&sim.valorizaciones, &vals);
    let app = levantar(sim.clone()).await;
    (sim, app)
}

#[tokio::test]
async fn test_registrar_calcula_y_numera() {
    let (_, app) = con_valorizaciones(&[]).await;

    let v = registrar_valorizacion(&app, nueva("2024-04", 20_000.0)).await.unwrap();

    assert_eq!(v.id, Some(2));
    assert_eq!(v.numero, 2);
    assert_eq!(v.estado, Borrador);
    assert_eq!(v.amortizacion_adelanto_directo, 2_000.0);
    assert_eq!(v.retencion, 1_000.0);
    assert_eq!(v.subtotal, 17_000.0);
    assert_eq!(v.igv, 3_060.0);
    assert_eq!(v.monto_neto, 20_060.0);

    // el listado se volvió a consultar tras el alta
    assert_eq!(app.valorizaciones.lock().unwrap().datos.len(), 2);
}

#[tokio::test]
async fn test_periodo_repetido_rechazado() {
    let (sim, app) = con_valorizaciones(&[]).await;

    let err = registrar_valorizacion(&app, nueva("2024-03", 5_000.0)).await.unwrap_err();
    assert!(err.contains("2024-03"));

    // un periodo con signo no pasa como otro periodo distinto
    let err = registrar_valorizacion(&app, nueva("2024-+3", 5_000.0)).await.unwrap_err();
    assert!(err.contains("Periodo inválido"));
    assert_eq!(sim.altas(), 0);
}

#[tokio::test]
async fn test_acumulado_no_supera_contrato() {
    let (_, app) = con_valorizaciones(&[]).await;

    let err = registrar_valorizacion(&app, nueva("2024-04", 95_000.0)).await.unwrap_err();
    assert!(err.contains("superaría"));
}

#[tokio::test]
async fn test_obra_inexistente() {
    let app = levantar(Simulado::default()).await;
    let err = registrar_valorizacion(&app, nueva("2024-04", 1_000.0)).await.unwrap_err();
    assert_eq!(err, "Obra no encontrada");
}

#[tokio::test]
async fn test_presentar_registra_fecha() {
    let (sim, app) = con_valorizaciones(&[Borrador]).await;

    let v = cambiar_estado_valorizacion(&app, 2, Presentada, None).await.unwrap();

    assert_eq!(v.estado, Presentada);
    assert_eq!(v.fecha_presentacion, Some(chrono::Local::now().date_naive()));
    assert_eq!(Simulado::registro(&sim.valorizaciones, 2).unwrap()["estado"], json!("presentada"));
}

#[tokio::test]
async fn test_observar_exige_observaciones() {
    let (sim, app) = con_valorizaciones(&[Presentada]).await;

    let err = cambiar_estado_valorizacion(&app, 2, Observada, Some("  ".to_string()))
        .await
        .unwrap_err();
    assert!(err.contains("observaciones"));
    assert_eq!(sim.cambios(), 0);

    let v = cambiar_estado_valorizacion(&app, 2, Observada, Some("Falta metrado de partidas".to_string()))
        .await
        .unwrap();
    assert_eq!(v.estado, Observada);
    assert_eq!(v.observaciones.as_deref(), Some("Falta metrado de partidas"));
}

#[tokio::test]
async fn test_aprobada_solo_pasa_a_pagada() {
    let (sim, app) = con_valorizaciones(&[]).await;

    for destino in [Presentada, Observada, Aprobada] {
        let err = cambiar_estado_valorizacion(&app, 1, destino, Some("x".to_string()))
            .await
            .unwrap_err();
        assert!(err.contains("No se puede pasar de APROBADA"), "{}", err);
    }
    assert_eq!(sim.cambios(), 0);

    let v = cambiar_estado_valorizacion(&app, 1, Pagada, None).await.unwrap();
    assert_eq!(v.estado, Pagada);
    assert_eq!(app.valorizaciones.lock().unwrap().datos[0].estado, Pagada);
}

#[tokio::test]
async fn test_eliminar_solo_editables() {
    let (sim, app) = con_valorizaciones(&[Borrador]).await;

    let err = eliminar_valorizacion(&app, 1).await.unwrap_err();
    assert!(err.contains("borrador u observadas"));
    assert_eq!(sim.cambios(), 0);
    assert!(Simulado::registro(&sim.valorizaciones, 1).is_some());

    eliminar_valorizacion(&app, 2).await.unwrap();
    assert!(Simulado::registro(&sim.valorizaciones, 2).is_none());
    assert_eq!(app.valorizaciones.lock().unwrap().datos.len(), 1);
}

#[tokio::test]
async fn test_actualizar_recalcula_montos() {
    let (_, app) = con_valorizaciones(&[Observada]).await;

    // saldo de adelanto: 10,000 - 1,000 (la aprobada); la propia no cuenta
    let v = actualizar_valorizacion(&app, 2, nueva("2024-04", 30_000.0)).await.unwrap();

    assert_eq!(v.numero, 2);
    assert_eq!(v.estado, Observada);
    assert_eq!(v.monto_bruto, 30_000.0);
    assert_eq!(v.amortizacion_adelanto_directo, 3_000.0);
    assert_eq!(v.retencion, 1_500.0);
    assert_eq!(v.subtotal, 25_500.0);
    assert_eq!(v.igv, 4_590.0);
    assert_eq!(v.monto_neto, 30_090.0);
}

#[tokio::test]
async fn test_actualizar_aprobada_rechazado() {
    let (sim, app) = con_valorizaciones(&[]).await;

    let err = actualizar_valorizacion(&app, 1, nueva("2024-03", 1_000.0)).await.unwrap_err();
    assert!(err.contains("no puede modificarse"));
    assert_eq!(sim.cambios(), 0);
}
