//! Empresas, obras y consorcios contra el API simulado.

mod common;

use common::{consorcio, empresa, empresas_base, integrante, levantar, obra, Simulado};
use obras_control::commands::{consorcios, empresas, obras};
use obras_control::models::{Consorcio, Obra, TipoEmpresa};
use serde_json::json;

async fn con_empresas() -> (Simulado, obras_control::state::AppState) {
    let sim = Simulado::default();
    Simulado::con(&sim.empresas, &empresas_base());
    let app = levantar(sim.clone()).await;
    empresas::refrescar_empresas(&app).await.unwrap();
    (sim, app)
}

#[tokio::test]
async fn test_ruc_invalido_no_llega_al_api() {
    let sim = Simulado::default();
    let app = levantar(sim.clone()).await;

    let err = empresas::crear_empresa(&app, empresa(None, "30123456789", "Mala SAC", TipoEmpresa::Ambos))
        .await
        .unwrap_err();

    assert!(err.contains("RUC"));
    assert_eq!(sim.altas(), 0);
    assert_eq!(app.empresas.lock().unwrap().error.as_deref(), Some(err.as_str()));
}

#[tokio::test]
async fn test_crear_empresa_refresca_listado() {
    let sim = Simulado::default();
    let app = levantar(sim.clone()).await;

    empresas::refrescar_empresas(&app).await.unwrap();
    let antes = sim.consultas_empresas.load(std::sync::atomic::Ordering::SeqCst);

    let creada = empresas::crear_empresa(
        &app,
        empresa(None, " 20131312955 ", "Constructora Andina SAC", TipoEmpresa::Contratista),
    )
    .await
    .unwrap();

    assert_eq!(creada.id, Some(1));
    assert_eq!(creada.ruc, "20131312955");
    assert_eq!(sim.consultas_empresas.load(std::sync::atomic::Ordering::SeqCst), antes + 1);

    let listado = app.empresas.lock().unwrap();
    assert_eq!(listado.datos.len(), 1);
    assert!(!listado.cargando);
    assert!(listado.error.is_none());
}

#[tokio::test]
async fn test_ruc_duplicado_contra_listado() {
    let (sim, app) = con_empresas().await;

    let err = empresas::crear_empresa(&app, empresa(None, "20131312955", "Otra SAC", TipoEmpresa::Ambos))
        .await
        .unwrap_err();

    assert!(err.contains("Ya existe"));
    assert_eq!(sim.altas(), 0);
}

#[tokio::test]
async fn test_buscar_por_razon_social_y_ruc() {
    let sim = Simulado::default();
    let mut inactiva = empresa(Some(4), "20600000001", "Andina Inactiva SAC", TipoEmpresa::Contratista);
    inactiva.activo = false;
    let mut lista = empresas_base();
    lista.push(inactiva);
    Simulado::con(&sim.empresas, &lista);
    let app = levantar(sim).await;

    let por_nombre = empresas::buscar_empresas(&app, "  ANDINA ").await.unwrap();
    assert_eq!(por_nombre.len(), 1);
    assert_eq!(por_nombre[0].id, Some(1));

    let por_ruc = empresas::buscar_empresas(&app, "2010007").await.unwrap();
    assert_eq!(por_ruc.len(), 1);
    assert_eq!(por_ruc[0].razon_social, "Supervisora del Sur SRL");

    assert_eq!(empresas::listar_empresas(&app, true).await.unwrap().len(), 4);
    assert_eq!(empresas::listar_empresas(&app, false).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_desactivar_empresa() {
    let (sim, app) = con_empresas().await;

    let desactivada = empresas::desactivar_empresa(&app, 3).await.unwrap();
    assert!(!desactivada.activo);
    assert_eq!(Simulado::registro(&sim.empresas, 3).unwrap()["activo"], json!(false));

    let err = empresas::desactivar_empresa(&app, 3).await.unwrap_err();
    assert!(err.contains("inactiva"));
    assert_eq!(sim.cambios(), 1);
}

#[tokio::test]
async fn test_eliminar_empresa_con_obras() {
    let (sim, app) = con_empresas().await;
    let mut asignada = obra();
    asignada.contratista_id = Some(1);
    Simulado::con(&sim.obras, &[asignada]);
    obras::refrescar_obras(&app).await.unwrap();

    let err = empresas::eliminar_empresa(&app, 1).await.unwrap_err();
    assert!(err.contains("obras asociadas"));
    assert_eq!(sim.cambios(), 0);
}

#[tokio::test]
async fn test_eliminar_empresa_integrante_de_consorcio() {
    let (sim, app) = con_empresas().await;
    let mut existente = consorcio(vec![
        integrante(1, "20131312955", 60.0, true),
        integrante(3, "20512345678", 40.0, false),
    ]);
    existente.id = Some(1);
    Simulado::con(&sim.consorcios, &[existente]);
    consorcios::refrescar_consorcios(&app).await.unwrap();

    let err = empresas::eliminar_empresa(&app, 3).await.unwrap_err();
    assert!(err.contains("Consorcio Vial Pasco"));
    assert_eq!(sim.cambios(), 0);

    // la supervisora no participa: se elimina y el listado se actualiza
    empresas::eliminar_empresa(&app, 2).await.unwrap();
    assert_eq!(app.empresas.lock().unwrap().datos.len(), 2);
}

fn obra_nueva(contratista: Option<i64>, supervisor: Option<i64>) -> Obra {
    Obra {
        id: None,
        contratista_id: contratista,
        supervisor_id: supervisor,
        ..obra()
    }
}

#[tokio::test]
async fn test_obra_contratista_no_registrado() {
    let (sim, app) = con_empresas().await;

    let err = obras::crear_obra(&app, obra_nueva(Some(99), Some(2))).await.unwrap_err();
    assert_eq!(err, "El contratista no está registrado");

    let err = obras::crear_obra(&app, obra_nueva(Some(1), Some(98))).await.unwrap_err();
    assert_eq!(err, "El supervisor no está registrado");
    assert_eq!(sim.altas(), 0);
}

#[tokio::test]
async fn test_obra_tipo_de_empresa() {
    let (sim, app) = con_empresas().await;

    let err = obras::crear_obra(&app, obra_nueva(Some(2), Some(1))).await.unwrap_err();
    assert!(err.contains("no está registrada como contratista"));

    let err = obras::crear_obra(&app, obra_nueva(Some(1), Some(3))).await.unwrap_err();
    assert!(err.contains("no está registrada como supervisora"));
    assert_eq!(sim.altas(), 0);
    assert_eq!(app.obras.lock().unwrap().error.as_deref(), Some(err.as_str()));
}

#[tokio::test]
async fn test_obra_codigo_unico() {
    let (sim, app) = con_empresas().await;

    let creada = obras::crear_obra(&app, obra_nueva(Some(1), Some(2))).await.unwrap();
    assert_eq!(creada.id, Some(1));
    assert_eq!(app.obras.lock().unwrap().datos.len(), 1);

    let err = obras::crear_obra(&app, obra_nueva(Some(3), Some(2))).await.unwrap_err();
    assert!(err.contains("2456789"));
    assert_eq!(sim.altas(), 1);

    // actualizar la misma obra conserva su código
    let mut misma = creada.clone();
    misma.nombre = "Camino vecinal Huayllay - tramo II".to_string();
    let actualizada = obras::actualizar_obra(&app, misma).await.unwrap();
    assert_eq!(actualizada.codigo, "2456789");
    assert_eq!(sim.cambios(), 1);
}

#[tokio::test]
async fn test_consorcio_completa_razon_social() {
    let (sim, app) = con_empresas().await;

    let creado = consorcios::crear_consorcio(
        &app,
        consorcio(vec![
            integrante(1, "20131312955", 60.0, true),
            integrante(3, "20512345678", 40.0, false),
        ]),
    )
    .await
    .unwrap();

    let nombres: Vec<_> = creado
        .integrantes
        .iter()
        .map(|i| i.razon_social.clone().unwrap_or_default())
        .collect();
    assert_eq!(nombres, vec!["Constructora Andina SAC", "Ingenieros Asociados SAC"]);
    assert_eq!(sim.altas(), 1);
    assert_eq!(app.consorcios.lock().unwrap().datos.len(), 1);
}

#[tokio::test]
async fn test_consorcio_integrantes_contra_empresas() {
    let sim = Simulado::default();
    let mut lista = empresas_base();
    lista[2].activo = false;
    Simulado::con(&sim.empresas, &lista);
    let app = levantar(sim.clone()).await;
    empresas::refrescar_empresas(&app).await.unwrap();

    let casos: Vec<(Consorcio, &str)> = vec![
        (
            consorcio(vec![
                integrante(1, "20131312955", 50.0, true),
                integrante(7, "20600000001", 50.0, false),
            ]),
            "no está registrada",
        ),
        (
            consorcio(vec![
                integrante(1, "20131312955", 50.0, true),
                integrante(3, "20512345678", 50.0, false),
            ]),
            "está inactiva",
        ),
        (
            consorcio(vec![
                integrante(1, "20131312955", 50.0, true),
                integrante(2, "20512345678", 50.0, false),
            ]),
            "no corresponde",
        ),
    ];

    for (c, esperado) in casos {
        let err = consorcios::crear_consorcio(&app, c).await.unwrap_err();
        assert!(err.contains(esperado), "{}", err);
    }
    assert_eq!(sim.altas(), 0);
}
