//! API simulado en proceso y datos de prueba compartidos.
#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use obras_control::api::{ApiClient, ConfigApi};
use obras_control::db::Database;
use obras_control::models::{
    Consorcio, Empresa, EstadoObra, EstadoValorizacion, IntegranteConsorcio, NuevaValorizacion, Obra,
    TipoEmpresa, TipoValorizacion, Valorizacion,
};
use obras_control::state::AppState;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Coleccion = Arc<Mutex<Vec<Value>>>;
type Respuesta = (StatusCode, Json<Value>);

/// Estado del API simulado: colecciones en memoria y contadores de escritura
#[derive(Clone, Default)]
pub struct Simulado {
    pub empresas: Coleccion,
    pub consorcios: Coleccion,
    pub obras: Coleccion,
    pub valorizaciones: Coleccion,
    pub consultas_empresas: Arc<AtomicUsize>,
    pub altas: Arc<AtomicUsize>,
    pub cambios: Arc<AtomicUsize>,
}

impl Simulado {
    pub fn con<T: Serialize>(coleccion: &Coleccion, registros: &[T]) {
        let mut lista = coleccion.lock().unwrap();
        lista.extend(registros.iter().map(|r| serde_json::to_value(r).unwrap()));
    }

    pub fn altas(&self) -> usize {
        self.altas.load(Ordering::SeqCst)
    }

    pub fn cambios(&self) -> usize {
        self.cambios.load(Ordering::SeqCst)
    }

    pub fn registro(coleccion: &Coleccion, id: i64) -> Option<Value> {
        coleccion.lock().unwrap().iter().find(|r| r["id"] == json!(id)).cloned()
    }
}

fn ok(data: Value) -> Respuesta {
    (StatusCode::OK, Json(json!({ "success": true, "data": data })))
}

fn no_encontrado() -> Respuesta {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Registro no existe" })),
    )
}

fn listar(coleccion: &Coleccion) -> Respuesta {
    ok(json!(*coleccion.lock().unwrap()))
}

fn obtener(coleccion: &Coleccion, id: i64) -> Respuesta {
    match Simulado::registro(coleccion, id) {
        Some(r) => ok(r),
        None => no_encontrado(),
    }
}

fn agregar(coleccion: &Coleccion, mut registro: Value) -> Respuesta {
    let mut lista = coleccion.lock().unwrap();
    let siguiente = lista.iter().filter_map(|r| r["id"].as_i64()).max().unwrap_or(0) + 1;
    registro["id"] = json!(siguiente);
    lista.push(registro.clone());
    ok(registro)
}

fn reemplazar(coleccion: &Coleccion, id: i64, mut registro: Value) -> Respuesta {
    let mut lista = coleccion.lock().unwrap();
    match lista.iter_mut().find(|r| r["id"] == json!(id)) {
        Some(actual) => {
            registro["id"] = json!(id);
            *actual = registro.clone();
            ok(registro)
        }
        None => no_encontrado(),
    }
}

fn quitar(coleccion: &Coleccion, id: i64) -> Respuesta {
    let mut lista = coleccion.lock().unwrap();
    let antes = lista.len();
    lista.retain(|r| r["id"] != json!(id));
    if lista.len() == antes {
        no_encontrado()
    } else {
        ok(Value::Null)
    }
}

fn router(sim: Simulado) -> Router {
    Router::new()
        .route(
            "/api/empresas",
            get(|State(s): State<Simulado>| async move {
                s.consultas_empresas.fetch_add(1, Ordering::SeqCst);
                listar(&s.empresas)
            })
            .post(|State(s): State<Simulado>, Json(e): Json<Value>| async move {
                s.altas.fetch_add(1, Ordering::SeqCst);
                agregar(&s.empresas, e)
            }),
        )
        .route(
            "/api/empresas/{id}",
            get(|State(s): State<Simulado>, Path(id): Path<i64>| async move { obtener(&s.empresas, id) })
                .put(
                    |State(s): State<Simulado>, Path(id): Path<i64>, Json(e): Json<Value>| async move {
                        s.cambios.fetch_add(1, Ordering::SeqCst);
                        reemplazar(&s.empresas, id, e)
                    },
                )
                .delete(|State(s): State<Simulado>, Path(id): Path<i64>| async move {
                    s.cambios.fetch_add(1, Ordering::SeqCst);
                    quitar(&s.empresas, id)
                }),
        )
        .route(
            "/api/consorcios",
            get(|State(s): State<Simulado>| async move { listar(&s.consorcios) }).post(
                |State(s): State<Simulado>, Json(c): Json<Value>| async move {
                    s.altas.fetch_add(1, Ordering::SeqCst);
                    agregar(&s.consorcios, c)
                },
            ),
        )
        .route(
            "/api/obras",
            get(|State(s): State<Simulado>| async move { listar(&s.obras) }).post(
                |State(s): State<Simulado>, Json(o): Json<Value>| async move {
                    s.altas.fetch_add(1, Ordering::SeqCst);
                    agregar(&s.obras, o)
                },
            ),
        )
        .route(
            "/api/obras/{id}",
            get(|State(s): State<Simulado>, Path(id): Path<i64>| async move { obtener(&s.obras, id) }).put(
                |State(s): State<Simulado>, Path(id): Path<i64>, Json(o): Json<Value>| async move {
                    s.cambios.fetch_add(1, Ordering::SeqCst);
                    reemplazar(&s.obras, id, o)
                },
            ),
        )
        .route(
            "/api/valorizaciones",
            get(
                |State(s): State<Simulado>, Query(q): Query<HashMap<String, String>>| async move {
                    let obra_id: Option<i64> = q.get("obra_id").and_then(|v| v.parse().ok());
                    let lista: Vec<Value> = s
                        .valorizaciones
                        .lock()
                        .unwrap()
                        .iter()
                        .filter(|v| obra_id.map_or(true, |id| v["obra_id"] == json!(id)))
                        .cloned()
                        .collect();
                    ok(json!(lista))
                },
            )
            .post(|State(s): State<Simulado>, Json(v): Json<Value>| async move {
                s.altas.fetch_add(1, Ordering::SeqCst);
                agregar(&s.valorizaciones, v)
            }),
        )
        .route(
            "/api/valorizaciones/{id}",
            get(|State(s): State<Simulado>, Path(id): Path<i64>| async move {
                obtener(&s.valorizaciones, id)
            })
            .put(
                |State(s): State<Simulado>, Path(id): Path<i64>, Json(v): Json<Value>| async move {
                    s.cambios.fetch_add(1, Ordering::SeqCst);
                    reemplazar(&s.valorizaciones, id, v)
                },
            )
            .delete(|State(s): State<Simulado>, Path(id): Path<i64>| async move {
                s.cambios.fetch_add(1, Ordering::SeqCst);
                quitar(&s.valorizaciones, id)
            }),
        )
        .with_state(sim)
}

/// Levanta el API simulado en un puerto libre y arma el estado de la aplicación
pub async fn levantar(sim: Simulado) -> AppState {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(sim);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let api = ApiClient::new(ConfigApi {
        base_url: format!("http://{}/api", addr),
        token: None,
        timeout_segundos: 5,
    })
    .unwrap();
    AppState::new(Database::en_memoria().unwrap(), api)
}

pub fn empresa(id: Option<i64>, ruc: &str, razon_social: &str, tipo: TipoEmpresa) -> Empresa {
    Empresa {
        id,
        ruc: ruc.to_string(),
        razon_social: razon_social.to_string(),
        nombre_comercial: None,
        tipo,
        direccion: None,
        telefono: None,
        email: None,
        representante_legal: None,
        es_consorcio: false,
        activo: true,
    }
}

/// Contratista (1), supervisora (2) y una tercera contratista (3)
pub fn empresas_base() -> Vec<Empresa> {
    vec![
        empresa(Some(1), "20131312955", "Constructora Andina SAC", TipoEmpresa::Contratista),
        empresa(Some(2), "20100070970", "Supervisora del Sur SRL", TipoEmpresa::Supervisora),
        empresa(Some(3), "20512345678", "Ingenieros Asociados SAC", TipoEmpresa::Contratista),
    ]
}

pub fn obra() -> Obra {
    Obra {
        id: Some(1),
        codigo: "2456789".to_string(),
        nombre: "Mejoramiento del camino vecinal Huayllay".to_string(),
        entidad_contratante: "Gobierno Regional de Pasco".to_string(),
        ubicacion: None,
        numero_contrato: Some("CO-012-2024".to_string()),
        contratista_id: None,
        supervisor_id: None,
        monto_ejecucion: 100_000.0,
        monto_supervision: 8_000.0,
        plazo_dias: 120,
        fecha_inicio: None,
        fecha_fin: None,
        adelanto_directo_pct: 10.0,
        adelanto_materiales_pct: 0.0,
        retencion_pct: 5.0,
        estado: EstadoObra::EnEjecucion,
    }
}

pub fn integrante(empresa_id: i64, ruc: &str, pct: f64, es_lider: bool) -> IntegranteConsorcio {
    IntegranteConsorcio {
        empresa_id,
        ruc: ruc.to_string(),
        razon_social: None,
        porcentaje_participacion: pct,
        es_lider,
    }
}

pub fn consorcio(integrantes: Vec<IntegranteConsorcio>) -> Consorcio {
    Consorcio {
        id: None,
        empresa_id: None,
        nombre: "Consorcio Vial Pasco".to_string(),
        ruc: None,
        representante_legal: None,
        integrantes,
        activo: true,
    }
}

/// Valorización de ejecución de la obra 1 con el 10% de adelanto ya amortizado
pub fn valorizacion(id: i64, periodo: &str, bruto: f64, estado: EstadoValorizacion) -> Valorizacion {
    Valorizacion {
        id: Some(id),
        obra_id: 1,
        numero: id as u32,
        tipo: TipoValorizacion::Ejecucion,
        periodo: periodo.to_string(),
        fecha_inicio: None,
        fecha_fin: None,
        monto_bruto: bruto,
        amortizacion_adelanto_directo: bruto * 0.10,
        amortizacion_adelanto_materiales: 0.0,
        retencion: bruto * 0.05,
        penalidad: 0.0,
        subtotal: bruto * 0.85,
        igv: bruto * 0.85 * 0.18,
        monto_neto: bruto * 0.85 * 1.18,
        avance_fisico_pct: 10.0,
        estado,
        observaciones: None,
        fecha_presentacion: None,
    }
}

pub fn nueva(periodo: &str, bruto: f64) -> NuevaValorizacion {
    NuevaValorizacion {
        obra_id: 1,
        tipo: TipoValorizacion::Ejecucion,
        periodo: periodo.to_string(),
        fecha_inicio: None,
        fecha_fin: None,
        monto_bruto: bruto,
        amortizacion_adelanto_materiales: 0.0,
        penalidad: 0.0,
        avance_fisico_pct: 30.0,
        observaciones: None,
    }
}
