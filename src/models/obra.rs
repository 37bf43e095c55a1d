use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EstadoObra {
    Planificada,
    EnEjecucion,
    Paralizada,
    Terminada,
    Liquidada,
}

impl EstadoObra {
    pub fn etiqueta(self) -> &'static str {
        match self {
            EstadoObra::Planificada => "PLANIFICADA",
            EstadoObra::EnEjecucion => "EN EJECUCION",
            EstadoObra::Paralizada => "PARALIZADA",
            EstadoObra::Terminada => "TERMINADA",
            EstadoObra::Liquidada => "LIQUIDADA",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Obra {
    pub id: Option<i64>,
    pub codigo: String,
    pub nombre: String,
    pub entidad_contratante: String,
    #[serde(default)]
    pub ubicacion: Option<String>,
    #[serde(default)]
    pub numero_contrato: Option<String>,
    #[serde(default)]
    pub contratista_id: Option<i64>,
    #[serde(default)]
    pub supervisor_id: Option<i64>,
    pub monto_ejecucion: f64,
    #[serde(default)]
    pub monto_supervision: f64,
    pub plazo_dias: u32,
    #[serde(default)]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_fin: Option<NaiveDate>,
    #[serde(default)]
    pub adelanto_directo_pct: f64,
    #[serde(default)]
    pub adelanto_materiales_pct: f64,
    #[serde(default)]
    pub retencion_pct: f64,
    pub estado: EstadoObra,
}

impl Obra {
    /// Monto del adelanto directo otorgado al contratista
    pub fn monto_adelanto_directo(&self) -> f64 {
        self.monto_ejecucion * self.adelanto_directo_pct / 100.0
    }
}
