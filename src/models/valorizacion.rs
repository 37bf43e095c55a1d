use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TipoValorizacion {
    Ejecucion,
    Supervision,
}

impl TipoValorizacion {
    pub fn etiqueta(self) -> &'static str {
        match self {
            TipoValorizacion::Ejecucion => "EJECUCION",
            TipoValorizacion::Supervision => "SUPERVISION",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EstadoValorizacion {
    Borrador,
    Presentada,
    Observada,
    Aprobada,
    Pagada,
}

impl EstadoValorizacion {
    /// Transiciones permitidas del flujo de aprobación
    pub fn puede_pasar_a(self, destino: EstadoValorizacion) -> bool {
        use EstadoValorizacion::*;
        matches!(
            (self, destino),
            (Borrador, Presentada)
                | (Presentada, Observada)
                | (Presentada, Aprobada)
                | (Observada, Presentada)
                | (Aprobada, Pagada)
        )
    }

    /// Solo las valorizaciones aprobadas o pagadas cuentan como monto valorizado
    pub fn computa(self) -> bool {
        matches!(self, EstadoValorizacion::Aprobada | EstadoValorizacion::Pagada)
    }

    pub fn es_editable(self) -> bool {
        matches!(self, EstadoValorizacion::Borrador | EstadoValorizacion::Observada)
    }

    pub fn etiqueta(self) -> &'static str {
        match self {
            EstadoValorizacion::Borrador => "BORRADOR",
            EstadoValorizacion::Presentada => "PRESENTADA",
            EstadoValorizacion::Observada => "OBSERVADA",
            EstadoValorizacion::Aprobada => "APROBADA",
            EstadoValorizacion::Pagada => "PAGADA",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Valorizacion {
    pub id: Option<i64>,
    pub obra_id: i64,
    pub numero: u32,
    pub tipo: TipoValorizacion,
    /// Periodo valorizado en formato YYYY-MM
    pub periodo: String,
    #[serde(default)]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_fin: Option<NaiveDate>,
    pub monto_bruto: f64,
    #[serde(default)]
    pub amortizacion_adelanto_directo: f64,
    #[serde(default)]
    pub amortizacion_adelanto_materiales: f64,
    #[serde(default)]
    pub retencion: f64,
    #[serde(default)]
    pub penalidad: f64,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub igv: f64,
    #[serde(default)]
    pub monto_neto: f64,
    #[serde(default)]
    pub avance_fisico_pct: f64,
    pub estado: EstadoValorizacion,
    #[serde(default)]
    pub observaciones: Option<String>,
    #[serde(default)]
    pub fecha_presentacion: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NuevaValorizacion {
    pub obra_id: i64,
    pub tipo: TipoValorizacion,
    pub periodo: String,
    #[serde(default)]
    pub fecha_inicio: Option<NaiveDate>,
    #[serde(default)]
    pub fecha_fin: Option<NaiveDate>,
    pub monto_bruto: f64,
    #[serde(default)]
    pub amortizacion_adelanto_materiales: f64,
    #[serde(default)]
    pub penalidad: f64,
    #[serde(default)]
    pub avance_fisico_pct: f64,
    #[serde(default)]
    pub observaciones: Option<String>,
}
