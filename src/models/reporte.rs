use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TipoReporte {
    General,
    Obra,
    Empresas,
    Mensual,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResumenGeneral {
    pub total_obras: usize,
    pub obras_por_estado: BTreeMap<String, usize>,
    pub monto_total_ejecucion: f64,
    pub monto_total_supervision: f64,
    pub total_valorizado: f64,
    pub avance_financiero_promedio: f64,
    pub total_empresas: usize,
    pub total_consorcios: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FilaValorizacion {
    pub numero: u32,
    pub tipo: String,
    pub periodo: String,
    pub estado: String,
    pub monto_bruto: f64,
    pub monto_neto: f64,
    pub acumulado: f64,
    pub avance_fisico_pct: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AvanceObra {
    pub obra_id: i64,
    pub codigo: String,
    pub nombre: String,
    pub estado: String,
    pub monto_ejecucion: f64,
    pub valorizado_acumulado: f64,
    pub saldo_por_valorizar: f64,
    pub avance_financiero_pct: f64,
    pub avance_fisico_pct: f64,
    pub retenciones_acumuladas: f64,
    pub penalidades_acumuladas: f64,
    pub num_valorizaciones: usize,
    pub detalle: Vec<FilaValorizacion>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResumenEmpresa {
    pub empresa_id: i64,
    pub ruc: String,
    pub razon_social: String,
    pub obras_como_contratista: usize,
    pub obras_como_supervisor: usize,
    pub monto_contratado: f64,
    pub monto_valorizado: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResumenMensual {
    pub periodo: String,
    pub total_ejecucion: f64,
    pub total_supervision: f64,
    pub igv: f64,
    pub monto_neto: f64,
    pub num_valorizaciones: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "tipo", content = "datos", rename_all = "snake_case")]
pub enum ContenidoReporte {
    General(ResumenGeneral),
    Obra(AvanceObra),
    Empresas(Vec<ResumenEmpresa>),
    Mensual(Vec<ResumenMensual>),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Reporte {
    pub tipo: TipoReporte,
    pub titulo: String,
    pub generado_en: String,
    pub contenido: ContenidoReporte,
}

impl Reporte {
    pub fn nuevo(titulo: impl Into<String>, contenido: ContenidoReporte) -> Self {
        let tipo = match &contenido {
            ContenidoReporte::General(_) => TipoReporte::General,
            ContenidoReporte::Obra(_) => TipoReporte::Obra,
            ContenidoReporte::Empresas(_) => TipoReporte::Empresas,
            ContenidoReporte::Mensual(_) => TipoReporte::Mensual,
        };
        Reporte {
            tipo,
            titulo: titulo.into(),
            generado_en: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            contenido,
        }
    }
}
