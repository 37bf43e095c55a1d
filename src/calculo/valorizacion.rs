use crate::models::{Obra, TipoValorizacion, Valorizacion};
use crate::utils::{porcentaje, redondear};
use serde::{Deserialize, Serialize};

/// IGV vigente en Perú
pub const IGV_PORCENTAJE: f64 = 18.0;

/// Porcentajes aplicables al cálculo de una valorización
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParametrosCalculo {
    pub igv_pct: f64,
    pub adelanto_directo_pct: f64,
    pub retencion_pct: f64,
    /// Saldo del adelanto directo aún no amortizado, si se conoce
    pub saldo_adelanto_directo: Option<f64>,
}

impl Default for ParametrosCalculo {
    fn default() -> Self {
        ParametrosCalculo {
            igv_pct: IGV_PORCENTAJE,
            adelanto_directo_pct: 0.0,
            retencion_pct: 0.0,
            saldo_adelanto_directo: None,
        }
    }
}

impl ParametrosCalculo {
    /// Parámetros de una obra; la supervisión no amortiza adelantos de obra
    pub fn para_obra(obra: &Obra, tipo: TipoValorizacion, igv_pct: f64, saldo_adelanto: Option<f64>) -> Self {
        match tipo {
            TipoValorizacion::Ejecucion => ParametrosCalculo {
                igv_pct,
                adelanto_directo_pct: obra.adelanto_directo_pct,
                retencion_pct: obra.retencion_pct,
                saldo_adelanto_directo: saldo_adelanto,
            },
            TipoValorizacion::Supervision => ParametrosCalculo {
                igv_pct,
                adelanto_directo_pct: 0.0,
                retencion_pct: obra.retencion_pct,
                saldo_adelanto_directo: None,
            },
        }
    }
}

/// Montos ingresados por el usuario para el periodo
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EntradaCalculo {
    pub monto_bruto: f64,
    pub amortizacion_adelanto_materiales: f64,
    pub penalidad: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesgloseValorizacion {
    pub monto_bruto: f64,
    pub amortizacion_adelanto_directo: f64,
    pub amortizacion_adelanto_materiales: f64,
    pub retencion: f64,
    pub penalidad: f64,
    pub subtotal: f64,
    pub igv: f64,
    pub monto_neto: f64,
}

impl DesgloseValorizacion {
    pub fn total_deducciones(&self) -> f64 {
        redondear(
            self.amortizacion_adelanto_directo
                + self.amortizacion_adelanto_materiales
                + self.retencion
                + self.penalidad,
        )
    }

    /// Copia los montos calculados sobre una valorización
    pub fn aplicar(&self, valorizacion: &mut Valorizacion) {
        valorizacion.monto_bruto = self.monto_bruto;
        valorizacion.amortizacion_adelanto_directo = self.amortizacion_adelanto_directo;
        valorizacion.amortizacion_adelanto_materiales = self.amortizacion_adelanto_materiales;
        valorizacion.retencion = self.retencion;
        valorizacion.penalidad = self.penalidad;
        valorizacion.subtotal = self.subtotal;
        valorizacion.igv = self.igv;
        valorizacion.monto_neto = self.monto_neto;
    }
}

/// Calcula el desglose de una valorización:
/// bruto - amortizaciones - retención - penalidad, más IGV sobre el resultado.
/// Ningún monto resultante es negativo.
pub fn calcular_valorizacion(entrada: &EntradaCalculo, params: &ParametrosCalculo) -> DesgloseValorizacion {
    let bruto = redondear(entrada.monto_bruto.max(0.0));

    let mut amort_directo = redondear(bruto * params.adelanto_directo_pct.max(0.0) / 100.0);
    if let Some(saldo) = params.saldo_adelanto_directo {
        amort_directo = amort_directo.min(redondear(saldo.max(0.0)));
    }

    let amort_materiales = redondear(entrada.amortizacion_adelanto_materiales.max(0.0));
    let retencion = redondear(bruto * params.retencion_pct.max(0.0) / 100.0);
    let penalidad = redondear(entrada.penalidad.max(0.0));

    let subtotal = redondear((bruto - amort_directo - amort_materiales - retencion - penalidad).max(0.0));
    let igv = redondear(subtotal * params.igv_pct.max(0.0) / 100.0);
    let monto_neto = redondear(subtotal + igv);

    DesgloseValorizacion {
        monto_bruto: bruto,
        amortizacion_adelanto_directo: amort_directo,
        amortizacion_adelanto_materiales: amort_materiales,
        retencion,
        penalidad,
        subtotal,
        igv,
        monto_neto,
    }
}

/// Saldo del adelanto directo pendiente de amortizar, descontando lo ya
/// amortizado en otras valorizaciones de ejecución de la obra
pub fn saldo_adelanto_directo(obra: &Obra, valorizaciones: &[Valorizacion], excluir_id: Option<i64>) -> f64 {
    let amortizado: f64 = valorizaciones
        .iter()
        .filter(|v| Some(v.obra_id) == obra.id && v.tipo == TipoValorizacion::Ejecucion)
        .filter(|v| excluir_id.is_none() || v.id != excluir_id)
        .map(|v| v.amortizacion_adelanto_directo)
        .sum();
    redondear((obra.monto_adelanto_directo() - amortizado).max(0.0))
}

/// Monto bruto acumulado de un tipo sobre las valorizaciones de una obra
pub fn bruto_acumulado(
    valorizaciones: &[Valorizacion],
    obra_id: i64,
    tipo: TipoValorizacion,
    excluir_id: Option<i64>,
) -> f64 {
    redondear(
        valorizaciones
            .iter()
            .filter(|v| v.obra_id == obra_id && v.tipo == tipo)
            .filter(|v| excluir_id.is_none() || v.id != excluir_id)
            .map(|v| v.monto_bruto)
            .sum(),
    )
}

/// Avance financiero de la obra: bruto aprobado o pagado sobre el monto contratado
pub fn avance_financiero(obra: &Obra, valorizaciones: &[Valorizacion]) -> f64 {
    let aprobado: f64 = valorizaciones
        .iter()
        .filter(|v| Some(v.obra_id) == obra.id)
        .filter(|v| v.tipo == TipoValorizacion::Ejecucion && v.estado.computa())
        .map(|v| v.monto_bruto)
        .sum();
    porcentaje(aprobado, obra.monto_ejecucion)
}

/// Siguiente número correlativo de valorización para la obra y tipo
pub fn siguiente_numero(valorizaciones: &[Valorizacion], obra_id: i64, tipo: TipoValorizacion) -> u32 {
    valorizaciones
        .iter()
        .filter(|v| v.obra_id == obra_id && v.tipo == tipo)
        .map(|v| v.numero)
        .max()
        .unwrap_or(0)
        + 1
}
