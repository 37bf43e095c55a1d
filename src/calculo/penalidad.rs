//! Penalidad por mora en la ejecución de la prestación.
//!
//! Penalidad diaria = 0.10 x monto / (F x plazo en días), con F = 0.40 para
//! plazos de hasta 60 días y F = 0.25 para plazos mayores. El total se
//! limita al 10% del monto contractual.

use crate::utils::redondear;
use serde::{Deserialize, Serialize};

const FACTOR_PLAZO_CORTO: f64 = 0.40;
const FACTOR_PLAZO_LARGO: f64 = 0.25;
const LIMITE_PLAZO_CORTO_DIAS: u32 = 60;
const TOPE_PENALIDAD_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Penalidad {
    pub factor: f64,
    pub penalidad_diaria: f64,
    pub dias_atraso: u32,
    pub monto: f64,
    pub tope: f64,
    pub alcanzo_tope: bool,
}

pub fn factor_plazo(plazo_dias: u32) -> f64 {
    if plazo_dias <= LIMITE_PLAZO_CORTO_DIAS {
        FACTOR_PLAZO_CORTO
    } else {
        FACTOR_PLAZO_LARGO
    }
}

pub fn calcular_penalidad(monto_contrato: f64, plazo_dias: u32, dias_atraso: u32) -> Result<Penalidad, String> {
    if !(monto_contrato.is_finite() && monto_contrato > 0.0) {
        return Err("El monto del contrato debe ser mayor a 0".to_string());
    }
    if plazo_dias == 0 {
        return Err("El plazo debe ser mayor a 0 días".to_string());
    }

    let factor = factor_plazo(plazo_dias);
    let diaria = redondear(0.10 * monto_contrato / (factor * plazo_dias as f64));
    let tope = redondear(monto_contrato * TOPE_PENALIDAD_PCT / 100.0);
    let bruto = redondear(diaria * dias_atraso as f64);

    Ok(Penalidad {
        factor,
        penalidad_diaria: diaria,
        dias_atraso,
        monto: bruto.min(tope),
        tope,
        alcanzo_tope: bruto >= tope,
    })
}
