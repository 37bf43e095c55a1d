//! Reglas de validación de formularios: RUC, consorcios, obras y valorizaciones.
//!
//! Cada función retorna el primer error encontrado como mensaje legible.

use crate::models::{Consorcio, Empresa, NuevaValorizacion, Obra};
use crate::utils;
use std::collections::HashSet;

/// Prefijos de RUC admitidos por SUNAT
/// (10 persona natural, 15/16/17 casos especiales, 20 persona jurídica)
pub const PREFIJOS_RUC: [&str; 5] = ["10", "15", "16", "17", "20"];

/// Tope de la supervisión respecto al monto de ejecución
pub const TOPE_SUPERVISION_PCT: f64 = 20.0;
pub const TOPE_ADELANTO_DIRECTO_PCT: f64 = 10.0;
pub const TOPE_ADELANTO_MATERIALES_PCT: f64 = 20.0;
pub const TOPE_RETENCION_PCT: f64 = 10.0;

/// Tolerancia al sumar porcentajes de participación
const TOLERANCIA_PORCENTAJE: f64 = 0.01;

/// RUC: 11 dígitos y prefijo permitido
pub fn es_ruc_valido(ruc: &str) -> bool {
    ruc.len() == 11
        && ruc.chars().all(|c| c.is_ascii_digit())
        && PREFIJOS_RUC.iter().any(|p| ruc.starts_with(p))
}

/// Verifica el dígito verificador del RUC (módulo 11, pesos 5432765432).
/// Es informativo: `es_ruc_valido` no lo exige.
pub fn digito_verificador_ruc_correcto(ruc: &str) -> bool {
    if ruc.len() != 11 || !ruc.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let pesos = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];
    let digitos: Vec<u32> = ruc.chars().filter_map(|c| c.to_digit(10)).collect();

    let suma: u32 = digitos[..10]
        .iter()
        .zip(pesos.iter())
        .map(|(d, p)| d * p)
        .sum();

    let esperado = match 11 - (suma % 11) {
        10 => 0,
        11 => 1,
        dv => dv,
    };
    digitos[10] == esperado
}

pub fn validar_ruc(ruc: &str) -> Result<(), String> {
    if ruc.len() != 11 || !ruc.chars().all(|c| c.is_ascii_digit()) {
        return Err("El RUC debe tener 11 dígitos".to_string());
    }
    if !es_ruc_valido(ruc) {
        return Err(format!(
            "El RUC debe iniciar con {}",
            PREFIJOS_RUC.join(", ")
        ));
    }
    Ok(())
}

fn es_email_valido(email: &str) -> bool {
    match email.split_once('@') {
        Some((usuario, dominio)) => {
            !usuario.is_empty()
                && dominio.contains('.')
                && !dominio.starts_with('.')
                && !dominio.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

pub fn validar_empresa(empresa: &Empresa) -> Result<(), String> {
    validar_ruc(empresa.ruc.trim())?;

    if empresa.razon_social.trim().is_empty() {
        return Err("La razón social es obligatoria".to_string());
    }

    if let Some(email) = empresa.email.as_deref() {
        if !email.is_empty() && !es_email_valido(email) {
            return Err(format!("Email inválido: {}", email));
        }
    }

    Ok(())
}

pub fn validar_consorcio(consorcio: &Consorcio) -> Result<(), String> {
    if consorcio.nombre.trim().is_empty() {
        return Err("El nombre del consorcio es obligatorio".to_string());
    }

    if let Some(ruc) = consorcio.ruc.as_deref() {
        if !ruc.is_empty() {
            validar_ruc(ruc)?;
        }
    }

    if consorcio.integrantes.len() < 2 {
        return Err("Un consorcio requiere al menos 2 empresas integrantes".to_string());
    }

    let mut vistos = HashSet::new();
    for integrante in &consorcio.integrantes {
        validar_ruc(&integrante.ruc)
            .map_err(|e| format!("Integrante {}: {}", integrante.ruc, e))?;

        if integrante.porcentaje_participacion <= 0.0 || integrante.porcentaje_participacion > 100.0 {
            return Err(format!(
                "Integrante {}: la participación debe estar entre 0 y 100%",
                integrante.ruc
            ));
        }

        if !vistos.insert(integrante.empresa_id) {
            return Err(format!(
                "La empresa {} figura más de una vez en el consorcio",
                integrante.ruc
            ));
        }
    }

    let lideres = consorcio.integrantes.iter().filter(|i| i.es_lider).count();
    if lideres != 1 {
        return Err("El consorcio debe tener exactamente una empresa líder".to_string());
    }

    let suma = consorcio.suma_participacion();
    if (suma - 100.0).abs() > TOLERANCIA_PORCENTAJE {
        return Err(format!(
            "Los porcentajes de participación deben sumar 100% (suman {:.2}%)",
            suma
        ));
    }

    Ok(())
}

pub fn validar_obra(obra: &Obra) -> Result<(), String> {
    if obra.codigo.trim().is_empty() {
        return Err("El código de la obra es obligatorio".to_string());
    }
    if obra.nombre.trim().is_empty() {
        return Err("El nombre de la obra es obligatorio".to_string());
    }
    if obra.entidad_contratante.trim().is_empty() {
        return Err("La entidad contratante es obligatoria".to_string());
    }

    if obra.monto_ejecucion <= 0.0 {
        return Err("El monto de ejecución debe ser mayor a 0".to_string());
    }
    if obra.monto_supervision < 0.0 {
        return Err("El monto de supervisión no puede ser negativo".to_string());
    }
    let tope = obra.monto_ejecucion * TOPE_SUPERVISION_PCT / 100.0;
    if obra.monto_supervision > tope {
        return Err(format!(
            "El monto de supervisión no debe exceder el {:.0}% del monto de ejecución ({})",
            TOPE_SUPERVISION_PCT,
            utils::formatear_soles(tope)
        ));
    }

    if obra.plazo_dias == 0 {
        return Err("El plazo de ejecución debe ser mayor a 0 días".to_string());
    }

    if let (Some(inicio), Some(fin)) = (obra.fecha_inicio, obra.fecha_fin) {
        if fin < inicio {
            return Err("La fecha de fin no puede ser anterior a la fecha de inicio".to_string());
        }
    }

    validar_rango_pct("adelanto directo", obra.adelanto_directo_pct, TOPE_ADELANTO_DIRECTO_PCT)?;
    validar_rango_pct(
        "adelanto de materiales",
        obra.adelanto_materiales_pct,
        TOPE_ADELANTO_MATERIALES_PCT,
    )?;
    validar_rango_pct("retención", obra.retencion_pct, TOPE_RETENCION_PCT)?;

    if let (Some(contratista), Some(supervisor)) = (obra.contratista_id, obra.supervisor_id) {
        if contratista == supervisor {
            return Err("El contratista y el supervisor deben ser empresas distintas".to_string());
        }
    }

    Ok(())
}

fn validar_rango_pct(nombre: &str, valor: f64, tope: f64) -> Result<(), String> {
    if !(0.0..=tope).contains(&valor) {
        return Err(format!(
            "El porcentaje de {} debe estar entre 0 y {:.0}%",
            nombre, tope
        ));
    }
    Ok(())
}

pub fn validar_valorizacion(valorizacion: &NuevaValorizacion) -> Result<(), String> {
    if utils::parsear_periodo(&valorizacion.periodo).is_none() {
        return Err(format!(
            "Periodo inválido '{}': use el formato AAAA-MM",
            valorizacion.periodo
        ));
    }

    if valorizacion.monto_bruto <= 0.0 {
        return Err("El monto valorizado debe ser mayor a 0".to_string());
    }
    if valorizacion.amortizacion_adelanto_materiales < 0.0 {
        return Err("La amortización de materiales no puede ser negativa".to_string());
    }
    if valorizacion.penalidad < 0.0 {
        return Err("La penalidad no puede ser negativa".to_string());
    }
    if !(0.0..=100.0).contains(&valorizacion.avance_fisico_pct) {
        return Err("El avance físico debe estar entre 0 y 100%".to_string());
    }

    if let (Some(inicio), Some(fin)) = (valorizacion.fecha_inicio, valorizacion.fecha_fin) {
        if fin < inicio {
            return Err("La fecha de fin del periodo no puede ser anterior a la de inicio".to_string());
        }
    }

    Ok(())
}
