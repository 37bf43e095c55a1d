//! Agregaciones para los reportes de gestión. Funciones puras sobre los
//! registros ya descargados del API.

use crate::calculo;
use crate::models::{
    AvanceObra, Empresa, FilaValorizacion, Obra, ResumenEmpresa, ResumenGeneral, ResumenMensual,
    TipoValorizacion, Valorizacion,
};
use crate::utils::{parsear_periodo, porcentaje, redondear};
use std::collections::BTreeMap;

fn de_obra<'a>(valorizaciones: &'a [Valorizacion], obra_id: i64) -> Vec<&'a Valorizacion> {
    valorizaciones.iter().filter(|v| v.obra_id == obra_id).collect()
}

/// Bruto aprobado o pagado de un tipo
fn valorizado(valorizaciones: &[&Valorizacion], tipo: TipoValorizacion) -> f64 {
    valorizaciones
        .iter()
        .filter(|v| v.tipo == tipo && v.estado.computa())
        .map(|v| v.monto_bruto)
        .sum()
}

pub fn resumen_general(
    obras: &[Obra],
    valorizaciones: &[Valorizacion],
    empresas: &[Empresa],
    total_consorcios: usize,
) -> ResumenGeneral {
    let mut obras_por_estado: BTreeMap<String, usize> = BTreeMap::new();
    for obra in obras {
        *obras_por_estado
            .entry(obra.estado.etiqueta().to_string())
            .or_insert(0) += 1;
    }

    let mut total_valorizado = 0.0;
    let mut suma_avances = 0.0;
    for obra in obras {
        let propias = obra
            .id
            .map(|id| de_obra(valorizaciones, id))
            .unwrap_or_default();
        let bruto = valorizado(&propias, TipoValorizacion::Ejecucion);
        total_valorizado += bruto;
        suma_avances += porcentaje(bruto, obra.monto_ejecucion);
    }

    let avance_financiero_promedio = if obras.is_empty() {
        0.0
    } else {
        redondear(suma_avances / obras.len() as f64)
    };

    ResumenGeneral {
        total_obras: obras.len(),
        obras_por_estado,
        monto_total_ejecucion: redondear(obras.iter().map(|o| o.monto_ejecucion).sum()),
        monto_total_supervision: redondear(obras.iter().map(|o| o.monto_supervision).sum()),
        total_valorizado: redondear(total_valorizado),
        avance_financiero_promedio,
        total_empresas: empresas.iter().filter(|e| e.activo && !e.es_consorcio).count(),
        total_consorcios,
    }
}

pub fn avance_obra(obra: &Obra, valorizaciones: &[Valorizacion]) -> AvanceObra {
    let obra_id = obra.id.unwrap_or_default();
    let mut propias: Vec<&Valorizacion> = de_obra(valorizaciones, obra_id);
    propias.sort_by(|a, b| {
        a.periodo
            .cmp(&b.periodo)
            .then(a.tipo.etiqueta().cmp(b.tipo.etiqueta()))
            .then(a.numero.cmp(&b.numero))
    });

    let mut acumulado = 0.0;
    let mut detalle = Vec::with_capacity(propias.len());
    for v in &propias {
        if v.tipo == TipoValorizacion::Ejecucion && v.estado.computa() {
            acumulado += v.monto_bruto;
        }
        detalle.push(FilaValorizacion {
            numero: v.numero,
            tipo: v.tipo.etiqueta().to_string(),
            periodo: v.periodo.clone(),
            estado: v.estado.etiqueta().to_string(),
            monto_bruto: v.monto_bruto,
            monto_neto: v.monto_neto,
            acumulado: redondear(acumulado),
            avance_fisico_pct: v.avance_fisico_pct,
        });
    }

    let valorizado_acumulado = redondear(valorizado(&propias, TipoValorizacion::Ejecucion));
    // el último periodo de ejecución manda, aunque declare menos avance
    let avance_fisico_pct = propias
        .iter()
        .filter(|v| v.tipo == TipoValorizacion::Ejecucion)
        .next_back()
        .map(|v| v.avance_fisico_pct)
        .unwrap_or(0.0);

    AvanceObra {
        obra_id,
        codigo: obra.codigo.clone(),
        nombre: obra.nombre.clone(),
        estado: obra.estado.etiqueta().to_string(),
        monto_ejecucion: obra.monto_ejecucion,
        valorizado_acumulado,
        saldo_por_valorizar: redondear((obra.monto_ejecucion - valorizado_acumulado).max(0.0)),
        avance_financiero_pct: calculo::avance_financiero(obra, valorizaciones),
        avance_fisico_pct,
        retenciones_acumuladas: redondear(propias.iter().map(|v| v.retencion).sum()),
        penalidades_acumuladas: redondear(propias.iter().map(|v| v.penalidad).sum()),
        num_valorizaciones: propias.len(),
        detalle,
    }
}

pub fn resumen_por_empresa(
    empresas: &[Empresa],
    obras: &[Obra],
    valorizaciones: &[Valorizacion],
) -> Vec<ResumenEmpresa> {
    let mut resultado: Vec<ResumenEmpresa> = empresas
        .iter()
        .filter_map(|empresa| {
            let empresa_id = empresa.id?;
            let mut fila = ResumenEmpresa {
                empresa_id,
                ruc: empresa.ruc.clone(),
                razon_social: empresa.razon_social.clone(),
                obras_como_contratista: 0,
                obras_como_supervisor: 0,
                monto_contratado: 0.0,
                monto_valorizado: 0.0,
            };

            for obra in obras {
                let propias = obra
                    .id
                    .map(|id| de_obra(valorizaciones, id))
                    .unwrap_or_default();

                if obra.contratista_id == Some(empresa_id) {
                    fila.obras_como_contratista += 1;
                    fila.monto_contratado += obra.monto_ejecucion;
                    fila.monto_valorizado += valorizado(&propias, TipoValorizacion::Ejecucion);
                }
                if obra.supervisor_id == Some(empresa_id) {
                    fila.obras_como_supervisor += 1;
                    fila.monto_contratado += obra.monto_supervision;
                    fila.monto_valorizado += valorizado(&propias, TipoValorizacion::Supervision);
                }
            }

            fila.monto_contratado = redondear(fila.monto_contratado);
            fila.monto_valorizado = redondear(fila.monto_valorizado);
            Some(fila)
        })
        .collect();

    resultado.sort_by(|a, b| {
        b.monto_contratado
            .partial_cmp(&a.monto_contratado)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.razon_social.cmp(&b.razon_social))
    });
    resultado
}

/// Totales por periodo de todas las valorizaciones (excepto borradores)
pub fn resumen_mensual(valorizaciones: &[Valorizacion], anio: Option<i32>) -> Vec<ResumenMensual> {
    let mut por_periodo: BTreeMap<String, ResumenMensual> = BTreeMap::new();

    for v in valorizaciones {
        if v.estado == crate::models::EstadoValorizacion::Borrador {
            continue;
        }
        let Some((anio_v, _)) = parsear_periodo(&v.periodo) else {
            continue;
        };
        if anio.is_some_and(|a| a != anio_v) {
            continue;
        }

        let fila = por_periodo
            .entry(v.periodo.clone())
            .or_insert_with(|| ResumenMensual {
                periodo: v.periodo.clone(),
                total_ejecucion: 0.0,
                total_supervision: 0.0,
                igv: 0.0,
                monto_neto: 0.0,
                num_valorizaciones: 0,
            });

        match v.tipo {
            TipoValorizacion::Ejecucion => fila.total_ejecucion += v.monto_bruto,
            TipoValorizacion::Supervision => fila.total_supervision += v.monto_bruto,
        }
        fila.igv += v.igv;
        fila.monto_neto += v.monto_neto;
        fila.num_valorizaciones += 1;
    }

    por_periodo
        .into_values()
        .map(|mut fila| {
            fila.total_ejecucion = redondear(fila.total_ejecucion);
            fila.total_supervision = redondear(fila.total_supervision);
            fila.igv = redondear(fila.igv);
            fila.monto_neto = redondear(fila.monto_neto);
            fila
        })
        .collect()
}
