//! Presentación en consola de los resultados de los comandos.

use crate::calculo::{DesgloseValorizacion, Penalidad};
use crate::commands::exportar::tabla_reporte;
use crate::models::{Consorcio, Empresa, Obra, Reporte, Valorizacion};
use crate::utils::formatear_soles;
use serde::Serialize;

/// Imprime JSON si se pidió, o el texto legible
pub fn imprimir<T: Serialize>(json: bool, valor: &T, texto: impl FnOnce(&T) -> String) -> Result<(), String> {
    if json {
        let salida = serde_json::to_string_pretty(valor).map_err(|e| e.to_string())?;
        println!("{}", salida);
    } else {
        println!("{}", texto(valor));
    }
    Ok(())
}

pub fn empresa(e: &Empresa) -> String {
    let tipo = serde_json::to_value(e.tipo)
        .ok()
        .and_then(|v| v.as_str().map(str::to_uppercase))
        .unwrap_or_default();
    format!(
        "{:>5}  {}  {:<12} {}{}",
        e.id.map(|i| i.to_string()).unwrap_or_default(),
        e.ruc,
        tipo,
        e.razon_social,
        if e.activo { "" } else { " (inactiva)" }
    )
}

pub fn empresas(lista: &[Empresa]) -> String {
    if lista.is_empty() {
        return "Sin empresas registradas".to_string();
    }
    lista.iter().map(empresa).collect::<Vec<_>>().join("\n")
}

pub fn consorcio(c: &Consorcio) -> String {
    let mut lineas = vec![format!(
        "{:>5}  {}{}",
        c.id.map(|i| i.to_string()).unwrap_or_default(),
        c.nombre,
        c.ruc.as_deref().map(|r| format!("  RUC {}", r)).unwrap_or_default()
    )];
    for i in &c.integrantes {
        lineas.push(format!(
            "         {} {:>6.2}%  {}{}",
            i.ruc,
            i.porcentaje_participacion,
            i.razon_social.as_deref().unwrap_or(""),
            if i.es_lider { " (líder)" } else { "" }
        ));
    }
    lineas.join("\n")
}

pub fn consorcios(lista: &[Consorcio]) -> String {
    if lista.is_empty() {
        return "Sin consorcios registrados".to_string();
    }
    lista.iter().map(consorcio).collect::<Vec<_>>().join("\n")
}

pub fn obra(o: &Obra) -> String {
    format!(
        "{:>5}  {:<10} {:<13} {:>18}  {}",
        o.id.map(|i| i.to_string()).unwrap_or_default(),
        o.codigo,
        o.estado.etiqueta(),
        formatear_soles(o.monto_ejecucion),
        o.nombre
    )
}

pub fn obras(lista: &[Obra]) -> String {
    if lista.is_empty() {
        return "Sin obras registradas".to_string();
    }
    lista.iter().map(obra).collect::<Vec<_>>().join("\n")
}

pub fn valorizacion(v: &Valorizacion) -> String {
    format!(
        "{:>5}  N° {:<3} {:<11} {}  {:<10} bruto {:>16}  neto {:>16}",
        v.id.map(|i| i.to_string()).unwrap_or_default(),
        v.numero,
        v.tipo.etiqueta(),
        v.periodo,
        v.estado.etiqueta(),
        formatear_soles(v.monto_bruto),
        formatear_soles(v.monto_neto)
    )
}

pub fn valorizaciones(lista: &[Valorizacion]) -> String {
    if lista.is_empty() {
        return "Sin valorizaciones".to_string();
    }
    lista.iter().map(valorizacion).collect::<Vec<_>>().join("\n")
}

pub fn desglose(d: &DesgloseValorizacion) -> String {
    [
        ("Monto bruto", d.monto_bruto),
        ("(-) Amortización adelanto directo", d.amortizacion_adelanto_directo),
        ("(-) Amortización adelanto materiales", d.amortizacion_adelanto_materiales),
        ("(-) Retención", d.retencion),
        ("(-) Penalidad", d.penalidad),
        ("Total deducciones", d.total_deducciones()),
        ("Subtotal", d.subtotal),
        ("(+) IGV", d.igv),
        ("Monto neto", d.monto_neto),
    ]
    .iter()
    .map(|(etiqueta, monto)| format!("{:<38}{:>18}", etiqueta, formatear_soles(*monto)))
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn penalidad(p: &Penalidad) -> String {
    format!(
        "Factor F: {:.2}\nPenalidad diaria: {}\nDías de atraso: {}\nPenalidad: {}{}",
        p.factor,
        formatear_soles(p.penalidad_diaria),
        p.dias_atraso,
        formatear_soles(p.monto),
        if p.alcanzo_tope { " (tope 10%)" } else { "" }
    )
}

pub fn reporte(r: &Reporte) -> String {
    let (encabezados, filas) = tabla_reporte(r);
    let mut lineas = vec![r.titulo.clone(), format!("Generado: {}", r.generado_en), String::new()];
    lineas.push(encabezados.join(" | "));
    for fila in filas {
        lineas.push(fila.join(" | "));
    }
    lineas.join("\n")
}
