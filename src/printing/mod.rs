use crate::commands::exportar::tabla_reporte;
use crate::models::{ContenidoReporte, Reporte};
use crate::utils::formatear_soles;
use genpdf::elements::{Break, FrameCellDecorator, Paragraph, StyledElement, TableLayout};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Document, Element, Margins, SimplePageDecorator};
use std::collections::HashMap;
use std::path::Path;

fn p(text: &str, style: Style) -> StyledElement<Paragraph> {
    Paragraph::new(text).styled(style)
}

fn p_aligned(text: &str, style: Style, align: Alignment) -> impl Element {
    Paragraph::new(text).aligned(align).styled(style)
}

/// Celda con padding; los montos se alinean a la derecha
fn celda(text: &str, style: Style) -> impl Element {
    let numerica = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == ',');
    let align = if numerica { Alignment::Right } else { Alignment::Left };
    Paragraph::new(text)
        .aligned(align)
        .styled(style)
        .padded(Margins::trbl(1, 2, 1, 2))
}

/// Líneas destacadas antes de la tabla, según el tipo de reporte
fn resumen_destacado(reporte: &Reporte) -> Vec<String> {
    match &reporte.contenido {
        ContenidoReporte::General(r) => vec![
            format!("Obras registradas: {}", r.total_obras),
            format!("Monto contratado (ejecución): {}", formatear_soles(r.monto_total_ejecucion)),
            format!("Total valorizado: {}", formatear_soles(r.total_valorizado)),
        ],
        ContenidoReporte::Obra(a) => vec![
            format!("Estado: {}", a.estado),
            format!("Monto de ejecución: {}", formatear_soles(a.monto_ejecucion)),
            format!("Valorizado acumulado: {}", formatear_soles(a.valorizado_acumulado)),
            format!("Saldo por valorizar: {}", formatear_soles(a.saldo_por_valorizar)),
            format!(
                "Avance financiero: {:.2}%   Avance físico: {:.2}%",
                a.avance_financiero_pct, a.avance_fisico_pct
            ),
            format!(
                "Retenciones: {}   Penalidades: {}",
                formatear_soles(a.retenciones_acumuladas),
                formatear_soles(a.penalidades_acumuladas)
            ),
        ],
        ContenidoReporte::Empresas(e) => vec![format!("Empresas: {}", e.len())],
        ContenidoReporte::Mensual(m) => vec![format!("Periodos: {}", m.len())],
    }
}

/// Genera el PDF (A4) de un reporte de gestión.
/// Las fuentes LiberationSans-*.ttf se buscan en `directorio_fuentes`.
pub fn generar_reporte_pdf(reporte: &Reporte, config: &HashMap<String, String>) -> Result<Vec<u8>, String> {
    let fonts_dir = config
        .get("directorio_fuentes")
        .filter(|d| !d.is_empty())
        .map(String::as_str)
        .unwrap_or("fonts");

    if !Path::new(fonts_dir).is_dir() {
        return Err(format!(
            "No se encontró el directorio de fuentes '{}'. Configure 'directorio_fuentes' con la carpeta de LiberationSans-*.ttf",
            fonts_dir
        ));
    }

    let font_family = genpdf::fonts::from_files(fonts_dir, "LiberationSans", None)
        .map_err(|e| format!("Error cargando fuentes: {}", e))?;

    let mut doc = Document::new(font_family);
    doc.set_title(reporte.titulo.as_str());

    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(Margins::trbl(15, 15, 15, 15));
    doc.set_page_decorator(decorator);

    let s_normal = Style::new().with_font_size(9);
    let s_bold = Style::new().with_font_size(9).bold();
    let s_title = Style::new().with_font_size(14).bold();
    let s_entidad = Style::new().with_font_size(11).bold();
    let s_pie = Style::new().with_font_size(7).with_color(Color::Greyscale(128));

    let entidad = config.get("nombre_entidad").map(|s| s.as_str()).unwrap_or("");
    if !entidad.is_empty() {
        doc.push(p_aligned(entidad, s_entidad, Alignment::Center));
    }
    doc.push(p_aligned(&reporte.titulo, s_title, Alignment::Center));
    doc.push(p_aligned(
        &format!("Generado: {}", reporte.generado_en),
        s_pie,
        Alignment::Center,
    ));
    doc.push(Break::new(1.0));

    for linea in resumen_destacado(reporte) {
        doc.push(p(&linea, s_normal));
    }
    doc.push(Break::new(1.0));

    let (encabezados, filas) = tabla_reporte(reporte);
    let mut tabla = TableLayout::new(vec![1; encabezados.len()]);
    tabla.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let mut cabecera = tabla.row();
    for encabezado in &encabezados {
        cabecera.push_element(celda(encabezado, s_bold));
    }
    cabecera
        .push()
        .map_err(|e| format!("Error tabla encabezado: {}", e))?;

    for fila in &filas {
        let mut row = tabla.row();
        for valor in fila {
            row.push_element(celda(valor, s_normal));
        }
        row.push().map_err(|e| format!("Error tabla fila: {}", e))?;
    }
    doc.push(tabla);

    if filas.is_empty() {
        doc.push(Break::new(0.5));
        doc.push(p("Sin registros para el periodo consultado", s_normal));
    }

    let mut buffer: Vec<u8> = Vec::new();
    doc.render(&mut buffer)
        .map_err(|e| format!("Error generando PDF: {}", e))?;

    Ok(buffer)
}
