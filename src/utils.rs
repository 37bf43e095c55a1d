/// Redondea un monto a 2 decimales (céntimos)
pub fn redondear(valor: f64) -> f64 {
    (valor * 100.0).round() / 100.0
}

/// Formatea un monto en soles: "S/ 1,234,567.89"
pub fn formatear_soles(valor: f64) -> String {
    let negativo = valor < 0.0;
    let texto = format!("{:.2}", valor.abs());
    let (entero, decimales) = texto.split_once('.').unwrap_or((texto.as_str(), "00"));

    let mut agrupado = String::with_capacity(entero.len() + entero.len() / 3);
    for (i, ch) in entero.chars().enumerate() {
        if i > 0 && (entero.len() - i) % 3 == 0 {
            agrupado.push(',');
        }
        agrupado.push(ch);
    }

    format!("{}S/ {}.{}", if negativo { "-" } else { "" }, agrupado, decimales)
}

/// Interpreta un periodo "YYYY-MM". Retorna (año, mes) si es válido.
/// Solo dígitos: "2024-+3" o "+024-03" no son periodos.
pub fn parsear_periodo(periodo: &str) -> Option<(i32, u32)> {
    let (anio, mes) = periodo.split_once('-')?;
    if anio.len() != 4 || mes.len() != 2 {
        return None;
    }
    if !anio.bytes().chain(mes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let anio: i32 = anio.parse().ok()?;
    let mes: u32 = mes.parse().ok()?;
    if !(1..=12).contains(&mes) {
        return None;
    }
    Some((anio, mes))
}

/// Porcentaje seguro: 0 si la base es 0
pub fn porcentaje(parte: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        redondear(parte / total * 100.0)
    }
}
