use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IntegranteConsorcio {
    pub empresa_id: i64,
    pub ruc: String,
    #[serde(default)]
    pub razon_social: Option<String>,
    pub porcentaje_participacion: f64,
    #[serde(default)]
    pub es_lider: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Consorcio {
    pub id: Option<i64>,
    /// Registro propio del consorcio como empresa (es_consorcio = true)
    #[serde(default)]
    pub empresa_id: Option<i64>,
    pub nombre: String,
    #[serde(default)]
    pub ruc: Option<String>,
    #[serde(default)]
    pub representante_legal: Option<String>,
    pub integrantes: Vec<IntegranteConsorcio>,
    #[serde(default = "activo_por_defecto")]
    pub activo: bool,
}

fn activo_por_defecto() -> bool {
    true
}

impl Consorcio {
    pub fn suma_participacion(&self) -> f64 {
        self.integrantes
            .iter()
            .map(|i| i.porcentaje_participacion)
            .sum()
    }
}
