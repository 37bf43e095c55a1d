use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TipoEmpresa {
    Contratista,
    Supervisora,
    Ambos,
}

impl TipoEmpresa {
    pub fn puede_ejecutar(self) -> bool {
        matches!(self, TipoEmpresa::Contratista | TipoEmpresa::Ambos)
    }

    pub fn puede_supervisar(self) -> bool {
        matches!(self, TipoEmpresa::Supervisora | TipoEmpresa::Ambos)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Empresa {
    pub id: Option<i64>,
    pub ruc: String,
    pub razon_social: String,
    #[serde(default)]
    pub nombre_comercial: Option<String>,
    pub tipo: TipoEmpresa,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub representante_legal: Option<String>,
    #[serde(default)]
    pub es_consorcio: bool,
    #[serde(default = "activo_por_defecto")]
    pub activo: bool,
}

fn activo_por_defecto() -> bool {
    true
}
