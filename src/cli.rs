use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "obras",
    version,
    about = "Control de obras públicas: empresas, consorcios, obras, valorizaciones y reportes"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Salida JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Ruta de la base de configuración local")]
    pub db: Option<PathBuf>,
    #[arg(long, global = true, help = "URL base del API (prioridad sobre la configuración)")]
    pub api_url: Option<String>,
    #[arg(short, long, global = true, help = "Bitácora detallada en stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Empresas contratistas y supervisoras
    Empresas {
        #[command(subcommand)]
        command: EmpresaCommands,
    },
    /// Consorcios y sus integrantes
    Consorcios {
        #[command(subcommand)]
        command: ConsorcioCommands,
    },
    /// Obras (contratos de ejecución)
    Obras {
        #[command(subcommand)]
        command: ObraCommands,
    },
    /// Valorizaciones de ejecución y supervisión
    Valorizaciones {
        #[command(subcommand)]
        command: ValorizacionCommands,
    },
    /// Reportes de gestión
    Reportes {
        #[command(subcommand)]
        command: ReporteCommands,
    },
    /// Calcula la penalidad por mora
    Penalidad {
        #[arg(long)]
        monto: f64,
        #[arg(long)]
        plazo: u32,
        #[arg(long)]
        dias_atraso: u32,
    },
    /// Validaciones sueltas
    Validar {
        #[command(subcommand)]
        command: ValidarCommands,
    },
    /// Configuración local
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum EmpresaCommands {
    Listar {
        #[arg(long, default_value_t = false, help = "Incluir empresas inactivas")]
        todas: bool,
    },
    Buscar {
        termino: String,
    },
    Ver {
        id: i64,
    },
    Crear {
        #[arg(long)]
        archivo: PathBuf,
    },
    Actualizar {
        #[arg(long)]
        archivo: PathBuf,
    },
    Desactivar {
        id: i64,
    },
    Eliminar {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConsorcioCommands {
    Listar,
    Ver {
        id: i64,
    },
    Crear {
        #[arg(long)]
        archivo: PathBuf,
    },
    Actualizar {
        #[arg(long)]
        archivo: PathBuf,
    },
    Eliminar {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ObraCommands {
    Listar,
    Ver {
        id: i64,
    },
    Crear {
        #[arg(long)]
        archivo: PathBuf,
    },
    Actualizar {
        #[arg(long)]
        archivo: PathBuf,
    },
    Eliminar {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ValorizacionCommands {
    Listar {
        #[arg(long)]
        obra: i64,
    },
    Ver {
        id: i64,
    },
    /// Registra una valorización en borrador a partir de un JSON
    Registrar {
        #[arg(long)]
        archivo: PathBuf,
    },
    /// Muestra el cálculo de una valorización sin registrarla
    Previsualizar {
        #[arg(long)]
        archivo: PathBuf,
    },
    Actualizar {
        id: i64,
        #[arg(long)]
        archivo: PathBuf,
    },
    Estado {
        id: i64,
        #[arg(value_enum)]
        estado: EstadoArg,
        #[arg(long)]
        observaciones: Option<String>,
    },
    Eliminar {
        id: i64,
    },
    Exportar {
        #[arg(long)]
        obra: i64,
        #[arg(long)]
        csv: String,
    },
    /// Cálculo sin conexión con porcentajes explícitos
    Calcular {
        #[arg(long)]
        bruto: f64,
        #[arg(long, default_value_t = 0.0)]
        adelanto_directo_pct: f64,
        #[arg(long, default_value_t = 0.0)]
        retencion_pct: f64,
        #[arg(long, default_value_t = 0.0)]
        materiales: f64,
        #[arg(long, default_value_t = 0.0)]
        penalidad: f64,
        #[arg(long)]
        igv: Option<f64>,
        #[arg(long, help = "Saldo del adelanto directo por amortizar")]
        saldo_adelanto: Option<f64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EstadoArg {
    Presentada,
    Observada,
    Aprobada,
    Pagada,
}

#[derive(Args, Debug, Default)]
pub struct SalidaArgs {
    #[arg(long, help = "Exportar a CSV")]
    pub csv: Option<String>,
    #[arg(long, help = "Exportar a PDF")]
    pub pdf: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ReporteCommands {
    General {
        #[command(flatten)]
        salida: SalidaArgs,
    },
    Obra {
        id: i64,
        #[command(flatten)]
        salida: SalidaArgs,
    },
    Empresas {
        #[command(flatten)]
        salida: SalidaArgs,
    },
    Mensual {
        #[arg(long)]
        anio: Option<i32>,
        #[command(flatten)]
        salida: SalidaArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ValidarCommands {
    Ruc { ruc: String },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Ver,
    Fijar { clave: String, valor: String },
}
