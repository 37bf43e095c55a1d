pub mod empresa;
pub mod consorcio;
pub mod obra;
pub mod valorizacion;
pub mod reporte;

pub use empresa::*;
pub use consorcio::*;
pub use obra::*;
pub use valorizacion::*;
pub use reporte::*;
