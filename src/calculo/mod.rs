pub mod penalidad;
pub mod valorizacion;

pub use penalidad::*;
pub use valorizacion::*;
