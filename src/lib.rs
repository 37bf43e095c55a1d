pub mod api;
pub mod calculo;
pub mod cli;
pub mod commands;
pub mod db;
pub mod logging;
pub mod models;
pub mod printing;
pub mod resumen;
pub mod salida;
pub mod state;
pub mod utils;
pub mod validacion;

use clap::Parser;
use cli::{
    Cli, Commands, ConfigCommands, ConsorcioCommands, EmpresaCommands, EstadoArg, ObraCommands,
    ReporteCommands, SalidaArgs, ValidarCommands, ValorizacionCommands,
};
use db::Database;
use models::{EstadoValorizacion, Reporte};
use serde::de::DeserializeOwned;
use state::AppState;
use std::collections::HashMap;
use std::path::Path;

/// Punto de entrada del binario. Retorna el código de salida.
pub fn run() -> i32 {
    let cli = Cli::parse();
    logging::iniciar(cli.verbose);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: no se pudo iniciar el runtime: {}", e);
            return 1;
        }
    };

    match runtime.block_on(ejecutar(cli)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn leer_json<T: DeserializeOwned>(ruta: &Path) -> Result<T, String> {
    let contenido = std::fs::read_to_string(ruta)
        .map_err(|e| format!("Error leyendo {}: {}", ruta.display(), e))?;
    serde_json::from_str(&contenido).map_err(|e| format!("JSON inválido en {}: {}", ruta.display(), e))
}

fn abrir_db(cli: &Cli) -> Result<Database, String> {
    Database::new(cli.db.as_deref()).map_err(|e| format!("Error abriendo la base local: {}", e))
}

fn abrir_app(cli: &Cli) -> Result<AppState, String> {
    AppState::iniciar(abrir_db(cli)?, cli.api_url.clone())
}

fn estado_desde_arg(arg: EstadoArg) -> EstadoValorizacion {
    match arg {
        EstadoArg::Presentada => EstadoValorizacion::Presentada,
        EstadoArg::Observada => EstadoValorizacion::Observada,
        EstadoArg::Aprobada => EstadoValorizacion::Aprobada,
        EstadoArg::Pagada => EstadoValorizacion::Pagada,
    }
}

fn emitir_reporte(app: &AppState, json: bool, reporte: &Reporte, destino: &SalidaArgs) -> Result<(), String> {
    if let Some(ruta) = destino.csv.as_deref() {
        let mensaje = commands::exportar::exportar_reporte_csv(app, reporte, ruta)?;
        eprintln!("{} en {}", mensaje, ruta);
    }
    if let Some(ruta) = destino.pdf.as_deref() {
        let ruta = commands::impresion::imprimir_reporte_pdf(app, reporte, ruta)?;
        eprintln!("PDF generado en {}", ruta);
    }
    salida::imprimir(json, reporte, salida::reporte)
}

async fn ejecutar(cli: Cli) -> Result<(), String> {
    let json = cli.json;

    match &cli.command {
        Commands::Validar { command } => match command {
            ValidarCommands::Ruc { ruc } => {
                validacion::validar_ruc(ruc)?;
                let dv = validacion::digito_verificador_ruc_correcto(ruc);
                let resultado = serde_json::json!({
                    "ruc": ruc,
                    "valido": true,
                    "digito_verificador_correcto": dv,
                });
                salida::imprimir(json, &resultado, |_| {
                    format!(
                        "RUC {} válido (dígito verificador {})",
                        ruc,
                        if dv { "correcto" } else { "no coincide" }
                    )
                })
            }
        },

        Commands::Penalidad {
            monto,
            plazo,
            dias_atraso,
        } => {
            let p = calculo::calcular_penalidad(*monto, *plazo, *dias_atraso)?;
            salida::imprimir(json, &p, salida::penalidad)
        }

        Commands::Config { command } => {
            let db = abrir_db(&cli)?;
            match command {
                ConfigCommands::Ver => {
                    let config = commands::config::obtener_config(&db)?;
                    let mut claves: Vec<(&String, &String)> = config.iter().collect();
                    claves.sort();
                    salida::imprimir(json, &config, |_| {
                        claves
                            .iter()
                            .map(|(k, v)| {
                                // no mostrar el token en claro
                                if k.as_str() == "api_token" && !v.is_empty() {
                                    format!("{} = ****", k)
                                } else {
                                    format!("{} = {}", k, v)
                                }
                            })
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                }
                ConfigCommands::Fijar { clave, valor } => {
                    let mut cambios = HashMap::new();
                    cambios.insert(clave.clone(), valor.clone());
                    commands::config::guardar_config(&db, cambios)?;
                    println!("{} actualizado", clave);
                    Ok(())
                }
            }
        }

        Commands::Valorizaciones {
            command:
                ValorizacionCommands::Calcular {
                    bruto,
                    adelanto_directo_pct,
                    retencion_pct,
                    materiales,
                    penalidad,
                    igv,
                    saldo_adelanto,
                },
        } => {
            let params = calculo::ParametrosCalculo {
                igv_pct: igv.unwrap_or(calculo::IGV_PORCENTAJE),
                adelanto_directo_pct: *adelanto_directo_pct,
                retencion_pct: *retencion_pct,
                saldo_adelanto_directo: *saldo_adelanto,
            };
            let entrada = calculo::EntradaCalculo {
                monto_bruto: *bruto,
                amortizacion_adelanto_materiales: *materiales,
                penalidad: *penalidad,
            };
            let d = calculo::calcular_valorizacion(&entrada, &params);
            salida::imprimir(json, &d, salida::desglose)
        }

        Commands::Empresas { command } => {
            let app = abrir_app(&cli)?;
            use commands::empresas::*;
            match command {
                EmpresaCommands::Listar { todas } => {
                    let lista = listar_empresas(&app, *todas).await?;
                    salida::imprimir(json, &lista, |l| salida::empresas(l))
                }
                EmpresaCommands::Buscar { termino } => {
                    let lista = buscar_empresas(&app, termino).await?;
                    salida::imprimir(json, &lista, |l| salida::empresas(l))
                }
                EmpresaCommands::Ver { id } => {
                    let e = obtener_empresa(&app, *id).await?;
                    salida::imprimir(json, &e, salida::empresa)
                }
                EmpresaCommands::Crear { archivo } => {
                    refrescar_empresas(&app).await?;
                    let e = crear_empresa(&app, leer_json(archivo)?).await?;
                    salida::imprimir(json, &e, salida::empresa)
                }
                EmpresaCommands::Actualizar { archivo } => {
                    refrescar_empresas(&app).await?;
                    let e = actualizar_empresa(&app, leer_json(archivo)?).await?;
                    salida::imprimir(json, &e, salida::empresa)
                }
                EmpresaCommands::Desactivar { id } => {
                    let e = desactivar_empresa(&app, *id).await?;
                    salida::imprimir(json, &e, salida::empresa)
                }
                EmpresaCommands::Eliminar { id } => {
                    commands::obras::refrescar_obras(&app).await?;
                    commands::consorcios::refrescar_consorcios(&app).await?;
                    eliminar_empresa(&app, *id).await?;
                    println!("Empresa {} eliminada", id);
                    Ok(())
                }
            }
        }

        Commands::Consorcios { command } => {
            let app = abrir_app(&cli)?;
            use commands::consorcios::*;
            match command {
                ConsorcioCommands::Listar => {
                    let lista = listar_consorcios(&app).await?;
                    salida::imprimir(json, &lista, |l| salida::consorcios(l))
                }
                ConsorcioCommands::Ver { id } => {
                    let c = obtener_consorcio(&app, *id).await?;
                    salida::imprimir(json, &c, salida::consorcio)
                }
                ConsorcioCommands::Crear { archivo } => {
                    commands::empresas::refrescar_empresas(&app).await?;
                    let c = crear_consorcio(&app, leer_json(archivo)?).await?;
                    salida::imprimir(json, &c, salida::consorcio)
                }
                ConsorcioCommands::Actualizar { archivo } => {
                    commands::empresas::refrescar_empresas(&app).await?;
                    let c = actualizar_consorcio(&app, leer_json(archivo)?).await?;
                    salida::imprimir(json, &c, salida::consorcio)
                }
                ConsorcioCommands::Eliminar { id } => {
                    eliminar_consorcio(&app, *id).await?;
                    println!("Consorcio {} eliminado", id);
                    Ok(())
                }
            }
        }

        Commands::Obras { command } => {
            let app = abrir_app(&cli)?;
            use commands::obras::*;
            match command {
                ObraCommands::Listar => {
                    let lista = listar_obras(&app).await?;
                    salida::imprimir(json, &lista, |l| salida::obras(l))
                }
                ObraCommands::Ver { id } => {
                    let o = obtener_obra(&app, *id).await?;
                    salida::imprimir(json, &o, salida::obra)
                }
                ObraCommands::Crear { archivo } => {
                    commands::empresas::refrescar_empresas(&app).await?;
                    refrescar_obras(&app).await?;
                    let o = crear_obra(&app, leer_json(archivo)?).await?;
                    salida::imprimir(json, &o, salida::obra)
                }
                ObraCommands::Actualizar { archivo } => {
                    commands::empresas::refrescar_empresas(&app).await?;
                    refrescar_obras(&app).await?;
                    let o = actualizar_obra(&app, leer_json(archivo)?).await?;
                    salida::imprimir(json, &o, salida::obra)
                }
                ObraCommands::Eliminar { id } => {
                    eliminar_obra(&app, *id).await?;
                    println!("Obra {} eliminada", id);
                    Ok(())
                }
            }
        }

        Commands::Valorizaciones { command } => {
            let app = abrir_app(&cli)?;
            use commands::valorizaciones::*;
            match command {
                ValorizacionCommands::Listar { obra } => {
                    let lista = listar_valorizaciones(&app, *obra).await?;
                    salida::imprimir(json, &lista, |l| salida::valorizaciones(l))
                }
                ValorizacionCommands::Ver { id } => {
                    let v = obtener_valorizacion(&app, *id).await?;
                    salida::imprimir(json, &v, salida::valorizacion)
                }
                ValorizacionCommands::Registrar { archivo } => {
                    let v = registrar_valorizacion(&app, leer_json(archivo)?).await?;
                    salida::imprimir(json, &v, salida::valorizacion)
                }
                ValorizacionCommands::Previsualizar { archivo } => {
                    let nueva: models::NuevaValorizacion = leer_json(archivo)?;
                    let d = calcular_valorizacion(&app, &nueva).await?;
                    salida::imprimir(json, &d, salida::desglose)
                }
                ValorizacionCommands::Actualizar { id, archivo } => {
                    let v = actualizar_valorizacion(&app, *id, leer_json(archivo)?).await?;
                    salida::imprimir(json, &v, salida::valorizacion)
                }
                ValorizacionCommands::Estado {
                    id,
                    estado,
                    observaciones,
                } => {
                    let v = cambiar_estado_valorizacion(
                        &app,
                        *id,
                        estado_desde_arg(*estado),
                        observaciones.clone(),
                    )
                    .await?;
                    salida::imprimir(json, &v, salida::valorizacion)
                }
                ValorizacionCommands::Eliminar { id } => {
                    eliminar_valorizacion(&app, *id).await?;
                    println!("Valorización {} eliminada", id);
                    Ok(())
                }
                ValorizacionCommands::Exportar { obra, csv } => {
                    let mensaje = commands::exportar::exportar_valorizaciones_csv(&app, *obra, csv).await?;
                    println!("{} en {}", mensaje, csv);
                    Ok(())
                }
                // resuelto arriba sin conexión
                ValorizacionCommands::Calcular { .. } => Ok(()),
            }
        }

        Commands::Reportes { command } => {
            let app = abrir_app(&cli)?;
            use commands::reportes::*;
            let (reporte, destino) = match command {
                ReporteCommands::General { salida: d } => (reporte_general(&app).await?, d),
                ReporteCommands::Obra { id, salida: d } => (reporte_avance_obra(&app, *id).await?, d),
                ReporteCommands::Empresas { salida: d } => (reporte_empresas(&app).await?, d),
                ReporteCommands::Mensual { anio, salida: d } => (reporte_mensual(&app, *anio).await?, d),
            };
            emitir_reporte(&app, json, &reporte, destino)
        }
    }
}
