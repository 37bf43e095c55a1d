use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Línea de bitácora: `[2024-05-01 10:30:00.123] INFO mensaje campo=valor`
pub struct FormatoBitacora;

impl<S, N> FormatEvent<S, N> for FormatoBitacora
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        write!(writer, "[{}] {:>5} ", timestamp, event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Inicializa la bitácora en stderr. `RUST_LOG` tiene prioridad sobre `detallado`.
pub fn iniciar(detallado: bool) {
    let filtro = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if detallado { "obras_control=debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filtro)
        .with_writer(std::io::stderr)
        .event_format(FormatoBitacora)
        .try_init()
        .ok();
}
