//! Bridge command - conversion requests over stdio
//!
//! Each stdin line is an inbound event, `{"origin": ..., "data": {...}}`.
//! Each reply is one stdout line, `{"targetOrigin": ..., "message": {...}}`.

use crate::cli::PageArgs;
use crate::context::{Context, Loader, PageInput};
use crate::output::print_json;
use anyhow::Result;
use composable_bridge::{
    BridgeError, Dispatcher, InboundEvent, MessagingService, OutboundMessage, Outbox,
    ServiceSettings,
};
use composable_html::HtmlSource;
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a, 'm> {
    target_origin: &'a str,
    message: &'a OutboundMessage<'m>,
}

/// Writes replies as JSON lines on stdout
struct StdoutOutbox;

impl Outbox for StdoutOutbox {
    fn post(&self, message: &OutboundMessage<'_>, target_origin: &str) {
        let envelope = Envelope {
            target_origin,
            message,
        };
        let written = serde_json::to_string(&envelope)
            .map_err(anyhow::Error::from)
            .and_then(|json| print_json(&json).map_err(anyhow::Error::from));
        if let Err(e) = written {
            error!("failed to write reply: {}", e);
        }
    }
}

type Service = MessagingService<HtmlSource<Loader>, StdoutOutbox>;

/// Serves requests until stdin closes
///
/// # Arguments
///
/// * `ctx` - loaded configuration
/// * `page` - page answering the requests
/// * `export_on_exit` - save the last result to `export.directory` at the end
pub fn run(ctx: &Context, page: &PageArgs, export_on_exit: bool) -> Result<()> {
    let input = PageInput::load(page)?;
    let service = MessagingService::new(
        input.into_source(),
        StdoutOutbox,
        ServiceSettings::from(&ctx.config),
    );
    let export_dir = export_on_exit.then(|| ctx.config.export.directory.clone());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(serve(service, export_dir))
}

async fn serve(service: Service, export_dir: Option<PathBuf>) -> Result<()> {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(service)?;
    info!("bridge ready, reading requests from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let event: InboundEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!("ignoring malformed input line: {}", e);
                continue;
            }
        };
        if let Some(outcome) = dispatcher.dispatch(event).await {
            debug!(?outcome, "message handled");
        }
    }

    if let (Some(dir), Some(service)) = (export_dir, dispatcher.handler()) {
        match service.export_latest(&dir) {
            Ok(path) => info!("exported session result to {}", path.display()),
            Err(BridgeError::NothingToExport) => info!("no result to export"),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
