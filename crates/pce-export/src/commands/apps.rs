use anyhow::{Context, Result};
use tracing::{info, warn};

use pce_client::{PceApi, Transport};
use pce_flows::write_label_values;

use crate::args::AppsArgs;

pub async fn run<T: Transport>(api: &PceApi<T>, opts: &AppsArgs) -> Result<()> {
    let values = api
        .label_values(&opts.key)
        .await
        .with_context(|| format!("retrieving '{}' labels", opts.key))?;
    if values.is_empty() {
        warn!(key = %opts.key, "pce returned no label values");
    }

    write_label_values(&opts.output_file, &values)
        .with_context(|| format!("writing {}", opts.output_file.display()))?;
    info!(path = %opts.output_file.display(), values = values.len(), "label values exported");
    Ok(())
}
