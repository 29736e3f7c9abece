use anyhow::{Context, Result};
use tracing::info;

use pce_client::{PceApi, Transport};
use pce_flows::{
    FlowProcessor, LabelIndex, build_traffic_query, load_traffic_config, write_export_csv,
};

use crate::args::FlowsArgs;

pub async fn run<T: Transport>(api: &PceApi<T>, opts: &FlowsArgs) -> Result<()> {
    let config = load_traffic_config(&opts.query_file, &opts.traffic_config)
        .with_context(|| format!("loading query file {}", opts.query_file.display()))?;

    api.check_connection().await.context("connecting to pce")?;

    // One snapshot per run; every href below is resolved against it.
    let labels = api.labels(None).await.context("fetching label snapshot")?;
    let index = LabelIndex::build(labels.into_records());

    let query = build_traffic_query(&config, &index, &opts.query_name)
        .context("building traffic query")?;
    let flows = api
        .traffic_flows(&query)
        .await
        .context("running traffic query")?;
    info!(records = flows.len(), "records retrieved from pce");

    let processor = FlowProcessor::new(
        &index,
        FlowProcessor::parse_app_keys(&opts.algosec_label),
        opts.label_concat.as_str(),
    );
    let export = processor.build_export_set(&flows.records);

    write_export_csv(&opts.output_file, &export.rows)
        .with_context(|| format!("writing {}", opts.output_file.display()))?;
    info!(
        rows = export.rows.len(),
        "final record count after filtering and de-duplication"
    );
    Ok(())
}
