mod apps;
mod flows;

use anyhow::{Context, Result};

use pce_client::PceApi;

use crate::args::{Args, Command};

pub async fn run(args: Args) -> Result<()> {
    let cfg = args.pce.config();
    cfg.validate().context("loading pce settings")?;
    let api = PceApi::connect(&cfg, args.pce.poll_policy()).context("building pce client")?;

    match args.command {
        Command::Apps(opts) => apps::run(&api, &opts).await,
        Command::Flows(opts) => flows::run(&api, &opts).await,
    }
}
