//! Autodl command - resolve an automatic download into a package request.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use tracing::info;
use uupdl::api::{ReqwestClient, UpdateServices, UupApiClient};
use uupdl::autodl::{AutoDlParams, DownloadConfig};
use uupdl::package::JsonPackageWriter;
use uupdl::request::{RequestContext, Scheme};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the autodl command.
#[derive(Debug, Args)]
pub struct AutoDlArgs {
    /// Full request URL, e.g. https://uupdump.net/get.php?id=...&autodl=2
    #[arg(long, conflicts_with_all = ["id", "pack", "edition", "mode", "host", "path", "https"])]
    pub url: Option<String>,

    /// Update ID
    #[arg(long)]
    pub id: Option<String>,

    /// Language pack (all languages when omitted)
    #[arg(long)]
    pub pack: Option<String>,

    /// Edition, or several separated by ';'
    #[arg(long)]
    pub edition: Option<String>,

    /// Download mode: 1 download only, 2 convert, 3 convert with virtual editions
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub mode: Option<u8>,

    /// Host used in callback URLs
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Request path used in callback URLs
    #[arg(long, default_value = "/get.php")]
    pub path: String,

    /// Build https callback URLs
    #[arg(long)]
    pub https: bool,

    /// Form field as key=value (updates, cleanup, netfx, esd, virtualEditions)
    #[arg(long = "form", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub form: Vec<(String, String)>,

    /// Write the package request to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl AutoDlArgs {
    /// Build the request context these arguments describe.
    pub fn request(&self) -> Result<RequestContext, CliError> {
        let mut request = match &self.url {
            Some(url) => RequestContext::from_url(url)?,
            None => {
                let mut request =
                    RequestContext::new(Scheme::from_tls(self.https), &self.host, &self.path);
                if let Some(id) = &self.id {
                    request = request.with_query("id", id);
                }
                if let Some(pack) = &self.pack {
                    request = request.with_query("pack", pack);
                }
                if let Some(edition) = &self.edition {
                    request = request.with_query("edition", edition);
                }
                if let Some(mode) = self.mode {
                    request = request.with_query("autodl", mode.to_string());
                }
                request
            }
        };

        for (key, value) in &self.form {
            request = request.with_form(key, value);
        }

        Ok(request)
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

/// Run the autodl command.
pub fn run(args: AutoDlArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("autodl");
    let config = runner.config();

    let request = args.request()?;

    let http = ReqwestClient::with_timeout(config.api.timeout)
        .map_err(|e| CliError::Http(e.to_string()))?;
    let api = UupApiClient::new(http, config.api.base_url.clone());
    let policy = config.update_policy();
    let services = UpdateServices::from_api(&api, &policy);

    let params = AutoDlParams::from_request(&request)?;
    let download = DownloadConfig::build(params, &request, services)?;

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = JsonPackageWriter::new(output);
    let package = download.create_package(&request, &mut writer)?;

    info!(
        archive = package.archive_name(),
        output = ?args.output,
        "Package request written"
    );

    Ok(())
}
