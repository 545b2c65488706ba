use anyhow::{anyhow, Result};
use clap::ArgMatches;
use lazy_static::lazy_static;
use std::collections::BTreeMap;
use std::fs::File;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::mutation::{
    AllowlistMatcher, LabelAnnotationConfig, PrincipalMatcher, RegexMatcher, SubstringMatcher,
};

pub static SERVICE_NAME: &str = "label-injector";

lazy_static! {
    pub(crate) static ref HOSTNAME: String =
        std::env::var("HOSTNAME").unwrap_or_else(|_| String::from("unknown"));
}

pub struct Config {
    pub addr: SocketAddr,
    pub tls_config: Option<TlsConfig>,
    pub metadata: LabelAnnotationConfig,
    pub system_principals: SystemPrincipals,
    pub log_level: String,
    pub log_fmt: String,
    pub log_no_color: bool,
}

pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

/// How requests made by platform principals are recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemPrincipals {
    /// The username contains one of the markers
    Substring(Vec<String>),
    /// The username is one of the listed identities
    Allowlist(Vec<String>),
    /// The username matches one of the regular expressions
    Regex(Vec<String>),
}

impl Default for SystemPrincipals {
    fn default() -> Self {
        SystemPrincipals::Substring(vec![
            crate::mutation::decision::DEFAULT_SYSTEM_PRINCIPAL_MARKER.to_owned(),
        ])
    }
}

impl SystemPrincipals {
    pub fn matcher(&self) -> Result<Box<dyn PrincipalMatcher>> {
        Ok(match self {
            SystemPrincipals::Substring(markers) => {
                Box::new(SubstringMatcher::new(markers.clone()))
            }
            SystemPrincipals::Allowlist(identities) => {
                Box::new(AllowlistMatcher::new(identities.iter().cloned()))
            }
            SystemPrincipals::Regex(patterns) => Box::new(
                RegexMatcher::new(patterns)
                    .map_err(|e| anyhow!("invalid system principal expression: {}", e))?,
            ),
        })
    }
}

impl Config {
    pub fn from_args(matches: &ArgMatches) -> Result<Self> {
        let addr = api_bind_address(matches)?;

        let (cert_file, key_file) = tls_files(matches)?;
        let tls_config = if cert_file.is_empty() {
            None
        } else {
            Some(TlsConfig {
                cert_file: PathBuf::from(cert_file),
                key_file: PathBuf::from(key_file),
            })
        };

        let metadata = metadata(matches)?;
        let system_principals = system_principals(matches)?;
        // fail early on bad expressions
        system_principals.matcher()?;

        let log_level = matches
            .get_one::<String>("log-level")
            .expect("This should not happen, there's a default value for log-level")
            .to_owned();
        let log_fmt = matches
            .get_one::<String>("log-fmt")
            .expect("This should not happen, there's a default value for log-fmt")
            .to_owned();
        let log_no_color = matches
            .get_one::<bool>("log-no-color")
            .expect("clap should have assigned a default value")
            .to_owned();

        Ok(Self {
            addr,
            tls_config,
            metadata,
            system_principals,
            log_level,
            log_fmt,
            log_no_color,
        })
    }
}

fn api_bind_address(matches: &clap::ArgMatches) -> Result<SocketAddr> {
    format!(
        "{}:{}",
        matches
            .get_one::<String>("address")
            .expect("clap should have assigned a default value"),
        matches
            .get_one::<String>("port")
            .expect("clap should have assigned a default value")
    )
    .parse()
    .map_err(|e| anyhow!("error parsing arguments: {}", e))
}

fn tls_files(matches: &clap::ArgMatches) -> Result<(String, String)> {
    let cert_file = matches
        .get_one::<String>("cert-file")
        .cloned()
        .unwrap_or_default();
    let key_file = matches
        .get_one::<String>("key-file")
        .cloned()
        .unwrap_or_default();
    if cert_file.is_empty() != key_file.is_empty() {
        Err(anyhow!(
            "error parsing arguments: either both --cert-file and --key-file must be provided, or neither"
        ))
    } else {
        Ok((cert_file, key_file))
    }
}

fn metadata(matches: &clap::ArgMatches) -> Result<LabelAnnotationConfig> {
    let from_file = match matches.get_one::<String>("metadata") {
        Some(path) => {
            let path = Path::new(path);
            Some(read_metadata_file(path).map_err(|e| {
                anyhow!("error while loading metadata from {:?}: {}", path, e)
            })?)
        }
        None => None,
    };

    let from_flags = LabelAnnotationConfig::new(
        key_value_pairs(matches, "label")?,
        key_value_pairs(matches, "annotation")?,
    );

    Ok(match from_file {
        Some(from_file) => from_file.merge(from_flags),
        None if from_flags.is_empty() => LabelAnnotationConfig::builtin(),
        None => from_flags,
    })
}

fn key_value_pairs(matches: &clap::ArgMatches, id: &str) -> Result<BTreeMap<String, String>> {
    matches
        .get_many::<String>(id)
        .into_iter()
        .flatten()
        .map(|pair| parse_key_value(pair).map_err(|e| anyhow!("invalid --{} value: {}", id, e)))
        .collect()
}

fn parse_key_value(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(anyhow!("expected KEY=VALUE, got {:?}", pair)),
    }
}

fn system_principals(matches: &clap::ArgMatches) -> Result<SystemPrincipals> {
    let patterns: Vec<String> = matches
        .get_many::<String>("system-principal")
        .into_iter()
        .flatten()
        .filter(|pattern| !pattern.is_empty())
        .cloned()
        .collect();
    let matcher = matches
        .get_one::<String>("system-principal-matcher")
        .expect("clap should have assigned a default value");

    match matcher.as_str() {
        "substring" => Ok(SystemPrincipals::Substring(patterns)),
        "allowlist" => Ok(SystemPrincipals::Allowlist(patterns)),
        "regex" => Ok(SystemPrincipals::Regex(patterns)),
        other => Err(anyhow!("unknown system principal matcher: {}", other)),
    }
}

/// Reads the metadata file, a YAML document with `labels` and
/// `annotations` maps.
fn read_metadata_file(path: &Path) -> Result<LabelAnnotationConfig> {
    let metadata_file = File::open(path)?;
    let metadata: LabelAnnotationConfig = serde_yaml::from_reader(&metadata_file)?;
    Ok(metadata)
}
