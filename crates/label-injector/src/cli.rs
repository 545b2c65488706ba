use clap::builder::PossibleValue;
use clap::{crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, Command};

use crate::mutation::decision::DEFAULT_SYSTEM_PRINCIPAL_MARKER;

pub fn build_cli() -> Command {
    let mut args = vec![
            Arg::new("log-level")
                .long("log-level")
                .value_name("LOG_LEVEL")
                .env("LABEL_INJECTOR_LOG_LEVEL")
                .default_value("info")
                .value_parser([
                    PossibleValue::new("trace"),
                    PossibleValue::new("debug"),
                    PossibleValue::new("info"),
                    PossibleValue::new("warn"),
                    PossibleValue::new("error"),
                ])
                .help("Log level"),
            Arg::new("log-fmt")
                .long("log-fmt")
                .value_name("LOG_FMT")
                .env("LABEL_INJECTOR_LOG_FMT")
                .default_value("text")
                .value_parser([PossibleValue::new("text"), PossibleValue::new("json")])
                .help("Log output format"),
            Arg::new("log-no-color")
                .long("log-no-color")
                .env("NO_COLOR")
                .action(ArgAction::SetTrue)
                .help("Disable colored output for logs"),
            Arg::new("address")
                .long("addr")
                .value_name("BIND_ADDRESS")
                .default_value("0.0.0.0")
                .env("LABEL_INJECTOR_BIND_ADDRESS")
                .help("Bind against ADDRESS"),
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .default_value("8080")
                .env("LABEL_INJECTOR_PORT")
                .help("Listen on PORT"),
            Arg::new("cert-file")
                .long("cert-file")
                .value_name("CERT_FILE")
                .default_value("/certs/cert")
                .env("LABEL_INJECTOR_CERT_FILE")
                .help("Path to an X.509 certificate file for HTTPS. Set both this and --key-file to an empty string to serve plain HTTP"),
            Arg::new("key-file")
                .long("key-file")
                .value_name("KEY_FILE")
                .default_value("/certs/key")
                .env("LABEL_INJECTOR_KEY_FILE")
                .help("Path to an X.509 private key file for HTTPS"),
            Arg::new("metadata")
                .long("metadata")
                .value_name("METADATA_FILE")
                .env("LABEL_INJECTOR_METADATA")
                .help("YAML file holding the `labels` and `annotations` maps to inject"),
            Arg::new("label")
                .long("label")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Label to inject, can be repeated. Overrides the entries of the metadata file"),
            Arg::new("annotation")
                .long("annotation")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Annotation to inject, can be repeated. Overrides the entries of the metadata file"),
            Arg::new("system-principal-matcher")
                .long("system-principal-matcher")
                .value_name("MATCHER")
                .env("LABEL_INJECTOR_SYSTEM_PRINCIPAL_MATCHER")
                .default_value("substring")
                .value_parser([
                    PossibleValue::new("substring").help("the username contains one of the patterns"),
                    PossibleValue::new("allowlist").help("the username is one of the patterns"),
                    PossibleValue::new("regex").help("the username matches one of the regular expressions"),
                ])
                .help("How requesters whose objects are never mutated are recognized"),
            Arg::new("system-principal")
                .long("system-principal")
                .value_name("PATTERN")
                .env("LABEL_INJECTOR_SYSTEM_PRINCIPALS")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .default_value(DEFAULT_SYSTEM_PRINCIPAL_MARKER)
                .help("Pattern identifying system principals, interpreted by --system-principal-matcher. Can be repeated"),
    ];
    args.sort_by(|a, b| a.get_id().cmp(b.get_id()));

    Command::new(crate_name!())
        .author(crate_authors!())
        .version(crate_version!())
        .about(crate_description!())
        .args(args)
}
