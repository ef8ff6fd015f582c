use std::{collections::HashMap, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand, ValueEnum};
use controlapi_core::{
    allocator::{IPAM_PLUGIN_ENDPOINT_TYPE, NETWORK_PLUGIN_ENDPOINT_TYPE},
    controlapi::{
        ControlApiError, filter_contains, filter_contains_prefix, filter_match_labels,
        service::ValidationService,
        types::{Annotations, Driver, IpamOptions, ValidationRequest},
        validate_driver,
    },
    plugins::{InstalledPlugin, PluginGetter, PluginRegistry},
};
use tonic::Status;
use tower::{Service, ServiceExt};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "controlapi")]
#[command(about = "Control API admission checks and list filters")]
struct ControlApiArgs {
    /// Plugins installed in the local registry, as NAME:TYPE or NAME:TYPE:v1
    #[arg(long = "plugin", global = true, value_parser = parse_plugin)]
    plugins: Vec<(String, InstalledPlugin)>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an object name
    Name {
        name: String,

        /// Kind of object the name belongs to
        #[arg(short, long, value_enum, default_value_t = ObjectKind::Service)]
        kind: ObjectKind,
    },

    /// Validate a network spec with its network and IPAM drivers
    Network {
        name: String,

        /// Network driver, omitted for the default
        #[arg(short, long)]
        driver: Option<String>,

        /// IPAM driver, omitted for the default
        #[arg(short, long)]
        ipam: Option<String>,
    },

    /// Validate a single driver reference
    Driver {
        name: String,

        /// Check against IPAM drivers instead of network drivers
        #[arg(short, long, default_value_t = false)]
        ipam: bool,
    },

    /// Check a value against list filters
    Filter {
        candidate: String,

        /// Accepted values (or prefixes with --prefix); none accepts everything
        #[arg(short, long)]
        allow: Vec<String>,

        /// Match accepted values as prefixes
        #[arg(short, long, default_value_t = false)]
        prefix: bool,

        /// Labels of the candidate, as KEY=VALUE
        #[arg(short, long, value_parser = parse_label)]
        label: Vec<(String, String)>,

        /// Required labels, as KEY=VALUE or KEY for any value
        #[arg(short, long, value_parser = parse_label)]
        require: Vec<(String, String)>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ObjectKind {
    Service,
    Task,
    Network,
    Secret,
    Config,
}

fn parse_plugin(value: &str) -> Result<(String, InstalledPlugin), String> {
    let mut parts = value.split(':');
    let (Some(name), Some(plugin_type)) = (parts.next(), parts.next()) else {
        return Err(format!("invalid plugin '{value}', expected NAME:TYPE[:v1]"));
    };
    if name.is_empty() || plugin_type.is_empty() {
        return Err(format!("invalid plugin '{value}', empty name or type"));
    }
    let plugin_type = match plugin_type.to_lowercase().as_str() {
        "network" | "networkdriver" => NETWORK_PLUGIN_ENDPOINT_TYPE.to_string(),
        "ipam" | "ipamdriver" => IPAM_PLUGIN_ENDPOINT_TYPE.to_string(),
        _ => plugin_type.to_string(),
    };
    let plugin = match parts.next() {
        None => InstalledPlugin::new(name),
        Some("v1") => InstalledPlugin::new(name).legacy(),
        Some(other) => return Err(format!("invalid plugin protocol '{other}', expected v1")),
    };
    if parts.next().is_some() {
        return Err(format!("invalid plugin '{value}', expected NAME:TYPE[:v1]"));
    }
    Ok((plugin_type, plugin))
}

fn parse_label(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("invalid label '{value}', empty key")),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Ok((value.to_string(), String::new())),
    }
}

fn admission_request(command: Command) -> Option<ValidationRequest> {
    match command {
        Command::Name { name, kind } => {
            let annotations = Annotations::new(name);
            Some(match kind {
                ObjectKind::Service => ValidationRequest::Service { annotations },
                ObjectKind::Task => ValidationRequest::Task { annotations },
                ObjectKind::Network => {
                    ValidationRequest::Network { annotations, driver: None, ipam: None }
                }
                ObjectKind::Secret => ValidationRequest::Secret { annotations },
                ObjectKind::Config => ValidationRequest::Config { annotations },
            })
        }
        Command::Network { name, driver, ipam } => Some(ValidationRequest::Network {
            annotations: Annotations::new(name),
            driver: driver.map(Driver::new),
            ipam: ipam.map(|name| IpamOptions { driver: Some(Driver::new(name)) }),
        }),
        Command::Driver { .. } | Command::Filter { .. } => None,
    }
}

fn check_driver(
    command: &Command,
    plugin_getter: &dyn PluginGetter,
) -> Option<Result<(), ControlApiError>> {
    let Command::Driver { name, ipam } = command else {
        return None;
    };
    let plugin_type =
        if *ipam { IPAM_PLUGIN_ENDPOINT_TYPE } else { NETWORK_PLUGIN_ENDPOINT_TYPE };
    Some(validate_driver(Some(&Driver::new(name.as_str())), Some(plugin_getter), plugin_type))
}

fn report(result: Result<(), ControlApiError>) -> ExitCode {
    match result {
        Ok(()) => {
            println!("ok");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let status = Status::from(e);
            eprintln!("{:?}: {}", status.code(), status.message());
            ExitCode::FAILURE
        }
    }
}

fn run_filter(command: &Command) -> bool {
    let Command::Filter { candidate, allow, prefix, label, require } = command else {
        return false;
    };
    let labels: HashMap<String, String> = label.iter().cloned().collect();
    let required: HashMap<String, String> = require.iter().cloned().collect();
    let value_match = if *prefix {
        filter_contains_prefix(candidate, allow)
    } else {
        filter_contains(candidate, allow)
    };
    value_match && filter_match_labels(&labels, &required)
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    controlapi_core::controlapi_tracing::init();

    let args = ControlApiArgs::parse();

    let registry = PluginRegistry::new();
    for (plugin_type, plugin) in args.plugins {
        registry.install(plugin_type, plugin);
    }
    debug!(plugins = registry.len(), "plugin registry loaded");

    if matches!(args.command, Command::Filter { .. }) {
        let matched = run_filter(&args.command);
        println!("{}", if matched { "match" } else { "no match" });
        return Ok(if matched { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    if let Some(result) = check_driver(&args.command, &registry) {
        return Ok(report(result));
    }

    let Some(request) = admission_request(args.command) else {
        return Ok(ExitCode::FAILURE);
    };

    let mut service = ValidationService::new().with_plugin_getter(Arc::new(registry));
    let result = service.ready().await?.call(request).await.map(|_| ());
    Ok(report(result))
}

#[cfg(test)]
mod tests {
    use controlapi_core::plugins::CompatPlugin;

    use super::*;

    #[test]
    fn unit_cli_parse_plugin() {
        let (plugin_type, plugin) = parse_plugin("weave:network").unwrap();
        assert_eq!(plugin_type, NETWORK_PLUGIN_ENDPOINT_TYPE);
        assert_eq!(plugin.name(), "weave");
        assert!(!plugin.is_v1());

        let (plugin_type, plugin) = parse_plugin("infoblox:IpamDriver:v1").unwrap();
        assert_eq!(plugin_type, IPAM_PLUGIN_ENDPOINT_TYPE);
        assert!(plugin.is_v1());

        assert!(parse_plugin("weave").is_err());
        assert!(parse_plugin("weave:network:v2").is_err());
    }

    #[test]
    fn unit_cli_parse_plugin_rejects_malformed() {
        assert!(parse_plugin(":network").is_err());
        assert!(parse_plugin("weave:").is_err());
        assert!(parse_plugin(":").is_err());
        assert!(parse_plugin("weave:network:v1:extra").is_err());
        assert!(
            ControlApiArgs::try_parse_from(["controlapi", "--plugin", ":network", "driver", "x"])
                .is_err()
        );
    }

    #[test]
    fn unit_cli_driver_command() {
        let args = ControlApiArgs::try_parse_from([
            "controlapi", "--plugin", "infoblox:ipam", "--plugin", "contiv:network:v1", "driver",
            "infoblox", "--ipam",
        ])
        .unwrap();
        let registry = PluginRegistry::new();
        for (plugin_type, plugin) in args.plugins {
            registry.install(plugin_type, plugin);
        }
        assert_eq!(check_driver(&args.command, &registry), Some(Ok(())));

        let args = ControlApiArgs::try_parse_from(["controlapi", "driver", "DEFAULT", "--ipam"]).unwrap();
        assert_eq!(check_driver(&args.command, &registry), Some(Ok(())));

        let args = ControlApiArgs::try_parse_from(["controlapi", "driver", "overlay"]).unwrap();
        assert_eq!(check_driver(&args.command, &registry), Some(Ok(())));

        let args = ControlApiArgs::try_parse_from(["controlapi", "driver", "infoblox"]).unwrap();
        assert_eq!(
            check_driver(&args.command, &registry).unwrap().unwrap_err().to_string(),
            "error during lookup of plugin infoblox"
        );

        let args = ControlApiArgs::try_parse_from(["controlapi", "driver", "contiv"]).unwrap();
        assert_eq!(
            check_driver(&args.command, &registry).unwrap().unwrap_err().to_string(),
            "legacy plugin contiv of type NetworkDriver is not supported in swarm mode"
        );

        let args = ControlApiArgs::try_parse_from(["controlapi", "filter", "web"]).unwrap();
        assert_eq!(check_driver(&args.command, &registry), None);
        assert!(admission_request(args.command).is_none());
    }

    #[test]
    fn unit_cli_parse_label() {
        assert_eq!(parse_label("tier=front").unwrap(), ("tier".to_string(), "front".to_string()));
        assert_eq!(parse_label("tier").unwrap(), ("tier".to_string(), String::new()));
        assert!(parse_label("=front").is_err());
    }

    #[test]
    fn unit_cli_filter_command() {
        let args = ControlApiArgs::parse_from([
            "controlapi", "filter", "web.1", "--allow", "web", "--prefix", "--label", "tier=front",
            "--require", "tier",
        ]);
        assert!(run_filter(&args.command));

        let args = ControlApiArgs::parse_from(["controlapi", "filter", "web.1", "--allow", "web"]);
        assert!(!run_filter(&args.command));

        let args = ControlApiArgs::parse_from(["controlapi", "filter", "anything"]);
        assert!(run_filter(&args.command));
    }

    #[test]
    fn unit_cli_admission_request() {
        let args = ControlApiArgs::parse_from([
            "controlapi", "--plugin", "weave:network", "network", "backend", "--driver", "weave",
        ]);
        assert_eq!(args.plugins.len(), 1);
        let request = admission_request(args.command).unwrap();
        assert_eq!(request.kind(), "network");

        let registry = PluginRegistry::new();
        for (plugin_type, plugin) in args.plugins {
            registry.install(plugin_type, plugin);
        }
        let service = ValidationService::new().with_plugin_getter(Arc::new(registry));
        assert!(service.validate(&request).is_ok());

        let args = ControlApiArgs::parse_from(["controlapi", "name", "my.secret", "--kind", "secret"]);
        let request = admission_request(args.command).unwrap();
        assert!(ValidationService::new().validate(&request).is_ok());
    }
}
