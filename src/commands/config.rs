use std::path::PathBuf;

use crate::cli::ConfigAction;
use crate::config::Config;

fn resolve_path(config_path: Option<&str>) -> Result<PathBuf, anyhow::Error> {
    match config_path {
        Some(p) => Ok(PathBuf::from(p)),
        None => Config::default_path(),
    }
}

pub fn handle_config_action(
    action: ConfigAction,
    config_path: Option<&str>,
    json_output: bool,
) {
    match action {
        ConfigAction::Init => {
            let result = resolve_path(config_path)
                .and_then(|path| Config::default().save_to(&path).map(|()| path));
            match result {
                Ok(path) => {
                    if json_output {
                        println!(
                            r#"{{"status": "success", "message": "Configuration initialized successfully"}}"#
                        );
                    } else {
                        println!("Configuration initialized at: {}", path.display());
                    }
                }
                Err(e) => {
                    if json_output {
                        println!(
                            r#"{{"status": "error", "message": "Failed to initialize config: {}"}}"#,
                            e
                        );
                    } else {
                        eprintln!("Error: Failed to initialize config: {}", e);
                    }
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Show => {
            let result = resolve_path(config_path)
                .and_then(|path| Config::load_from(&path).map(|config| (path, config)));
            match result {
                Ok((path, config)) => {
                    if json_output {
                        match serde_json::to_string_pretty(&config) {
                            Ok(json) => println!("{}", json),
                            Err(e) => {
                                eprintln!("Error: Failed to serialize config to JSON: {}", e);
                                std::process::exit(1);
                            }
                        }
                    } else {
                        match toml::to_string_pretty(&config) {
                            Ok(toml_str) => {
                                println!("Configuration ({})", path.display());
                                println!("{}", toml_str);
                            }
                            Err(e) => {
                                eprintln!("Error: Failed to serialize config: {}", e);
                                std::process::exit(1);
                            }
                        }
                    }
                }
                Err(e) => {
                    if json_output {
                        println!(
                            r#"{{"status": "error", "message": "Failed to load config: {}"}}"#,
                            e
                        );
                    } else {
                        eprintln!("Error: Failed to load config: {}", e);
                    }
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let result = resolve_path(config_path).and_then(|path| {
                let mut config = Config::load_from(&path)?;
                config.set_value(&key, &value)?;
                config.save_to(&path)?;
                Ok(())
            });
            match result {
                Ok(()) => {
                    if json_output {
                        println!(
                            r#"{{"status": "success", "message": "Set {} = {}"}}"#,
                            key, value
                        );
                    } else {
                        println!("Set {} = {}", key, value);
                    }
                }
                Err(e) => {
                    if json_output {
                        println!(
                            r#"{{"status": "error", "message": "Failed to set config value: {}"}}"#,
                            e
                        );
                    } else {
                        eprintln!("Error: Failed to set config value: {}", e);
                    }
                    std::process::exit(1);
                }
            }
        }
    }
}
