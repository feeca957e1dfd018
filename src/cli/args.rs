use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "driveguard")]
#[command(about = "Driver Safety Alert Toolkit")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON output format
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable audio warnings for this invocation
    #[arg(long, global = true)]
    pub no_audio: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize fresh configuration
    Init,
    /// Set configuration value
    Set {
        /// Configuration key (e.g., audio.master_volume)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Trigger an alert for an incident category
    Trigger {
        /// Incident category (drowsiness, phone, overspeed, ...)
        category: String,

        /// Detection confidence between 0.0 and 1.0
        #[arg(long)]
        confidence: Option<f64>,

        /// Keep running until the alert is dismissed or expires
        #[arg(long)]
        wait: bool,

        /// Also send a desktop notification
        #[arg(long)]
        notify: bool,
    },

    /// Raise an emergency alert that stays until dismissed
    Emergency {
        /// Emergency description
        message: String,

        /// Also send a desktop notification
        #[arg(long)]
        notify: bool,
    },

    /// List incident categories and their suggestion pools
    Categories {
        /// Show the full suggestion list for one category
        category: Option<String>,
    },

    /// Play the audio test pattern
    TestAudio,

    /// Live alert monitor (interactive terminal dashboard)
    Monitor {
        /// Periodically trigger random alerts
        #[arg(long)]
        demo: bool,

        /// Refresh rate in milliseconds
        #[arg(long)]
        refresh_rate_ms: Option<u64>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}
