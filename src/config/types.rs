use crate::export::ExportFormat;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Page Harvester
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Seed URLs, each crawled in its own session
    #[serde(default)]
    pub seeds: Vec<String>,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages visited per session
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between consecutive requests (seconds)
    #[serde(rename = "delay-seconds", default = "default_delay")]
    pub delay_seconds: f64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-seconds", default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Consult robots.txt on the seed host before fetching
    #[serde(rename = "respect-robots", default)]
    pub respect_robots: bool,
}

impl CrawlerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            delay_seconds: default_delay(),
            timeout_seconds: default_timeout(),
            respect_robots: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives timestamped export files
    #[serde(rename = "export-dir", default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Formats written after a crawl
    #[serde(default = "default_formats")]
    pub formats: Vec<ExportFormat>,

    /// Optional log file, appended to alongside stderr
    #[serde(rename = "log-file", default)]
    pub log_file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            formats: default_formats(),
            log_file: None,
        }
    }
}

/// Loop mode configuration
///
/// Without an interval the seed batch is crawled once.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes to wait between the end of one cycle and the start of the next
    #[serde(rename = "loop-interval-minutes", default)]
    pub loop_interval_minutes: Option<u64>,

    /// Export the accumulated results after every completed cycle
    #[serde(rename = "auto-export", default)]
    pub auto_export: bool,
}

impl ScheduleConfig {
    /// Pause between cycles, or `None` for a single batch
    pub fn interval(&self) -> Option<Duration> {
        self.loop_interval_minutes
            .map(|minutes| Duration::from_secs(minutes * 60))
    }
}

fn default_max_pages() -> u32 {
    50
}

fn default_delay() -> f64 {
    0.5
}

fn default_timeout() -> u64 {
    10
}

fn default_crawler_name() -> String {
    "PageHarvester".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_formats() -> Vec<ExportFormat> {
    ExportFormat::ALL.to_vec()
}
