use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub snapshot: SnapshotConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub root: String,
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,
    /// Path fragment marking the company-qualification folder; files under it
    /// are catalogued as 图安资质 regardless of keywords.
    #[serde(default)]
    pub qualification_folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL embedded in chat-bot download links. Falls back to
    /// http://{host}:{port} when unset.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        self.public_base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }
}

fn default_excludes() -> Vec<String> {
    vec![
        "**/.git".to_string(),
        "**/.stfolder".to_string(),
        "**/.stversions".to_string(),
    ]
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
