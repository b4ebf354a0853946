use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(export_home: Option<PathBuf>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    let base = export_home.or(config_dir)?;
    Some(base.join("daylio-export/.env"))
}

/// Loads `.env` from the working directory, falling back to
/// `$DAYLIO_EXPORT_HOME/daylio-export/.env` or the user config dir.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("DAYLIO_EXPORT_HOME").map(PathBuf::from),
        dirs::config_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}
