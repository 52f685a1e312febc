use crate::error::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static INVALID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).unwrap());

/// Replace filesystem-invalid characters in a title with underscores so it
/// can serve as a directory name.
pub fn sanitize_folder_name(folder_name: &str) -> String {
    INVALID_CHARS.replace_all(folder_name, "_").into_owned()
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
