//! Files exchanged with the file-driven keystores, through the native dialogs.

use std::path::PathBuf;

use hwtest::download::Download;

pub async fn get_path(filename: String) -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Choose a location to export...")
        .set_file_name(filename)
        .save_file()
        .await
        .map(|fh| fh.path().to_path_buf())
}

/// Saves the download where the operator chooses. `None` if the dialog was cancelled.
pub async fn save(download: Download) -> Result<Option<PathBuf>, String> {
    let Some(path) = get_path(download.filename.clone()).await else {
        return Ok(None);
    };
    write(&path, &download)?;
    tracing::info!("Saved {} to {}", download.filename, path.to_string_lossy());
    Ok(Some(path))
}

fn write(path: &std::path::Path, download: &Download) -> Result<(), String> {
    std::fs::write(path, &download.body)
        .map_err(|e| format!("Failed to write {}: {}", path.to_string_lossy(), e))
}

/// Content of the file the operator picks. `None` if the dialog was cancelled.
pub async fn open_file(
    title: &'static str,
    filter: &'static str,
    extensions: &'static [&'static str],
) -> Option<Vec<u8>> {
    let file = rfd::AsyncFileDialog::new()
        .set_title(title)
        .add_filter(filter, extensions)
        .pick_file()
        .await?;
    Some(file.read().await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_download() {
        let tmp = tempfile::tempdir().unwrap();
        let download = Download {
            filename: "wc-p2wsh-T.txt".to_string(),
            body: b"Name: p2wsh-T\r\n".to_vec(),
        };
        let path = tmp.path().join(&download.filename);
        write(&path, &download).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), download.body);

        let missing = tmp.path().join("nope").join("file.txt");
        assert!(write(&missing, &download)
            .unwrap_err()
            .starts_with("Failed to write"));
    }
}
