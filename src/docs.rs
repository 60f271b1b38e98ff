use async_std::fs::{self, File};
use async_std::io::prelude::*;
use async_std::io::{BufReader, stdin};
use async_walkdir::{DirEntry, WalkDir};
use futures::FutureExt;
use futures::future;
use futures::stream::{Stream, StreamExt, TryStreamExt};
use lines_ext::LinesExt;
use std::io::{Error, ErrorKind, Result};
use std::path::Path;

/// Walks a records dir, streaming every YAML file line by line.
fn dir_lines(dir: &str) -> impl Stream<Item = Result<String>> + use<> {
    WalkDir::new(dir)
        .try_filter_map(|dir_entry: DirEntry| async move {
            let path = dir_entry.path();
            if path.is_dir() {
                return Ok(None);
            }
            let hidden = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().starts_with('.'))
                .unwrap_or(true);
            let yaml = path
                .extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy().to_lowercase();
                    ext == "yml" || ext == "yaml"
                })
                .unwrap_or(false);
            if hidden || !yaml {
                return Ok(None);
            }
            File::open(&path).await.map(Option::Some)
        })
        .map_ok(|file| BufReader::new(file).lines())
        .try_flatten()
}

/// Reads a records dir or a single file by line.
async fn path_lines(pathstr: String) -> Result<impl Stream<Item = Result<String>>> {
    let path = Path::new(&pathstr);
    if !path.exists() {
        return Err(Error::new(
            ErrorKind::NotFound,
            format!("Records path does not exist: {}", pathstr),
        ));
    }
    let metadata = fs::metadata(path).await?;
    if metadata.is_file() {
        let file = File::open(&pathstr).await?;
        Ok(BufReader::new(file).lines().left_stream())
    } else if metadata.is_dir() {
        Ok(dir_lines(&pathstr).right_stream())
    } else {
        Err(Error::new(
            ErrorKind::InvalidInput,
            format!("Records path is neither a file nor a directory: {}", pathstr),
        ))
    }
}

/// Lines of the given dir or file, or of stdin if no path is given.
fn lines(path: Option<String>) -> impl Stream<Item = Result<String>> {
    if let Some(pathstr) = path {
        path_lines(pathstr)
            .into_stream()
            .try_flatten()
            .left_stream()
    } else {
        BufReader::new(stdin()).lines().right_stream()
    }
}

/// Streams `---`-separated YAML documents from the given dir or file, or from
/// stdin if no path is given. Blank documents between separators are dropped.
pub fn docs(path: Option<String>) -> impl Stream<Item = Result<String>> {
    lines(path)
        .chunk_by_line("---")
        .try_filter(|doc| future::ready(!doc.trim().is_empty()))
}
