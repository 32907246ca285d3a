// Local side of workspace file transfers
use crate::core::args::ArgumentSet;
use crate::core::command::registry::RemoteOperation;
use crate::core::command::remote::RemoteClient;
use crate::core::results::RemoteResponse;
use crate::domain::error::{HavocError, HavocResult};
use base64::Engine;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use tracing::info;

pub const FILE_NAME: &str = "file_name";
pub const FILE_PATH: &str = "file_path";
pub const FILE_CONTENTS: &str = "file_contents";
pub const RAW_FILE: &str = "raw_file";

/// Fetch a workspace file and write it to `<file_path>/<file_name>`.
///
/// `file_path` never reaches the service. When the response carries file
/// contents they are stored locally and replaced by `file_path` in the
/// response; any other response is returned unchanged.
pub async fn download<C: RemoteClient + ?Sized>(
    client: &C,
    operation: RemoteOperation,
    mut args: ArgumentSet,
) -> HavocResult<RemoteResponse> {
    let directory = local_directory(&mut args);
    let target = target_path(&directory, args.get(FILE_NAME).unwrap_or_default())?;

    let mut response = client.call(operation, args.to_params()).await?;

    let contents = match response.get(FILE_CONTENTS) {
        Some(Value::String(encoded)) => base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| HavocError::Remote {
                message: format!("Invalid file contents in response: {}", e),
            })?,
        _ => return Ok(response),
    };

    tokio::fs::write(&target, &contents)
        .await
        .map_err(|e| local_error(&target, e))?;
    info!("Wrote {} bytes to {}", contents.len(), target.display());

    response.remove(FILE_CONTENTS);
    response.insert(FILE_PATH, Value::String(directory));
    Ok(response)
}

/// Read `<file_path>/<file_name>` and send it as `raw_file`
pub async fn upload<C: RemoteClient + ?Sized>(
    client: &C,
    operation: RemoteOperation,
    mut args: ArgumentSet,
) -> HavocResult<RemoteResponse> {
    let directory = local_directory(&mut args);
    let source = target_path(&directory, args.get(FILE_NAME).unwrap_or_default())?;

    let contents = tokio::fs::read(&source)
        .await
        .map_err(|e| local_error(&source, e))?;
    info!("Uploading {} bytes from {}", contents.len(), source.display());

    args.insert(
        RAW_FILE,
        base64::engine::general_purpose::STANDARD.encode(contents),
    );
    client.call(operation, args.to_params()).await
}

fn local_directory(args: &mut ArgumentSet) -> String {
    args.take(FILE_PATH)
        .map(|value| value.as_str().to_string())
        .unwrap_or_default()
}

/// `file_name` must stay below `directory`: absolute names, roots and `..`
/// are refused.
fn target_path(directory: &str, file_name: &str) -> HavocResult<PathBuf> {
    let name = Path::new(file_name);
    if name
        .components()
        .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir))
    {
        return Err(HavocError::LocalFile {
            path: file_name.to_string(),
            message: format!("file name must be relative to '{}'", directory),
        });
    }
    Ok(Path::new(directory).join(name))
}

fn local_error(path: &Path, err: std::io::Error) -> HavocError {
    HavocError::LocalFile {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
