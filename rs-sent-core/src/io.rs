use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::SentResult;

/// Reads a text file and returns all its lines.
///
/// Splits on `\n` / `\r\n`.
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	Ok(fs::read_to_string(filename)?.lines().map(str::to_owned).collect())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/train.dat` + `"bin"` → `data/train.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Loads a postcard-encoded value from `path`.
pub(crate) fn read_binary<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> SentResult<T> {
	let bytes = fs::read(path)?;
	Ok(postcard::from_bytes(&bytes)?)
}

/// Writes `value` postcard-encoded to `path`, creating parent folders.
pub(crate) fn write_binary<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> SentResult<()> {
	let path = path.as_ref();
	if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		fs::create_dir_all(parent)?;
	}
	let bytes = postcard::to_stdvec(value)?;
	fs::write(path, bytes)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_build_output_path() {
		assert_eq!(build_output_path("data/train.dat", "bin").unwrap(), PathBuf::from("data/train.bin"));
		assert_eq!(build_output_path("train.dat", "bin").unwrap(), PathBuf::from("train.bin"));
		assert!(build_output_path("", "bin").is_err());
	}
}
