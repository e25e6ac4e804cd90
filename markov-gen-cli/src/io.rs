use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

/// Reads a whole text file into memory as a `String`.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}
