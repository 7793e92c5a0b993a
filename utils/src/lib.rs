use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use glob::glob;
use walkdir::WalkDir;

pub fn read_to_string(filepath:&Path) -> io::Result<String> {
    let mut f = File::open(filepath)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    Ok(s)
}

/// Bruker parameter files are not guaranteed to be UTF-8 (ISO-8859-1 is common). Invalid bytes
/// are replaced rather than failing the read.
pub fn read_to_string_lossy(filepath:&Path) -> io::Result<String> {
    let bytes = std::fs::read(filepath)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_to_file(filepath:&Path,string:&str) -> io::Result<()> {
    let mut f = File::create(filepath)?;
    f.write_all(string.as_bytes())
}

/// number of lines in a text file. A trailing newline does not add an empty line.
pub fn count_lines(filepath:&Path) -> io::Result<usize> {
    Ok(read_to_string(filepath)?.lines().count())
}

// single depth search, sorted by path
pub fn get_all_matches(dir:&Path,pattern:&str) -> Option<Vec<PathBuf>> {
    let pat = dir.join(pattern);
    let pat = pat.to_str()?;
    let mut matches:Vec<PathBuf> = glob(pat).ok()?.flat_map(|m| m).collect();
    matches.sort();
    match matches.is_empty() {
        true => None,
        false => Some(matches)
    }
}

/// regular files directly inside a directory (no recursion), sorted by path
pub fn list_files(dir:&Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::<PathBuf>::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.path().to_owned());
        }
    }
    files.sort();
    Ok(files)
}

/// count of regular files directly inside a directory. A missing directory counts as empty.
pub fn count_files(dir:&Path) -> usize {
    WalkDir::new(dir).min_depth(1).max_depth(1).into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .count()
}

/// set rwxrwx--- on a generated script
#[cfg(unix)]
pub fn make_executable(filepath:&Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(filepath)?.permissions();
    perms.set_mode(0o770);
    std::fs::set_permissions(filepath,perms)
}

#[cfg(not(unix))]
pub fn make_executable(_filepath:&Path) -> io::Result<()> {
    Ok(())
}
