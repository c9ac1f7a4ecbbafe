#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub fn locate_crate_files<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut abspath = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    abspath.push(path);
    abspath
}

pub fn read_asset<P: AsRef<Path>>(path: P) -> String {
    fs::read_to_string(locate_crate_files(path)).unwrap()
}

/// Base64 body of a PEM armored file
pub fn pem_body(pem: &str) -> Vec<u8> {
    let body: String = pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    base64::decode(body).unwrap()
}

pub fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
