//! Shared test utilities and fixtures for loader tests

use std::fs;
use std::path::{Path, PathBuf};


/// Two locations over three days, with one missing and one out-of-range reading
pub const SAMPLE_DATASET: &str = "\
name,county,date,mean_temp,min_temp,max_temp,precipitation
Blindern,3,2010-01-01,-6.2,-9.0,-3.5,0.0
Blindern,3,2010-01-02,-13.0,-18.5,-8.0,1.5
Blindern,3,2010-01-03,-8.0,-12.0,-4.0,
Bergen,12,2010-01-01,2.0,-1.0,5.0,22.0
Bergen,12,2010-01-02,3.5,0.5,6.5,999999.0
";

/// Write `content` to a file in `dir`
pub fn write_dataset(dir: &Path, filename: &str, content: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(filename);
    fs::write(&path, content)?;
    Ok(path)
}
