use chrono::{DateTime, Utc};
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;

use crate::error::SchedError;

pub fn create_yaml_file(folder_path: &str, file_name: &str) -> Result<String, SchedError> {
    if fs::metadata(folder_path).is_err() {
        fs::create_dir_all(folder_path)?;
        info!("Created folder: {}", folder_path);
    }
    let file_path = format!("{}/{}.yaml", folder_path, file_name);
    fs::File::create(&file_path)?;
    Ok(file_path)
}

///Creates `<folder>/<UTC timestamp>-<run_name>-log.yaml`.
pub fn create_scheduler_log_yaml_file(
    folder_path: &str,
    run_name: &str,
) -> Result<String, SchedError> {
    let now: DateTime<Utc> = Utc::now();
    let date = now.format("%Y-%m-%d-%H-%M-%S").to_string();
    let file_name = format!("{}-{}-log", date, run_name);
    create_yaml_file(folder_path, &file_name)
}

pub fn append_info_to_yaml(file_path: &str, info: &str) -> Result<(), SchedError> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(file_path)?;
    file.write_all(info.as_bytes())?;
    Ok(())
}
