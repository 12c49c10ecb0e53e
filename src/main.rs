mod batch;
mod date;
mod ident;
mod model;
mod record;

use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::batch::BatchProcessor;
use crate::model::Config;

const INPUT_DIR: &str = "./input";
const SUMMARY_DIR: &str = "./summaries";

pub fn handle_file(file_path: &Path, cfg: &Config) -> anyhow::Result<String> {
    let data = std::fs::read_to_string(file_path)
        .with_context(|| format!("reading {}", file_path.display()))?;
    let processor = BatchProcessor::process(&data, cfg)
        .with_context(|| format!("processing {}", file_path.display()))?;
    for (index, cause) in &processor.skipped {
        log::warn!("skipping record {} of {}: {}", index, file_path.display(), cause);
    }
    serde_json::to_string(&processor.summarize()).context("encoding summary")
}

fn watch_input(cfg: &Config) {
    let _ = std::fs::create_dir_all(INPUT_DIR);
    let _ = std::fs::create_dir_all(SUMMARY_DIR);

    loop {
        std::thread::sleep(Duration::from_secs(3));
        let entries = match std::fs::read_dir(INPUT_DIR) {
            Ok(entries) => entries,
            Err(err) => {
                log::error!("cannot read {}: {}", INPUT_DIR, err);
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match handle_file(&path, cfg) {
                Ok(summary) => {
                    let name = entry.file_name();
                    let output_path = format!(
                        "{}/summary_{}",
                        SUMMARY_DIR,
                        name.to_str().unwrap_or("name_missing")
                    );
                    if let Err(err) = std::fs::write(&output_path, summary) {
                        log::error!("cannot write {}: {}", output_path, err);
                        continue;
                    }
                    log::info!("summarized {} into {}", path.display(), output_path);
                    let _ = std::fs::remove_file(&path);
                }
                Err(err) => {
                    log::error!("error processing {}: {:#}", path.display(), err);
                }
            }
        }
    }
}

fn main() {
    env_logger::init();
    let cfg = Config::from_env();

    if let Some(path) = std::env::args().nth(1) {
        match handle_file(Path::new(&path), &cfg) {
            Ok(summary) => println!("{}", summary),
            Err(err) => {
                log::error!("{:#}", err);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Watching {} for patient batches", INPUT_DIR);
    println!("Press Ctrl-C to quit");
    watch_input(&cfg);
}
