use crate::cli::args::{Cli, Commands};
use crate::cli::logging::init_logging;
use crate::config::WranglerConfig;
use crate::error::Result;
use crate::models::OutputFormat;
use crate::processors::{Converter, DataMerger, OutputTarget, Splitter};
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut config = WranglerConfig::load(cli.config.as_deref())?;
    let json = cli.json;

    match cli.command {
        Commands::Split {
            input,
            output_dir,
            chunk_size,
            prefix,
            index_column,
            no_index_column,
            create_output_dir,
            no_create_output_dir,
        } => {
            let settings = &mut config.splitter;
            if let Some(input) = input {
                settings.input_path = input;
            }
            if let Some(output_dir) = output_dir {
                settings.output_dir = output_dir;
            }
            if let Some(chunk_size) = chunk_size {
                settings.chunk_size = chunk_size;
            }
            if let Some(prefix) = prefix {
                settings.prefix = prefix;
            }
            apply_flag(&mut settings.index_column, index_column, no_index_column);
            apply_flag(
                &mut settings.create_output_dir,
                create_output_dir,
                no_create_output_dir,
            );
            debug!(?settings, "split settings");

            let splitter = Splitter::from_config(settings)?;

            let progress = ProgressReporter::new_spinner("Splitting data...", json);
            let report = splitter.split(&settings.input_path, &settings.output_dir, Some(&progress))?;
            progress.finish_with_message(&format!("Wrote {} chunk files", report.chunk_count()));

            emit(json, &report, report.summary())?;
        }

        Commands::Merge {
            dir,
            pattern,
            output,
            order,
            format,
            compression,
            index_column,
            no_index_column,
        } => {
            let settings = &mut config.merger;
            if let Some(dir) = dir {
                settings.directory = dir;
            }
            if let Some(pattern) = pattern {
                settings.pattern = pattern;
            }
            if let Some(output) = output {
                settings.output_path = output;
            }
            if let Some(order) = order {
                settings.order = order;
            }
            if let Some(format) = format {
                settings.format = format;
            }
            if let Some(compression) = compression {
                settings.compression = compression;
            }
            apply_flag(&mut settings.index_column, index_column, no_index_column);
            debug!(?settings, "merge settings");

            let merger = DataMerger::from_config(settings)?;

            let progress = ProgressReporter::new_spinner("Merging files...", json);
            let report =
                merger.merge_directory(&settings.directory, &settings.output_path, Some(&progress))?;
            progress.finish_with_message(&format!("Merged {} files", report.input_files.len()));

            emit(json, &report, report.summary())?;
            if report.output_written && settings.format == OutputFormat::Parquet && !json {
                print_parquet_info(&settings.compression, &report.output_path)?;
            }
        }

        Commands::Convert {
            input,
            output,
            no_output,
            input_unit,
            negative_wind,
            format,
            compression,
            index_column,
            no_index_column,
        } => {
            let settings = &mut config.converter;
            if let Some(input_unit) = input_unit {
                settings.input_unit = input_unit;
            }
            if let Some(negative_wind) = negative_wind {
                settings.negative_wind = negative_wind;
            }
            if let Some(format) = format {
                settings.format = format;
            }
            if let Some(compression) = compression {
                settings.compression = compression;
            }
            if no_output {
                settings.write_output = false;
            }
            apply_flag(&mut settings.index_column, index_column, no_index_column);
            debug!(?settings, "convert settings");

            let target = match output {
                Some(path) => OutputTarget::Path(path),
                None if settings.write_output => OutputTarget::Sibling,
                None => OutputTarget::Discard,
            };

            let converter = Converter::from_config(settings);

            let progress = ProgressReporter::new_spinner("Converting data...", json);
            let (_, report) = converter.convert_file(&input, &target)?;
            progress.finish_with_message(&format!("Converted {} rows", report.rows));

            emit(json, &report, report.summary())?;
            if let Some(path) = &report.output_path {
                if settings.format == OutputFormat::Parquet && !json {
                    print_parquet_info(&settings.compression, path)?;
                }
            }
        }
    }

    Ok(())
}

/// `--flag` sets, `--no-flag` clears, neither keeps the configured value
fn apply_flag(setting: &mut bool, on: bool, off: bool) {
    if on {
        *setting = true;
    } else if off {
        *setting = false;
    }
}

fn print_parquet_info(compression: &str, path: &Path) -> Result<()> {
    let info = ParquetWriter::new()
        .with_compression(compression)?
        .get_file_info(path)?;
    println!("\n{}", info.summary());
    Ok(())
}

/// Print a run report, as JSON or as the human-readable summary
fn emit<T: Serialize>(json: bool, report: &T, summary: String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("\n{}", summary);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_flag() {
        let mut setting = true;
        apply_flag(&mut setting, false, false);
        assert!(setting);

        apply_flag(&mut setting, false, true);
        assert!(!setting);

        apply_flag(&mut setting, true, false);
        assert!(setting);
    }
}
