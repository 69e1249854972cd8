use super::{fail_mark, json_pretty, ok_mark, warn_mark, EXIT_INVALID, EXIT_SUCCESS};
use mpdf_container::{validate_file, ValidationReport};
use std::path::Path;

pub fn run(file: &Path, json: bool) -> Result<u8, String> {
    let report = validate_file(file).map_err(|e| e.to_string())?;

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        print_report(file, &report);
    }

    if report.valid {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_INVALID)
    }
}

fn print_report(file: &Path, report: &ValidationReport) {
    if report.valid {
        println!("{} {} is valid", ok_mark(), file.display());
    } else {
        println!(
            "{} {} is invalid ({} error{})",
            fail_mark(),
            file.display(),
            report.errors.len(),
            if report.errors.len() == 1 { "" } else { "s" }
        );
    }
    for e in &report.errors {
        println!("  {} {e}", fail_mark());
    }
    for w in &report.warnings {
        println!("  {} {w}", warn_mark());
    }
}
