use anyhow::Result;

use dir2dac::config::Configuration;
use dir2dac::model::CollectingModelBuilder;

const USAGE: &str = "dir2dac - compile a directory of SQL scripts into canonical statements

Usage: dir2dac /sourcePath=<path>[=<filter>] [options]

Options (keys are case-insensitive):
  /sourcePath=<path>[=<filter>]   Source directory; filter defaults to *.sql (repeatable)
  /precompare=<path>              Pre-compare script
  /postcompare=<path>             Post-compare script
  /dp=<outputPath>                Output dacpac path
  /sv=<version>                   Target version: SQL90..SQL160 (default SQL160)
  /do=<option>=<value>            Database model option (repeatable)
  /r=this=<file>=<logicalName>
  /r=other=<file>=<logicalName>=<dbVar>
  /r=otherserver=<file>=<logicalName>=<dbVar>=<serverVar>
  /r=master=<file>  /r=msdb=<file>";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    let config = Configuration::from_args(&args)?;

    let mut builder = CollectingModelBuilder::new();
    dir2dac::compile(&config, &mut builder, true)?;

    println!(
        "Normalized {} files into {} batches ({} statements) for {}",
        builder.files.len(),
        builder.batch_count(),
        builder.statement_count(),
        config.sql_server_version
    );
    if !builder.required_sqlcmd_vars.is_empty() {
        println!(
            "Required SQLCMD variables: {}",
            builder.required_sqlcmd_vars.join(", ")
        );
    }
    if let Some(path) = &config.dacpac_path {
        println!("Model ready for package assembly at {}", path.display());
    }

    Ok(())
}
