use clap::{
    crate_description, crate_name, crate_version, App, AppSettings, Arg, ArgMatches, SubCommand,
};
use std::error::Error;
use tubatch::{
    cache::{batch_from_mm, mm_from_batch, BatchInfo},
    memory_manager::MemoryManager,
    read::tu::{read_tu_files, TuConfig},
};

fn config_from_matches(matches: &ArgMatches) -> TuConfig {
    TuConfig {
        graph_indicator: matches.is_present("graph-indicator"),
        graph_labels: matches.is_present("graph-labels"),
        graph_attributes: matches.is_present("graph-attributes"),
        node_attributes: matches.is_present("node-attributes"),
        node_labels: matches.is_present("node-labels"),
        edge_attributes: matches.is_present("edge-attributes"),
        edge_labels: matches.is_present("edge-labels"),
    }
}

fn handle_create(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let (batch, slices) = read_tu_files(
        matches.value_of("RAWDIR").unwrap(),
        matches.value_of("PREFIX").unwrap(),
        &config_from_matches(matches),
    )?;
    let mut mm = MemoryManager::new_mmap_mut(matches.value_of("BATCHFILE").unwrap(), 0)?;
    mm_from_batch(&mut mm, &batch, &slices);
    Ok(())
}

fn handle_info(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let mm = MemoryManager::new_mmap(matches.value_of("BATCHFILE").unwrap())?;
    println!("{}", BatchInfo::new(&mm)?);
    Ok(())
}

fn handle_display(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let mm = MemoryManager::new_mmap(matches.value_of("BATCHFILE").unwrap())?;
    let (batch, slices) = batch_from_mm(&mm)?;
    let g = matches.value_of("INDEX").unwrap().parse::<usize>()?;
    print!("{}", batch.get(&slices, g));
    Ok(())
}

fn file_flags(subcommand: App<'static, 'static>) -> App<'static, 'static> {
    let names = [
        "graph-indicator",
        "graph-labels",
        "graph-attributes",
        "node-attributes",
        "node-labels",
        "edge-attributes",
        "edge-labels",
    ];
    names.iter().fold(subcommand, |subcommand, &name| {
        subcommand.arg(Arg::with_name(name).long(name).takes_value(false))
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let matches = App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(file_flags(
            SubCommand::with_name("create")
                .about("Creates a batch file from a directory of TU text files")
                .after_help(
                    r"RAWDIR must contain <PREFIX>_A.txt plus one
<PREFIX>_<suffix>.txt file per passed flag.
",
                )
                .arg(Arg::with_name("RAWDIR").required(true))
                .arg(Arg::with_name("PREFIX").required(true))
                .arg(Arg::with_name("BATCHFILE").required(true)),
        ))
        .subcommand(
            SubCommand::with_name("info")
                .about("Displays information about the batch file")
                .arg(Arg::with_name("BATCHFILE").required(true)),
        )
        .subcommand(
            SubCommand::with_name("display")
                .about("Displays one graph of the batch file")
                .arg(Arg::with_name("BATCHFILE").required(true))
                .arg(Arg::with_name("INDEX").required(true)),
        )
        .get_matches();
    if let Some(matches) = matches.subcommand_matches("create") {
        handle_create(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("info") {
        handle_info(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("display") {
        handle_display(matches)?;
    }
    Ok(())
}
