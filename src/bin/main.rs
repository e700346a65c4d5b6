use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use tabi_hijack::decode::InputFormat;
use tabi_hijack::engine::DefaultRouteMode;
use tabi_hijack::error::CoreError;
use tabi_hijack::metadata::{RelationKind, RelationStore, RoaStore, RouteObjectStore};
use tabi_hijack::output::{ConflictWriter, JsonLinesWriter};
use tabi_hijack::pipeline::Driver;
use tabi_hijack::rib::Rib;
use tabi_hijack::watcher::AsnWatchlist;
use tabi_hijack::{annotate, Asn};

/// Detects BGP prefix hijacks from a time-ordered stream of BGP messages.
#[derive(Parser, Debug)]
#[clap(name = "detect-hijacks")]
struct Opts {
    /// BGP dump/update files, time-ordered.
    #[clap(name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Name of the collector the files come from.
    #[clap(short, long)]
    collector: String,

    /// Format of the input files.
    #[clap(short = 'i', long, value_enum, default_value_t = CliInputFormat::Mabo)]
    input_format: CliInputFormat,

    /// CSV file of IRR route objects: authority,prefix,asn.
    #[clap(long)]
    irr_ro_file: Option<PathBuf>,

    /// CSV file of IRR maintainer relations: authority,maintainer,asn.
    #[clap(long)]
    irr_mnt_file: Option<PathBuf>,

    /// CSV file of IRR organisation relations: authority,organisation,asn.
    #[clap(long)]
    irr_org_file: Option<PathBuf>,

    /// CSV file of IRR contact relations: authority,contact,asn.
    #[clap(long)]
    irr_contact_file: Option<PathBuf>,

    /// CSV file of RPKI ROAs: asn,prefix,max_length,validity.
    #[clap(long)]
    rpki_roa_file: Option<PathBuf>,

    /// Which definition of "default route" to filter.
    #[clap(long, value_enum, default_value_t = CliDefaultRouteMode::Mask8)]
    default_route_mode: CliDefaultRouteMode,

    /// ASN to watch; repeatable. With none given, every announce is tracked.
    #[clap(long = "watch-asn")]
    watch_asns: Vec<u32>,

    /// Pretty-print output JSON.
    #[clap(long)]
    pretty: bool,

    /// Raise log verbosity; repeatable (-v, -vv).
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliInputFormat {
    Mabo,
    Bgpreader,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDefaultRouteMode {
    Mask8,
    Literal,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn load_metadata(
    opts: &Opts,
) -> Result<(Option<RouteObjectStore>, Option<RoaStore>, Option<RelationStore>), CoreError> {
    let open_metadata_file = |path: &std::path::Path| {
        std::fs::File::open(path).map_err(|source| CoreError::MetadataOpen {
            path: path.to_path_buf(),
            source,
        })
    };

    let route_objects = match &opts.irr_ro_file {
        Some(path) => Some(RouteObjectStore::load_csv(open_metadata_file(path)?)?),
        None => None,
    };

    let roa = match &opts.rpki_roa_file {
        Some(path) => Some(RoaStore::load_csv(open_metadata_file(path)?)?),
        None => None,
    };

    let relation_inputs = [
        (opts.irr_org_file.as_ref(), RelationKind::Organisations),
        (opts.irr_mnt_file.as_ref(), RelationKind::Maintainers),
        (opts.irr_contact_file.as_ref(), RelationKind::Contacts),
    ];
    let mut relations_loaded = false;
    let mut relations = RelationStore::new();
    for (path, kind) in relation_inputs {
        if let Some(path) = path {
            relations.load_csv(kind, open_metadata_file(path)?)?;
            relations_loaded = true;
        }
    }

    Ok((route_objects, roa, relations_loaded.then_some(relations)))
}

fn run(opts: Opts) -> Result<(), CoreError> {
    let (route_objects, roa, relations) = load_metadata(&opts)?;
    let annotators = annotate::Annotators {
        route_objects: route_objects.as_ref(),
        roa: roa.as_ref(),
        relations: relations.as_ref(),
    };

    let watchlist = (!opts.watch_asns.is_empty())
        .then(|| AsnWatchlist::new(opts.watch_asns.iter().map(|&a| Asn(a))));

    let driver = Driver {
        collector: opts.collector.clone(),
        format: match opts.input_format {
            CliInputFormat::Mabo => InputFormat::Mabo,
            CliInputFormat::Bgpreader => InputFormat::Bgpreader,
        },
        mode: match opts.default_route_mode {
            CliDefaultRouteMode::Mask8 => DefaultRouteMode::Mask8,
            CliDefaultRouteMode::Literal => DefaultRouteMode::Literal,
        },
        watchlist,
    };

    let stdout = std::io::stdout();
    let mut writer = JsonLinesWriter::new(stdout.lock(), true, opts.pretty);

    let mut rib = Rib::new();
    driver.run(opts.files, &mut rib, |mut conflict| {
        annotate::annotate(&annotators, &mut conflict);
        if let Err(e) = writer.write(&conflict) {
            log::error!("failed to write output record: {e}");
        }
    })
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    init_logging(opts.verbose);

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("detect-hijacks: {e}");
            ExitCode::FAILURE
        }
    }
}
