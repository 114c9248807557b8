use std::path::PathBuf;
use std::time::Duration;

use bgpmon_parser::io::{DEFAULT_BGPMON_HOST, DEFAULT_BGPMON_PORT};
use bgpmon_parser::{write_output, AsnFilter, BgpmonParser, OutputFormat, ParserOptions};
use clap::Parser;
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record};

/// Default cap on bytes buffered while waiting for a closing message tag.
const DEFAULT_MAX_BUFFER: usize = 16 * 1024 * 1024;

/// bgpmon-parser reads a BGPmon XML update stream and prints one JSON object (or
/// pretty-printed XML message) per line.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// Output log info.
    #[clap(short, long)]
    logging: bool,

    /// Output warnings.
    #[clap(short, long)]
    warning: bool,

    /// Verbose output.
    #[clap(short, long)]
    verbose: bool,

    /// Address or name of BGPmon host.
    #[clap(short, long, default_value = DEFAULT_BGPMON_HOST)]
    addr: String,

    /// Port of BGPmon Update XML stream.
    #[clap(short, long, default_value_t = DEFAULT_BGPMON_PORT)]
    port: u16,

    /// Set output format to XML, default JSON.
    #[clap(short = 'x', long)]
    xml: bool,

    /// Seconds to wait for the connection and for each read; waits forever if unset.
    #[clap(long)]
    timeout: Option<u64>,

    /// Maximum bytes buffered for an unterminated message before it is dropped.
    #[clap(long, default_value_t = DEFAULT_MAX_BUFFER)]
    max_buffer: usize,

    #[clap(flatten)]
    filters: Filters,
}

#[derive(Parser, Debug)]
struct Filters {
    /// ASN filter, as comma separated list.
    #[clap(short = 'f', long, conflicts_with = "readfilter")]
    filter: Option<String>,

    /// ASN filter, read from csv file.
    #[clap(short = 'r', long)]
    readfilter: Option<PathBuf>,
}

impl Opts {
    /// Verbose implies log and warning output. Log and warning output are independent.
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.logging {
            LevelFilter::Info
        } else if self.warning {
            LevelFilter::Warn
        } else {
            LevelFilter::Error
        }
    }

    /// `-l` without `-w` prints info records but no warnings.
    fn suppress_warnings(&self) -> bool {
        self.logging && !self.warning && !self.verbose
    }

    fn asn_filter(&self) -> Option<AsnFilter> {
        if let Some(list) = &self.filters.filter {
            return Some(AsnFilter::from_list(list));
        }
        let path = self.filters.readfilter.as_ref()?;
        match AsnFilter::from_file(path) {
            Ok(filter) => filter,
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

/// Wraps the env_logger logger to drop warn records when only log output is requested.
struct FlagLogger {
    inner: env_logger::Logger,
    suppress_warnings: bool,
}

impl Log for FlagLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        !(self.suppress_warnings && metadata.level() == Level::Warn) && self.inner.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

impl FlagLogger {
    fn new(opts: &Opts) -> Self {
        let inner = env_logger::Builder::new()
            .filter_level(opts.log_level())
            .parse_default_env()
            .build();
        FlagLogger {
            inner,
            suppress_warnings: opts.suppress_warnings(),
        }
    }

    fn init(self) {
        let max_level = self.inner.filter();
        if log::set_boxed_logger(Box::new(self)).is_ok() {
            log::set_max_level(max_level);
        }
    }
}

fn main() {
    let opts: Opts = Opts::parse();

    FlagLogger::new(&opts).init();

    info!("starting ...");

    let filter = opts.asn_filter();
    if let Some(f) = &filter {
        info!("filtering on {} origin ASNs", f.len());
    }
    let format = match opts.xml {
        true => OutputFormat::Xml,
        false => OutputFormat::Json,
    };
    let timeout = opts.timeout.map(Duration::from_secs);

    let stream = match bgpmon_parser::io::connect(&opts.addr, opts.port, timeout) {
        Ok(s) => s,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    let options = ParserOptions {
        max_buffer_len: Some(opts.max_buffer),
        filter,
        ..Default::default()
    };
    let parser = BgpmonParser::new_with_options(stream, options);

    let mut stdout = std::io::stdout().lock();
    match write_output(parser, format, &mut stdout) {
        Ok(count) => info!("done ... {} messages written", count),
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    }
}
