//! # Derlem
//!
//! Corpus cleaning pipeline for crawled web text.
//!
//! ```sh
//! derlem 0.1.0
//! web corpus cleaning tool.
//!
//! USAGE:
//!     derlem <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     dedup     Remove near-duplicate boilerplate lines corpus-wide
//!     help      Prints this message or the help of the given subcommand(s)
//!     reduce    Apply per-source cleaning rules to a corpus
//! ```
use structopt::StructOpt;

#[macro_use]
extern crate log;

use derlem::error::Error;
use derlem::pipeline::{DedupCorpus, ReduceCorpus};

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::Derlem::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::Derlem::Reduce(r) => {
            let p = ReduceCorpus::new(r.src, r.dst, r.rules, r.keep_repeats, r.content_only);
            p.run()?;
        }
        cli::Derlem::Dedup(d) => {
            let p = DedupCorpus::new(d.src, d.dst, d.rules, d.content_only);
            p.run()?;
        }
    };
    Ok(())
}
