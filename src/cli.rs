//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "derlem", about = "web corpus cleaning tool.")]
/// Holds every command callable through the `derlem` binary.
pub enum Derlem {
    #[structopt(about = "Apply per-source cleaning rules to a corpus")]
    Reduce(Reduce),
    #[structopt(about = "Remove near-duplicate boilerplate lines corpus-wide")]
    Dedup(Dedup),
}

#[derive(Debug, StructOpt)]
/// Reduce command and parameters.
pub struct Reduce {
    #[structopt(parse(from_os_str), help = "source corpus root (one directory per source)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "destination corpus root")]
    pub dst: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "rules",
        help = "rule file path",
        default_value = "content-rules.txt"
    )]
    pub rules: PathBuf,
    #[structopt(
        long = "keep-repeats",
        help = "keep repeated lines instead of deduplicating within documents"
    )]
    pub keep_repeats: bool,
    #[structopt(long = "content-only", help = "write documents without <doc> tags")]
    pub content_only: bool,
}

#[derive(Debug, StructOpt)]
/// Dedup command and parameters.
pub struct Dedup {
    #[structopt(parse(from_os_str), help = "source corpus root (one directory per source)")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "destination corpus root")]
    pub dst: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "rules",
        help = "rule file path",
        default_value = "content-rules.txt"
    )]
    pub rules: PathBuf,
    #[structopt(long = "content-only", help = "write documents without <doc> tags")]
    pub content_only: bool,
}
